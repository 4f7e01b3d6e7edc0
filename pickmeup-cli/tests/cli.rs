use std::process::Command;

fn pickmeup(args: &[&str]) -> String {
    let exe = env!("CARGO_BIN_EXE_pickmeup");
    let output = Command::new(exe)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 output")
}

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "pickmeup-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn show_prints_the_month_grid() {
    let stdout = pickmeup(&["show", "--today", "20-06-2023", "--date", "15-06-2023"]);
    assert!(stdout.contains("June, 2023"));
    assert!(stdout.contains("Mo Tu We Th Fr Sa Su"));
    assert!(stdout.contains("12 13 14 15 16 17 18"));
}

#[test]
fn show_pages_and_honors_first_day() {
    let stdout = pickmeup(&[
        "show",
        "--today",
        "20-06-2023",
        "--first-day",
        "0",
        "--page",
        "-1",
    ]);
    assert!(stdout.contains("May, 2023"));
    assert!(stdout.contains("Su Mo Tu We Th Fr Sa"));
}

#[test]
fn show_json_reports_selection_and_bounds() {
    let stdout = pickmeup(&[
        "show",
        "--json",
        "--today",
        "20-06-2023",
        "--mode",
        "range",
        "--date",
        "10-06-2023 - 12-06-2023",
        "--max",
        "25-06-2023",
    ]);
    let view: serde_json::Value = serde_json::from_str(&stdout).expect("json view");
    assert_eq!(view["level"], "days");
    assert_eq!(view["show_next"], false);
    let cells = view["instances"][0]["cells"].as_array().expect("cells");
    let selected: Vec<&str> = cells
        .iter()
        .filter(|cell| cell["selected"] == true)
        .filter_map(|cell| cell["label"].as_str())
        .collect();
    assert_eq!(selected, vec!["10", "11", "12"]);
    assert!(
        cells
            .iter()
            .filter(|cell| cell["label"] == "26")
            .all(|cell| cell["disabled"] == true)
    );
}

#[test]
fn format_applies_pattern() {
    let stdout = pickmeup(&["format", "2024-02-29", "--pattern", "A, d B Y"]);
    assert_eq!(stdout.trim(), "Thursday, 29 February 2024");
}

#[test]
fn parse_splits_on_separator() {
    let stdout = pickmeup(&["parse", "01/02/2024 - 15/03/2024", "--format", "d/m/Y"]);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["2024-02-01", "2024-03-15"]);
}

#[test]
fn show_uses_locale_file() {
    let path = temp_path("locale");
    std::fs::write(
        &path,
        r#"{
            "days": ["Domingo", "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado"],
            "daysShort": ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"],
            "daysMin": ["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sá"],
            "months": ["Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio",
                       "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre"],
            "monthsShort": ["Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul",
                            "Ago", "Sep", "Oct", "Nov", "Dic"]
        }"#,
    )
    .expect("write locale");
    let locale = path.to_str().expect("utf8 path");
    let stdout = pickmeup(&["show", "--today", "20-06-2023", "--locale", locale]);
    assert!(stdout.contains("Junio, 2023"));
    assert!(stdout.contains("Lu Ma Mi Ju Vi Sá Do"));
}

#[test]
fn missing_locale_file_fails() {
    let exe = env!("CARGO_BIN_EXE_pickmeup");
    let output = Command::new(exe)
        .args(["show", "--locale", "/nonexistent/pickmeup-locale.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("reading locale file"));
}
