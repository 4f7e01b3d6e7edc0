mod grid;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pickmeup_core::constants::{DEFAULT_FORMAT, DEFAULT_SEPARATOR};
use pickmeup_core::{
    Clock, DateCodec, DateInput, FixedClock, Locale, OptionLayer, Picker, RecordingAdapter,
    SystemClock,
};

const ISO_FORMAT: &str = "Y-m-d";

#[derive(Debug, Parser)]
#[command(name = "pickmeup", version)]
#[command(about = "Preview PickMeUp calendar grids and try out date formats")]
struct Cli {
    /// Log option resolution and parse fallbacks
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the calendar grids a picker would render
    Show(ShowArgs),
    /// Format a date with a directive pattern
    Format {
        /// Date written in `--input-format`
        date: String,
        #[arg(long)]
        pattern: String,
        #[arg(long, default_value = ISO_FORMAT)]
        input_format: String,
        /// Locale JSON with days, daysShort, daysMin, months and monthsShort
        #[arg(long)]
        locale: Option<PathBuf>,
    },
    /// Parse text with a directive format and print ISO dates
    Parse {
        text: String,
        #[arg(long, default_value = DEFAULT_FORMAT)]
        format: String,
        /// Splits several dates in one value
        #[arg(long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
        #[arg(long)]
        locale: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Selected date(s), written in `--format` and joined by the separator
    #[arg(long)]
    date: Option<String>,
    /// single, multiple or range
    #[arg(long)]
    mode: Option<String>,
    /// days, months or years
    #[arg(long)]
    view: Option<String>,
    #[arg(long)]
    calendars: Option<i64>,
    #[arg(long)]
    min: Option<String>,
    #[arg(long)]
    max: Option<String>,
    /// 0 for Sunday, 1 for Monday
    #[arg(long)]
    first_day: Option<i64>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    title_format: Option<String>,
    #[arg(long)]
    locale: Option<PathBuf>,
    /// Pin "today", written in `--format`
    #[arg(long)]
    today: Option<String>,
    /// Page forward (positive) or back (negative) before printing
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    page: i32,
    /// Print the computed view as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Show(args) => show(&args),
        Command::Format {
            date,
            pattern,
            input_format,
            locale,
        } => {
            let locale = load_locale(locale.as_deref())?;
            let codec = DateCodec::new(&input_format, DEFAULT_SEPARATOR, locale);
            let value = codec.parse_text(&date, SystemClock.now());
            println!("{}", codec.format_with(value, &pattern));
            Ok(())
        }
        Command::Parse {
            text,
            format,
            separator,
            locale,
        } => {
            let locale = load_locale(locale.as_deref())?;
            let codec = DateCodec::new(&format, &separator, locale);
            for date in codec.parse(&DateInput::Text(text), SystemClock.now()) {
                println!("{}", codec.format_with(date, ISO_FORMAT));
            }
            Ok(())
        }
    }
}

fn load_locale(path: Option<&Path>) -> Result<Locale> {
    let Some(path) = path else {
        return Ok(Locale::english().clone());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading locale file {}", path.display()))?;
    Locale::from_json(&json).with_context(|| format!("parsing locale file {}", path.display()))
}

fn show(args: &ShowArgs) -> Result<()> {
    let locale = load_locale(args.locale.as_deref())?;
    let clock: Box<dyn Clock> = match &args.today {
        Some(text) => {
            let format = args.format.as_deref().unwrap_or(DEFAULT_FORMAT);
            let codec = DateCodec::new(format, DEFAULT_SEPARATOR, locale.clone());
            Box::new(FixedClock(codec.parse_text(text, SystemClock.now()).at_midnight()))
        }
        None => Box::new(SystemClock),
    };

    let layer = OptionLayer {
        date: args.date.clone().map(DateInput::Text),
        mode: args.mode.clone(),
        view: args.view.clone(),
        calendars: args.calendars,
        min: args.min.clone().map(DateInput::Text),
        max: args.max.clone().map(DateInput::Text),
        first_day: args.first_day,
        format: args.format.clone(),
        title_format: args.title_format.clone(),
        locale: Some(locale),
        flat: Some(true),
        ..OptionLayer::default()
    };
    let mut picker: Picker<RecordingAdapter> =
        pickmeup_core::attach(RecordingAdapter::new(), OptionLayer::default(), layer, clock);
    for _ in 0..args.page.unsigned_abs() {
        if args.page > 0 {
            picker.page_next(true);
        } else {
            picker.page_prev(true);
        }
    }

    let view = picker.adapter().view().context("picker rendered nothing")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", grid::render(view));
    }
    Ok(())
}
