use futures::executor::block_on;
use pickmeup_core::{DateValue, OptionLayer};
use pickmeup_web::components::{Calendar, CalendarProps};
use yew::{Callback, Classes, LocalServerRenderer};

fn props(options: OptionLayer) -> CalendarProps {
    CalendarProps {
        options,
        today: DateValue::from_ymd(2023, 5, 20),
        on_change: Callback::noop(),
        class: Classes::new(),
    }
}

fn render(options: OptionLayer) -> String {
    block_on(LocalServerRenderer::<Calendar>::with_props(props(options)).render())
}

#[test]
fn day_grid_renders_selected_today() {
    let html = render(OptionLayer::default());
    assert!(html.contains("June, 2023"));
    assert_eq!(html.matches("data-pmu-cell=").count(), 42);
    assert_eq!(html.matches("pmu-selected").count(), 1);
    assert!(html.contains("pmu-button pmu-today pmu-selected"));
    assert!(html.contains("pmu-day-of-week"));
    assert!(html.contains("pmu-flat"));
    assert!(!html.contains("pmu-hidden"));
}

#[test]
fn calendars_render_side_by_side() {
    let html = render(OptionLayer {
        calendars: Some(3),
        ..OptionLayer::default()
    });
    assert_eq!(html.matches("class=\"pmu-instance\"").count(), 3);
    assert!(html.contains("May, 2023"));
    assert!(html.contains("July, 2023"));
}

#[test]
fn month_only_picker_opens_on_months() {
    let html = render(OptionLayer {
        select_day: Some(false),
        ..OptionLayer::default()
    });
    assert!(html.contains("pmu-view-months"));
    assert!(html.contains("pmu-months"));
    assert!(html.contains(">2023<"));
    assert!(html.contains("Jun"));
    assert!(!html.contains("pmu-day-of-week"));
    assert_eq!(html.matches("data-pmu-cell=").count(), 12);
}

#[test]
fn extra_classes_reach_the_root() {
    let mut props = props(OptionLayer {
        class_name: Some("themed".to_string()),
        ..OptionLayer::default()
    });
    props.class = Classes::from("wide");
    let html = block_on(LocalServerRenderer::<Calendar>::with_props(props).render());
    assert!(html.contains("themed"));
    assert!(html.contains("wide"));
    assert!(html.contains("pickmeup"));
}
