use std::cell::RefCell;
use std::rc::Rc;

use pickmeup_core::constants::{
    CLASS_BUTTON, CLASS_DAY_OF_WEEK, CLASS_HEADER, CLASS_INSTANCE, CLASS_NEXT, CLASS_PREV,
};
use pickmeup_core::{
    CalendarInstance, CalendarView, ChangeDetail, ClickTarget, Clock, DateValue, FixedClock,
    OptionLayer, Picker, PickerEvent, RecordingAdapter, SystemClock, ViewLevel,
};
use yew::prelude::*;

type SharedPicker = Rc<RefCell<Picker<RecordingAdapter>>>;

/// Inputs the current picker was built from.
type BuiltFrom = (OptionLayer, Option<DateValue>);

#[derive(Properties, PartialEq, Clone)]
pub struct CalendarProps {
    #[prop_or_default]
    pub options: OptionLayer,
    /// Pin "today" instead of reading the system clock.
    #[prop_or_default]
    pub today: Option<DateValue>,
    #[prop_or_default]
    pub on_change: Callback<ChangeDetail>,
    #[prop_or_default]
    pub class: Classes,
}

fn build_picker(options: &OptionLayer, today: Option<DateValue>) -> Picker<RecordingAdapter> {
    let inline = options.clone().overlay(OptionLayer {
        flat: Some(true),
        ..OptionLayer::default()
    });
    let clock: Box<dyn Clock> = match today {
        Some(day) => Box::new(FixedClock(day.at_midnight())),
        None => Box::new(SystemClock),
    };
    pickmeup_core::attach(RecordingAdapter::new(), OptionLayer::default(), inline, clock)
}

fn stale(built_from: &BuiltFrom, props: &CalendarProps) -> bool {
    built_from.0 != props.options || built_from.1 != props.today
}

/// Inline picker driven by the headless adapter; yew owns the markup.
#[function_component(Calendar)]
pub fn calendar(props: &CalendarProps) -> Html {
    let state = {
        let options = props.options.clone();
        let today = props.today;
        use_mut_ref(move || {
            let picker = build_picker(&options, today);
            ((options, today), Rc::new(RefCell::new(picker)))
        })
    };
    let version = use_state(|| 0_u32);

    let picker: SharedPicker = {
        let mut state = state.borrow_mut();
        let (built_from, picker) = &mut *state;
        if stale(built_from, props) {
            *built_from = (props.options.clone(), props.today);
            *picker = Rc::new(RefCell::new(build_picker(&props.options, props.today)));
        }
        Rc::clone(picker)
    };

    let (view, markers) = {
        let current = picker.borrow();
        let adapter = current.adapter();
        (adapter.view().cloned(), adapter.markers().join(" "))
    };
    let Some(view) = view else {
        return Html::default();
    };

    let click = |target: ClickTarget| {
        let picker = Rc::clone(&picker);
        let version = version.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| {
            let events = match picker.try_borrow_mut() {
                Ok(mut picker) => {
                    if !picker.click(target) {
                        return;
                    }
                    picker.adapter_mut().take_events()
                }
                Err(_) => return,
            };
            for event in events {
                if let PickerEvent::Change(detail) = event {
                    on_change.emit(detail);
                }
            }
            version.set(version.wrapping_add(1));
        })
    };

    let class = classes!(markers, props.class.clone());
    html! {
        <div {class}>
            { for view.instances.iter().map(|instance| render_instance(&view, instance, &click)) }
        </div>
    }
}

fn render_instance(
    view: &CalendarView,
    instance: &CalendarInstance,
    click: &impl Fn(ClickTarget) -> Callback<MouseEvent>,
) -> Html {
    let index = instance.index;
    let visibility = |shown: bool| if shown { "" } else { "visibility: hidden" };
    html! {
        <div class={CLASS_INSTANCE} key={index.to_string()}>
            <nav>
                <div
                    class={classes!(CLASS_PREV, CLASS_BUTTON)}
                    style={visibility(view.show_prev)}
                    onclick={click(ClickTarget::Prev { instance: index })}
                >
                    { view.prev_label.clone() }
                </div>
                <div
                    class={classes!(CLASS_HEADER, CLASS_BUTTON)}
                    onclick={click(ClickTarget::Header { instance: index })}
                >
                    { instance.header.clone() }
                </div>
                <div
                    class={classes!(CLASS_NEXT, CLASS_BUTTON)}
                    style={visibility(view.show_next)}
                    onclick={click(ClickTarget::Next { instance: index })}
                >
                    { view.next_label.clone() }
                </div>
            </nav>
            if instance.level == ViewLevel::Days {
                <div class={CLASS_DAY_OF_WEEK}>
                    { for view.weekdays.iter().map(|name| html! { <div>{ name.clone() }</div> }) }
                </div>
            }
            <div class={instance.section_class()}>
                { for instance.cells.iter().enumerate().map(|(cell_index, cell)| {
                    let target = ClickTarget::Cell {
                        instance: index,
                        tag: cell.tag,
                        disabled: cell.disabled,
                    };
                    html! {
                        <div
                            class={cell.class_names().join(" ")}
                            data-pmu-cell={cell_index.to_string()}
                            onclick={click(target)}
                        >
                            { cell.label.clone() }
                        </div>
                    }
                }) }
            </div>
        </div>
    }
}
