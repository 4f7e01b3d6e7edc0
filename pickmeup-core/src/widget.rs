//! Widget facade: a registry of attached pickers and weak handles to them.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::RenderAdapter;
use crate::controller::{DateQuery, DateReport, Picker};
use crate::format::DateInput;

/// A registered picker. `retired` is set when the registry lets go of it
/// while a handle call is still running; that call tears it down on exit.
struct Slot<A: RenderAdapter> {
    picker: RefCell<Picker<A>>,
    retired: Cell<bool>,
}

impl<A: RenderAdapter> Slot<A> {
    fn new(picker: Picker<A>) -> Self {
        Self {
            picker: RefCell::new(picker),
            retired: Cell::new(false),
        }
    }

    fn teardown(picker: &mut Picker<A>) {
        picker.adapter_mut().set_open_listeners(false);
        picker.adapter_mut().teardown();
    }
}

/// Attached pickers keyed by their anchor's identity.
pub struct Registry<K, A: RenderAdapter> {
    pickers: HashMap<K, Rc<Slot<A>>>,
}

impl<K, A: RenderAdapter> Default for Registry<K, A> {
    fn default() -> Self {
        Self {
            pickers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug, A: RenderAdapter> Registry<K, A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a picker under `key`, or return the one already attached there.
    /// `build` only runs for new keys.
    pub fn attach(&mut self, key: K, build: impl FnOnce() -> Picker<A>) -> PickerHandle<A> {
        let slot = self.pickers.entry(key.clone()).or_insert_with(|| {
            log::debug!("attaching picker {key:?}");
            Rc::new(Slot::new(build()))
        });
        PickerHandle {
            inner: Rc::downgrade(slot),
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<PickerHandle<A>> {
        self.pickers.get(key).map(|slot| PickerHandle {
            inner: Rc::downgrade(slot),
        })
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.pickers.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pickers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pickers.is_empty()
    }

    /// Detach the picker under `key`. Outstanding handles become inert.
    ///
    /// The adapter is handed back when nothing else holds the picker. When a
    /// handle call is running (a listener destroying its own widget), the
    /// teardown happens as that call returns and `None` is returned.
    pub fn destroy(&mut self, key: &K) -> Option<A> {
        let slot = self.pickers.remove(key)?;
        log::debug!("destroying picker {key:?}");
        match Rc::try_unwrap(slot) {
            Ok(slot) => Some(slot.picker.into_inner().destroy()),
            Err(shared) => {
                shared.retired.set(true);
                if let Ok(mut picker) = shared.picker.try_borrow_mut() {
                    Slot::teardown(&mut picker);
                } else {
                    log::debug!("picker {key:?} busy; teardown deferred");
                }
                None
            }
        }
    }
}

/// Weak handle to an attached picker. Every operation is a no-op once the
/// picker is destroyed or while it is already borrowed.
pub struct PickerHandle<A: RenderAdapter> {
    inner: Weak<Slot<A>>,
}

impl<A: RenderAdapter> Clone for PickerHandle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<A: RenderAdapter> fmt::Debug for PickerHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<A: RenderAdapter> PickerHandle<A> {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.upgrade().is_some_and(|slot| !slot.retired.get())
    }

    /// Run `op` against the picker if it is alive and not already borrowed.
    pub fn with<R>(&self, op: impl FnOnce(&mut Picker<A>) -> R) -> Option<R> {
        let slot = self.inner.upgrade()?;
        if slot.retired.get() {
            return None;
        }
        let result = {
            let Ok(mut picker) = slot.picker.try_borrow_mut() else {
                log::debug!("picker busy; call dropped");
                return None;
            };
            op(&mut picker)
        };
        if slot.retired.get()
            && let Ok(mut picker) = slot.picker.try_borrow_mut()
        {
            Slot::teardown(&mut picker);
        }
        Some(result)
    }

    pub fn show(&self, force: bool) {
        self.with(|picker| picker.show(force));
    }

    pub fn hide(&self) {
        self.with(Picker::hide);
    }

    pub fn toggle_open_state(&self) {
        self.with(Picker::toggle_open_state);
    }

    pub fn force_reposition(&self) {
        self.with(Picker::force_reposition);
    }

    pub fn clear_selection(&self) {
        self.with(Picker::clear_selection);
    }

    pub fn page_prev(&self, rerender: bool) {
        self.with(|picker| picker.page_prev(rerender));
    }

    pub fn page_next(&self, rerender: bool) {
        self.with(|picker| picker.page_next(rerender));
    }

    #[must_use]
    pub fn get_date(&self, query: &DateQuery) -> Option<DateReport> {
        self.with(|picker| picker.get_date(query))
    }

    pub fn set_date(&self, input: &DateInput, current: Option<&DateInput>) {
        self.with(|picker| picker.set_date(input, current));
    }

    pub fn fill(&self) {
        self.with(Picker::fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::FixedClock;
    use crate::headless::RecordingAdapter;
    use crate::options::Options;

    fn build() -> Picker<RecordingAdapter> {
        Picker::new(
            Options::default(),
            RecordingAdapter::new(),
            Box::new(FixedClock::at(2023, 5, 15)),
        )
    }

    #[test]
    fn attach_twice_reuses_the_instance() {
        let mut registry: Registry<u32, RecordingAdapter> = Registry::new();
        let first = registry.attach(1, build);
        let second = registry.attach(1, || panic!("must not rebuild"));
        assert_eq!(registry.len(), 1);
        first.page_next(true);
        let anchor = second.with(|picker| picker.anchor());
        assert_eq!(anchor.map(|date| date.month0()), Some(6));
    }

    #[test]
    fn destroyed_handles_are_inert() {
        let mut registry: Registry<u32, RecordingAdapter> = Registry::new();
        let handle = registry.attach(7, build);
        let adapter = registry.destroy(&7).unwrap();
        assert!(adapter.is_torn_down());
        assert!(!handle.is_alive());
        handle.show(true);
        assert_eq!(handle.get_date(&DateQuery::Formatted), None);
        assert!(registry.destroy(&7).is_none());
    }

    /// Shares its teardown flag so it can be read after the picker is gone.
    struct SharedTeardown {
        inner: RecordingAdapter,
        torn_down: Rc<Cell<bool>>,
    }

    impl RenderAdapter for SharedTeardown {
        fn render(&mut self, view: &crate::view::CalendarView) {
            self.inner.render(view);
        }

        fn set_marker(&mut self, marker: &str, enabled: bool) {
            self.inner.set_marker(marker, enabled);
        }

        fn geometry(&self) -> Option<crate::position::Geometry> {
            None
        }

        fn move_to(&mut self, point: crate::position::Point) {
            self.inner.move_to(point);
        }

        fn input_value(&self) -> Option<String> {
            None
        }

        fn set_input_value(&mut self, _value: &str) {}

        fn dispatch(&mut self, event: &crate::events::PickerEvent) -> bool {
            self.inner.dispatch(event)
        }

        fn teardown(&mut self) {
            self.torn_down.set(true);
        }
    }

    #[test]
    fn destroy_from_inside_a_call_tears_down_on_exit() {
        let torn_down = Rc::new(Cell::new(false));
        let registry: Rc<RefCell<Registry<u32, SharedTeardown>>> =
            Rc::new(RefCell::new(Registry::new()));
        let adapter = SharedTeardown {
            inner: RecordingAdapter::new(),
            torn_down: Rc::clone(&torn_down),
        };
        let handle = registry.borrow_mut().attach(1, || {
            Picker::new(
                Options::default(),
                adapter,
                Box::new(FixedClock::at(2023, 5, 15)),
            )
        });

        let inner_registry = Rc::clone(&registry);
        let returned = handle.with(|picker| {
            let adapter = inner_registry.borrow_mut().destroy(&1);
            assert!(adapter.is_none());
            assert!(!picker.adapter().torn_down.get());
        });

        assert_eq!(returned, Some(()));
        assert!(torn_down.get());
        assert!(registry.borrow().is_empty());
        assert!(!handle.is_alive());
        assert_eq!(handle.with(|_| ()), None);
    }

    #[test]
    fn reentrant_calls_are_dropped() {
        let mut registry: Registry<u32, RecordingAdapter> = Registry::new();
        let handle = registry.attach(3, build);
        let inner = handle.clone();
        let nested = handle.with(|_| inner.with(|_| ()));
        assert_eq!(nested, Some(None));
    }
}
