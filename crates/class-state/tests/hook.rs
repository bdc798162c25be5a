use std::cell::{Cell, RefCell};
use std::rc::Rc;

use class_state::prelude::*;
use class_state::runtime::ComponentId;

#[derive(ClassState)]
struct Counter {
    count: Cell<i32>,
    slot: UpdateSlot,
}

impl Counter {
    fn new(start: i32) -> Self {
        Self {
            count: Cell::new(start),
            slot: UpdateSlot::new(),
        }
    }

    fn increment(&self) {
        self.count.set(self.count.get() + 1);
        self.trigger_update();
    }
}

/// A component rendering `use_class_state(Counter::new, (start,))`, recording
/// the accessor handed out by each render.
struct CounterHarness {
    runtime: Runtime,
    id: ComponentId,
    start: Rc<Cell<i32>>,
    accessors: Rc<RefCell<Vec<Accessor<Counter>>>>,
}

impl CounterHarness {
    fn mount(start: i32) -> Self {
        let runtime = Runtime::new();
        let start = Rc::new(Cell::new(start));
        let accessors = Rc::new(RefCell::new(Vec::new()));
        let id = runtime
            .mount({
                let start = start.clone();
                let accessors = accessors.clone();
                move || {
                    let counter = use_class_state(Counter::new, (start.get(),));
                    accessors.borrow_mut().push(counter);
                    Ok(())
                }
            })
            .unwrap();
        Self {
            runtime,
            id,
            start,
            accessors,
        }
    }

    fn latest(&self) -> Accessor<Counter> {
        self.accessors.borrow().last().cloned().unwrap()
    }

    fn renders(&self) -> u64 {
        self.runtime.render_count(self.id).unwrap()
    }
}

#[test]
fn instance_survives_renders_with_unchanged_args() {
    let h = CounterHarness::mount(0);
    let first = h.latest().get();

    for _ in 0..3 {
        h.runtime.render(h.id).unwrap();
    }
    assert_eq!(h.runtime.flush().unwrap(), 0);

    let accessors = h.accessors.borrow();
    assert_eq!(accessors.len(), 4);
    for accessor in accessors.iter() {
        assert!(accessor.ptr_eq(&accessors[0]));
        assert!(Rc::ptr_eq(&accessor.get(), &first));
    }
}

#[test]
fn increment_mutates_in_place_and_rerenders() {
    let h = CounterHarness::mount(0);
    let counter = h.latest();
    let before = counter.get();
    assert_eq!(before.count.get(), 0);

    before.increment();
    assert!(h.runtime.is_dirty(h.id));
    assert_eq!(h.runtime.flush().unwrap(), 1);

    let after = h.latest().get();
    assert!(Rc::ptr_eq(&before, &after));
    assert_eq!(after.count.get(), 1);

    // The slot was refreshed by the re-render, so triggering still works.
    after.increment();
    assert_eq!(h.runtime.flush().unwrap(), 1);
    assert_eq!(counter.get().count.get(), 2);
    assert_eq!(h.renders(), 3);
}

#[test]
fn changed_args_rebuild_the_instance() {
    let h = CounterHarness::mount(0);
    let accessor = h.latest();
    let before = accessor.get();

    h.start.set(5);
    h.runtime.render(h.id).unwrap();
    // Rebuilt by the deferred effect, which scheduled one more render.
    assert!(h.runtime.is_dirty(h.id));
    assert_eq!(h.runtime.flush().unwrap(), 1);

    let after = h.latest().get();
    assert_eq!(after.count.get(), 5);
    assert!(!Rc::ptr_eq(&before, &after));
    // Old accessors read through to the new instance.
    assert!(Rc::ptr_eq(&accessor.get(), &after));

    // The new instance has the live callback installed.
    after.increment();
    assert_eq!(h.runtime.flush().unwrap(), 1);
    assert_eq!(accessor.get().count.get(), 6);
    assert!(Rc::ptr_eq(&accessor.get(), &after));
}

#[test]
fn replaced_instance_no_longer_rerenders() {
    let h = CounterHarness::mount(0);
    let old = h.latest().get();

    h.start.set(1);
    h.runtime.render(h.id).unwrap();
    h.runtime.flush().unwrap();

    // Its slot still holds the callback of a replaced render cycle.
    old.increment();
    assert!(!h.runtime.is_dirty(h.id));
}

#[test]
fn trigger_after_unmount_is_ignored() {
    let h = CounterHarness::mount(0);
    let counter = h.latest().get();

    h.runtime.unmount(h.id).unwrap();
    counter.increment();

    assert_eq!(counter.count.get(), 1);
    assert_eq!(h.runtime.flush().unwrap(), 0);
}

#[test]
fn arguments_are_passed_through_in_order() {
    #[derive(ClassState)]
    struct Recorded {
        received: (String, i64, bool),
        #[update_slot]
        refresh: UpdateSlot,
    }

    let runtime = Runtime::new();
    let seen = Rc::new(RefCell::new(None));
    runtime
        .mount({
            let seen = seen.clone();
            move || {
                let recorded = use_class_state(
                    |name: String, n: i64, flag: bool| Recorded {
                        received: (name, n, flag),
                        refresh: UpdateSlot::new(),
                    },
                    ("a".to_string(), -3, true),
                );
                *seen.borrow_mut() = Some(recorded.get().received.clone());
                Ok(())
            }
        })
        .unwrap();

    assert_eq!(seen.borrow().clone(), Some(("a".to_string(), -3, true)));
}

#[test]
fn zero_argument_constructor() {
    #[derive(ClassState, Default)]
    struct Flag(Cell<bool>, UpdateSlot);

    let runtime = Runtime::new();
    let seen = Rc::new(RefCell::new(None));
    let id = runtime
        .mount({
            let seen = seen.clone();
            move || {
                let flag = use_class_state(Flag::default, ());
                *seen.borrow_mut() = Some(flag);
                Ok(())
            }
        })
        .unwrap();

    let flag = seen.borrow().clone().unwrap().get();
    flag.0.set(true);
    update_class_state(&*flag);
    assert!(runtime.is_dirty(id));
    assert_eq!(runtime.flush().unwrap(), 1);
    assert!(seen.borrow().as_ref().unwrap().get().0.get());
}

#[test]
fn args_that_never_compare_equal_rebuild_every_render() {
    let runtime = Runtime::with_config(
        RuntimeConfig::default()
            .with_max_render_passes(4)
            .with_warn_on_stale_update(false),
    );
    let renders = Rc::new(Cell::new(0));
    let id = runtime
        .mount({
            let renders = renders.clone();
            move || {
                renders.set(renders.get() + 1);
                use_class_state(Counter::new, (renders.get(),));
                Ok(())
            }
        })
        .unwrap();

    runtime.render(id).unwrap();
    let err = runtime.flush().unwrap_err();
    assert!(matches!(err, RuntimeError::RenderLoop { .. }));
}

#[test]
#[should_panic(expected = "called outside of a component render")]
fn hook_outside_render_panics() {
    let _ = use_class_state(Counter::new, (0,));
}
