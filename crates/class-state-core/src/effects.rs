use std::cell::RefCell;
use std::rc::Rc;

use crate::remember;
use crate::runtime::defer;
use crate::scope::current_scope;

#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }
}

/// Helper to build the cleanup returned from `disposable_effect`.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// Runs `effect` after the render whenever `deps` differs from the value seen
/// by the last committed run, including the first render.
pub fn use_effect<K: PartialEq + 'static>(deps: K, effect: impl FnOnce(&K) + 'static) {
    let last = remember(|| RefCell::new(None::<K>));
    if last.borrow().as_ref() == Some(&deps) {
        return;
    }
    defer(move || {
        effect(&deps);
        *last.borrow_mut() = Some(deps);
    });
}

/// Like [`use_effect`], but skips the first render of the call-site.
///
/// Dependencies are committed after the render, so a failed render does not
/// swallow a change.
pub fn use_update_effect<K: PartialEq + 'static>(deps: K, effect: impl FnOnce(&K) + 'static) {
    let last = remember(|| RefCell::new(None::<K>));
    let first = match last.borrow().as_ref() {
        None => true,
        Some(prev) if *prev == deps => return,
        Some(_) => false,
    };
    defer(move || {
        if !first {
            effect(&deps);
        }
        *last.borrow_mut() = Some(deps);
    });
}

/// cleanup on key change or unmount
pub fn disposable_effect<K: PartialEq + 'static>(
    deps: K,
    effect: impl FnOnce(&K) -> Dispose + 'static,
) {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| {
        let slot = Rc::new(RefCell::new(None::<Dispose>));
        // One unmount disposer per call-site.
        if let Some(scope) = current_scope() {
            let slot = slot.clone();
            scope.add_disposer(move || {
                let cleanup = slot.borrow_mut().take();
                if let Some(d) = cleanup {
                    d.run();
                }
            });
        }
        slot
    });

    if last_key.borrow().as_ref() == Some(&deps) {
        return;
    }
    defer(move || {
        let previous = cleanup_slot.borrow_mut().take();
        if let Some(d) = previous {
            d.run();
        }
        let d = effect(&deps);
        *cleanup_slot.borrow_mut() = Some(d);
        *last_key.borrow_mut() = Some(deps);
    });
}
