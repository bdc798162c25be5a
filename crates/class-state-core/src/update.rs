use std::fmt;
use std::rc::Rc;

use crate::runtime::with_frame;

/// Zero-argument callback that asks the owning component to re-render.
///
/// Each render cycle hands out a new `UpdateFn`; only the one from the latest
/// cycle has an effect.
#[derive(Clone)]
pub struct UpdateFn(Rc<dyn Fn()>);

impl UpdateFn {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// A callback that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn call(&self) {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for UpdateFn {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for UpdateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpdateFn").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// Re-render trigger bound to the current render cycle.
///
/// Does not occupy a retained slot, so it may be called conditionally.
pub fn use_update() -> UpdateFn {
    let (runtime, id, generation) =
        with_frame("use_update", |frame| (frame.runtime.clone(), frame.id, frame.generation));
    UpdateFn::new(move || match runtime.upgrade() {
        Some(runtime) => runtime.request_update(id, generation),
        None => log::trace!("update for component {id:?} after its runtime was dropped"),
    })
}
