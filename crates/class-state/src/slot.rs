use std::cell::RefCell;
use std::fmt;

use class_state_core::UpdateFn;

/// Reserved slot holding the update callback of a stateful object.
///
/// Starts out as a no-op, so an object may trigger updates before any
/// component has adopted it. [`use_class_state`](crate::use_class_state)
/// installs a fresh callback on every render.
#[derive(Default)]
pub struct UpdateSlot {
    update: RefCell<UpdateFn>,
}

impl UpdateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, update: UpdateFn) {
        *self.update.borrow_mut() = update;
    }

    /// The callback currently installed.
    pub fn current(&self) -> UpdateFn {
        self.update.borrow().clone()
    }

    pub fn trigger(&self) {
        // Cloned out so the callback may reinstall the slot.
        let update = self.current();
        update.call();
    }
}

impl fmt::Debug for UpdateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpdateSlot").field(&*self.update.borrow()).finish()
    }
}

/// Capability of objects that can be held by [`use_class_state`](crate::use_class_state).
///
/// Usually derived; any type exposing an [`UpdateSlot`] qualifies, whatever
/// else it is composed of.
pub trait ClassState: 'static {
    fn update_slot(&self) -> &UpdateSlot;

    /// Ask the owning component to re-render.
    fn trigger_update(&self) {
        self.update_slot().trigger();
    }
}

impl ClassState for UpdateSlot {
    fn update_slot(&self) -> &UpdateSlot {
        self
    }
}

/// Triggers an update on any [`ClassState`].
pub fn update_class_state<S: ClassState + ?Sized>(state: &S) {
    state.trigger_update();
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn trigger_before_install_is_harmless() {
        let slot = UpdateSlot::new();
        slot.trigger();
        update_class_state(&slot);
    }

    #[test]
    fn trigger_calls_installed_callback() {
        let calls = Rc::new(Cell::new(0));
        let slot = UpdateSlot::new();
        let update = {
            let calls = calls.clone();
            UpdateFn::new(move || calls.set(calls.get() + 1))
        };
        slot.install(update.clone());

        assert!(slot.current().ptr_eq(&update));
        slot.trigger();
        update_class_state(&slot);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn callback_may_reinstall_slot() {
        let slot = Rc::new(UpdateSlot::new());
        let reinstalled = {
            let slot = Rc::downgrade(&slot);
            UpdateFn::new(move || {
                if let Some(slot) = slot.upgrade() {
                    slot.install(UpdateFn::noop());
                }
            })
        };
        slot.install(reinstalled.clone());
        slot.trigger();
        assert!(!slot.current().ptr_eq(&reinstalled));
    }
}
