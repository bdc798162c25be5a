use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{RuntimeInner, with_frame};
use crate::{ComponentId, remember};

/// Retained value owned by one component. Every write schedules a re-render
/// of that component.
pub struct State<T: 'static> {
    inner: Rc<StateInner<T>>,
}

struct StateInner<T> {
    value: RefCell<T>,
    owner: Weak<RuntimeInner>,
    id: ComponentId,
}

impl<T: 'static> State<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    pub fn set(&self, value: T) {
        drop(self.replace(value));
    }

    /// Swaps in `value` and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        let old = self.inner.value.replace(value);
        self.invalidate();
        old
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut *self.inner.value.borrow_mut());
        self.invalidate();
    }

    /// Schedules a re-render of the owner without touching the value.
    pub fn invalidate(&self) {
        if let Some(runtime) = self.inner.owner.upgrade() {
            runtime.invalidate(self.inner.id);
        }
    }

    pub fn owner(&self) -> ComponentId {
        self.inner.id
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("owner", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .finish()
    }
}

/// Creates a state cell owned by the rendering component without retaining
/// it. Pair with `remember` when the cell is created lazily.
pub fn create_state<T: 'static>(value: T) -> State<T> {
    let (owner, id) = with_frame("create_state", |frame| (frame.runtime.clone(), frame.id));
    State {
        inner: Rc::new(StateInner {
            value: RefCell::new(value),
            owner,
            id,
        }),
    }
}

/// Order-based retained state; `init` runs on the first render only.
pub fn use_state<T: 'static>(init: impl FnOnce() -> T) -> State<T> {
    let state = remember(|| create_state(init()));
    (*state).clone()
}
