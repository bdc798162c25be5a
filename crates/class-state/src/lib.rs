//! # Stateful objects as component state
//!
//! `class-state` lets a component keep an instance of an ordinary Rust type
//! as its state and lets that instance ask for a re-render whenever it sees
//! fit, typically right after mutating itself.
//!
//! Two pieces cooperate:
//!
//! - [`ClassState`]: the capability a type needs, namely one [`UpdateSlot`] field.
//!   Derive it, or implement `update_slot` by hand.
//! - [`use_class_state`]: the hook. It builds the instance once, refreshes
//!   its update slot on every render, rebuilds it when the constructor
//!   arguments change, and hands back a stable [`Accessor`].
//!
//! ```rust
//! use std::cell::RefCell;
//! use class_state::prelude::*;
//!
//! #[derive(ClassState)]
//! struct Todos {
//!     items: RefCell<Vec<String>>,
//!     slot: UpdateSlot,
//! }
//!
//! impl Todos {
//!     fn new(first: &'static str) -> Self {
//!         Self {
//!             items: RefCell::new(vec![first.to_string()]),
//!             slot: UpdateSlot::new(),
//!         }
//!     }
//!
//!     fn add(&self, item: &str) {
//!         self.items.borrow_mut().push(item.to_string());
//!         update_class_state(self);
//!     }
//! }
//!
//! let runtime = Runtime::new();
//! let handle = std::rc::Rc::new(RefCell::new(None));
//! runtime
//!     .mount({
//!         let handle = handle.clone();
//!         move || {
//!             let todos = use_class_state(Todos::new, ("write docs",));
//!             *handle.borrow_mut() = Some(todos);
//!             Ok(())
//!         }
//!     })
//!     .unwrap();
//!
//! let todos = handle.borrow().clone().unwrap();
//! todos.get().add("ship it");
//! assert_eq!(runtime.flush().unwrap(), 1);
//! assert_eq!(todos.get().items.borrow().len(), 2);
//! ```
//!
//! The host side (mounting, flushing, other hooks) lives in
//! [`class_state_core`], re-exported here as [`runtime`].

extern crate self as class_state;

pub mod ctor;
pub mod hook;
pub mod prelude;
pub mod slot;

pub use class_state_core as runtime;

#[cfg(feature = "derive")]
pub use class_state_macros::ClassState;

pub use ctor::Constructor;
pub use hook::{Accessor, try_use_class_state, use_class_state};
pub use slot::{ClassState, UpdateSlot, update_class_state};
