//! # Components, Render Cycles, and Effects
//!
//! `class-state-core` is the small host runtime the `class-state` hook is
//! built on. It owns mounted components and drives their render cycles. It
//! also provides the three primitives a hook needs from its host:
//!
//! - `remember*` / `use_state`: per call-site storage retained across renders.
//! - `use_update`: a callback bound to the current render cycle that asks for
//!   a re-render.
//! - `use_effect` / `use_update_effect` / `disposable_effect`: work deferred
//!   until after the render, gated on a dependency value changing.
//!
//! ## Mounting and flushing
//!
//! ```rust
//! use class_state_core::*;
//!
//! let runtime = Runtime::new();
//! let id = runtime
//!     .mount(|| {
//!         let clicks = use_state(|| 0);
//!         log::info!("clicks = {}", clicks.get());
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(runtime.render_count(id), Some(1));
//! assert_eq!(runtime.flush().unwrap(), 0);
//! ```
//!
//! `mount` performs the first render. Writes to a `State` or calls to an
//! `UpdateFn` only mark the component dirty; `flush` re-renders every dirty
//! component until the runtime is idle.
//!
//! ## Retained slots
//!
//! - `remember` and `use_state` are order-based: the Nth call in a render
//!   always refers to the Nth stored value.
//! - `remember_with_key` is key-based and stable across conditional branches.
//!
//! ## Re-render triggers
//!
//! `use_update()` returns a fresh `UpdateFn` every render. Only the trigger
//! from the latest render cycle is honoured; a trigger captured by an older
//! cycle is ignored (and logged), and a trigger whose component has been
//! unmounted does nothing.
//!
//! ## Deferred effects
//!
//! Effects queued during a render run after it completes, in call order, and
//! are discarded if the render fails:
//!
//! ```rust
//! use class_state_core::*;
//!
//! let runtime = Runtime::new();
//! runtime
//!     .mount(|| {
//!         let name = use_state(|| "world".to_string());
//!         use_effect(name.get(), |name| log::info!("hello, {name}"));
//!         Ok(())
//!     })
//!     .unwrap();
//! ```

pub mod config;
pub mod effects;
pub mod error;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod state;
pub mod update;


pub use config::*;
pub use effects::*;
pub use error::*;
pub use prelude::*;
pub use runtime::*;
pub use state::*;
pub use update::*;
