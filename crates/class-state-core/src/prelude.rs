pub use crate::config::RuntimeConfig;
pub use crate::effects::{Dispose, disposable_effect, on_unmount, use_effect, use_update_effect};
pub use crate::error::RuntimeError;
pub use crate::runtime::{ComponentId, Runtime, remember, remember_with_key};
pub use crate::scope::{Scope, current_scope};
pub use crate::state::{State, create_state, use_state};
pub use crate::update::{UpdateFn, use_update};
