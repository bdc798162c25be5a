pub use crate::ClassState;
pub use crate::{Accessor, UpdateSlot, try_use_class_state, update_class_state, use_class_state};
pub use class_state_core::prelude::*;
