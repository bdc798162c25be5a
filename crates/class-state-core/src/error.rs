use thiserror::Error;

use crate::ComponentId;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("component {id:?} is not mounted")]
    ComponentNotFound { id: ComponentId },

    /// `render` was called while another render was in progress on this thread.
    #[error("cannot render component {id:?} from inside another render")]
    ReentrantRender { id: ComponentId },

    #[error("render of component {id:?} failed")]
    Render {
        id: ComponentId,
        #[source]
        source: anyhow::Error,
    },

    /// The component kept invalidating itself during a single flush.
    #[error("component {id:?} re-rendered {passes} times in one flush; giving up")]
    RenderLoop { id: ComponentId, passes: usize },
}
