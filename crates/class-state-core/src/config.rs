/// Tunables for a [`Runtime`](crate::Runtime).
///
/// ```rust
/// use class_state_core::RuntimeConfig;
///
/// let config = RuntimeConfig::default()
///     .with_max_render_passes(16)
///     .with_warn_on_stale_update(false);
/// assert_eq!(config.max_render_passes, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    /// Renders of a single component allowed within one `flush` before it is
    /// reported as a render loop.
    pub max_render_passes: usize,
    /// Log a warning when an `UpdateFn` from a replaced render cycle is called.
    pub warn_on_stale_update: bool,
}

impl RuntimeConfig {
    pub const DEFAULT_MAX_RENDER_PASSES: usize = 100;

    pub fn with_max_render_passes(mut self, passes: usize) -> Self {
        self.max_render_passes = passes.max(1);
        self
    }

    pub fn with_warn_on_stale_update(mut self, warn: bool) -> Self {
        self.warn_on_stale_update = warn;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_render_passes: Self::DEFAULT_MAX_RENDER_PASSES,
            warn_on_stale_update: true,
        }
    }
}
