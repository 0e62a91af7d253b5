/// Configuration for a [`Toolkit`](crate::Toolkit).
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for the recursive parent walk performed when an
    /// inheritable attribute is reset.
    pub max_inherit_depth: usize,
    /// Apply class defaults to freshly created objects.
    pub apply_defaults_on_create: bool,
    /// Propagate inheritable sets to children without their own value.
    pub notify_children: bool,
    /// Emit a `trace!` event for every dispatch decision.
    pub trace_dispatch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_inherit_depth: 64,
            apply_defaults_on_create: true,
            notify_children: true,
            trace_dispatch: false,
        }
    }
}

impl Config {
    pub const ENV_MAX_INHERIT_DEPTH: &'static str = "TRELLIS_MAX_INHERIT_DEPTH";
    pub const ENV_TRACE_DISPATCH: &'static str = "TRELLIS_TRACE_DISPATCH";

    /// Defaults overridden by `TRELLIS_MAX_INHERIT_DEPTH` and
    /// `TRELLIS_TRACE_DISPATCH` when present and well formed.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(depth) = std::env::var(Self::ENV_MAX_INHERIT_DEPTH) {
            match depth.trim().parse() {
                Ok(depth) => config.max_inherit_depth = depth,
                Err(_) => tracing::warn!(
                    "Ignoring {}={:?}: not a number",
                    Self::ENV_MAX_INHERIT_DEPTH,
                    depth
                ),
            }
        }
        if let Ok(trace) = std::env::var(Self::ENV_TRACE_DISPATCH) {
            config.trace_dispatch = matches!(
                trace.trim().to_ascii_lowercase().as_str(),
                "1" | "yes" | "true" | "on"
            );
        }
        config
    }

    pub fn max_inherit_depth(mut self, depth: usize) -> Self {
        self.max_inherit_depth = depth;
        self
    }

    pub fn apply_defaults_on_create(mut self, enabled: bool) -> Self {
        self.apply_defaults_on_create = enabled;
        self
    }

    pub fn notify_children(mut self, enabled: bool) -> Self {
        self.notify_children = enabled;
        self
    }

    pub fn trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }
}
