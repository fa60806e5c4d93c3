use std::env;

pub const MAX_DEPTH_VAR: &str = "LOXWALK_MAX_DEPTH";
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Interpreter limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Deepest allowed nesting of grouping, unary chains and `if` bodies.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Reads `LOXWALK_MAX_DEPTH`, keeping the default when unset or invalid.
    pub fn from_env() -> Self {
        Self::from_value(env::var(MAX_DEPTH_VAR).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let mut config = Config::default();
        let Some(raw) = raw else {
            return config;
        };
        match raw.trim().parse::<usize>() {
            Ok(depth) if depth > 0 => config = config.with_max_depth(depth),
            _ => tracing::warn!(
                var = MAX_DEPTH_VAR,
                value = raw,
                default = DEFAULT_MAX_DEPTH,
                "ignoring invalid depth limit"
            ),
        }
        config
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
