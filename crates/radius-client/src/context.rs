//! Process-wide runtime settings, built once at start-up

/// Program identity and debug mode.
///
/// Created in `main` and handed to the components that print diagnostics.
/// Nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    program_name: String,
    debug: bool,
}

impl Context {
    pub fn new(program_name: impl Into<String>) -> Self {
        Context {
            program_name: program_name.into(),
            debug: false,
        }
    }

    /// Program name taken from `argv[0]`, without its directory
    pub fn from_env() -> Self {
        let name = std::env::args()
            .next()
            .as_deref()
            .and_then(|arg0| std::path::Path::new(arg0).file_name())
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        Context::new(name)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn log_filter(&self, configured: Option<&str>) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            configured.unwrap_or("info").to_string()
        }
    }

    /// Prefix a message with the program name
    pub fn diagnostic(&self, message: impl std::fmt::Display) -> String {
        format!("{}: {}", self.program_name, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        let context = Context::new("radclient");
        assert_eq!(context.log_filter(None), "info");
        assert_eq!(context.log_filter(Some("warn")), "warn");
        assert_eq!(context.with_debug(true).log_filter(Some("warn")), "debug");
    }

    #[test]
    fn test_diagnostic_prefix() {
        let context = Context::new("radclient");
        assert_eq!(context.diagnostic("no server"), "radclient: no server");
    }

    #[test]
    fn test_from_env_has_name() {
        assert!(!Context::from_env().program_name().is_empty());
    }
}
