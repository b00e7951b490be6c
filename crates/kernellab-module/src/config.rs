//! Module configuration
//!
//! Library defaults with environment overrides, in the usual priority:
//!
//! 1. Builder calls
//! 2. Environment variables
//! 3. Library defaults
//!
//! ```rust,ignore
//! use kernellab_module::config::ModuleConfig;
//!
//! let config = ModuleConfig::from_env().device_prefix("klab");
//! ```

use std::time::Duration;

use kernellab_core::env::{env_get, env_get_bool, env_get_millis};
use kernellab_core::error::{ModuleError, ModuleResult};
use kernellab_core::semaphore::DEFAULT_POLL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Device nodes are named `<prefix>1` and `<prefix>2`
    pub device_prefix: String,
    /// Device class the nodes belong to
    pub class_name: String,
    /// Directory holding `current_count`, `pid_count`, `all_count`
    pub attr_dir: String,
    /// How often an interruptible wait re-checks its interrupt token
    pub interrupt_poll: Duration,
    /// Raise the log level to debug at start-up
    pub debug_logging: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            device_prefix: "kernellab".to_string(),
            class_name: "sty16".to_string(),
            attr_dir: "kernellab".to_string(),
            interrupt_poll: DEFAULT_POLL,
            debug_logging: false,
        }
    }
}

impl ModuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides
    ///
    /// Environment variables (all optional):
    /// - `KLAB_DEVICE_PREFIX`
    /// - `KLAB_CLASS_NAME`
    /// - `KLAB_ATTR_DIR`
    /// - `KLAB_INTERRUPT_POLL_MS`
    /// - `KLAB_DEBUG_LOGGING` (0/1)
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            device_prefix: env_get("KLAB_DEVICE_PREFIX", d.device_prefix),
            class_name: env_get("KLAB_CLASS_NAME", d.class_name),
            attr_dir: env_get("KLAB_ATTR_DIR", d.attr_dir),
            interrupt_poll: env_get_millis("KLAB_INTERRUPT_POLL_MS", d.interrupt_poll),
            debug_logging: env_get_bool("KLAB_DEBUG_LOGGING", d.debug_logging),
        }
    }

    pub fn device_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.device_prefix = prefix.into();
        self
    }

    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn attr_dir(mut self, dir: impl Into<String>) -> Self {
        self.attr_dir = dir.into();
        self
    }

    pub fn interrupt_poll(mut self, d: Duration) -> Self {
        self.interrupt_poll = d;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    pub fn validate(&self) -> ModuleResult<()> {
        if self.device_prefix.is_empty() {
            return Err(ModuleError::InvalidConfig("device_prefix must not be empty"));
        }
        if self.class_name.is_empty() {
            return Err(ModuleError::InvalidConfig("class_name must not be empty"));
        }
        if self.attr_dir.is_empty() {
            return Err(ModuleError::InvalidConfig("attr_dir must not be empty"));
        }
        if self.interrupt_poll.is_zero() {
            return Err(ModuleError::InvalidConfig("interrupt_poll must be non-zero"));
        }
        Ok(())
    }
}
