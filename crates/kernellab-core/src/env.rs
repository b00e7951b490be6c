//! Environment variable helpers used by `ModuleConfig::from_env()` and
//! the logger.
//!
//! ```ignore
//! use kernellab_core::env::{env_get, env_get_bool};
//!
//! let prefix: String = env_get("KLAB_DEVICE_PREFIX", "kernellab".to_string());
//! let debug = env_get_bool("KLAB_DEBUG_LOGGING", false);
//! ```

use std::str::FromStr;
use std::time::Duration;

/// Parse `key` as `T`, falling back to `default` when unset or unparsable
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T`, `None` when unset or unparsable
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Boolean flag: "1", "true", "yes", "on" (any case) are true, anything
/// else set is false, unset is `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Milliseconds in `key` as a `Duration`
#[inline]
pub fn env_get_millis(key: &str, default: Duration) -> Duration {
    env_get_opt::<u64>(key).map(Duration::from_millis).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_returns_default() {
        let val: usize = env_get("__KLAB_TEST_UNSET__", 42);
        assert_eq!(val, 42);
        assert!(env_get_opt::<u32>("__KLAB_TEST_UNSET__").is_none());
        assert!(env_get_bool("__KLAB_TEST_UNSET__", true));
        assert_eq!(
            env_get_millis("__KLAB_TEST_UNSET__", Duration::from_millis(7)),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn test_set_values() {
        std::env::set_var("__KLAB_TEST_NUM__", " 123 ");
        let val: usize = env_get("__KLAB_TEST_NUM__", 0);
        assert_eq!(val, 123);
        assert_eq!(
            env_get_millis("__KLAB_TEST_NUM__", Duration::ZERO),
            Duration::from_millis(123)
        );
        std::env::remove_var("__KLAB_TEST_NUM__");
    }

    #[test]
    fn test_bool_variants() {
        for on in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var("__KLAB_TEST_BOOL__", on);
            assert!(env_get_bool("__KLAB_TEST_BOOL__", false), "{}", on);
        }
        for off in ["0", "false", "garbage"] {
            std::env::set_var("__KLAB_TEST_BOOL__", off);
            assert!(!env_get_bool("__KLAB_TEST_BOOL__", true), "{}", off);
        }
        std::env::remove_var("__KLAB_TEST_BOOL__");
    }

    #[test]
    fn test_invalid_parse_falls_back() {
        std::env::set_var("__KLAB_TEST_INVALID__", "not_a_number");
        let val: usize = env_get("__KLAB_TEST_INVALID__", 99);
        assert_eq!(val, 99);
        std::env::remove_var("__KLAB_TEST_INVALID__");
    }
}
