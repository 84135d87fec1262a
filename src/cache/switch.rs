//! Global disable switch
//!
//! Caching can be turned off for a whole process by setting
//! `MEMOCACHE_DISABLE_CACHE` to any value. The variable is read once.

use std::sync::OnceLock;

/// Environment variable that disables caching when present.
pub const DISABLE_ENV_VAR: &str = "MEMOCACHE_DISABLE_CACHE";

static PROCESS_SWITCH: OnceLock<DisableSwitch> = OnceLock::new();

/// Whether memoization is active. Copied into each wrapper at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisableSwitch {
    disabled: bool,
}

impl DisableSwitch {
    /// Caching on.
    pub const fn enabled() -> Self {
        Self { disabled: false }
    }

    /// Caching off: wrappers become pure pass-through.
    pub const fn disabled() -> Self {
        Self { disabled: true }
    }

    /// Process-wide value, read from the environment on first access and
    /// fixed afterwards.
    pub fn from_env() -> Self {
        *PROCESS_SWITCH.get_or_init(Self::read_env)
    }

    /// Reads the environment now, bypassing the process-wide value.
    pub fn read_env() -> Self {
        Self {
            disabled: std::env::var_os(DISABLE_ENV_VAR).is_some(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(!DisableSwitch::enabled().is_disabled());
        assert!(DisableSwitch::disabled().is_disabled());
        assert_eq!(DisableSwitch::default(), DisableSwitch::enabled());
    }

    #[test]
    fn test_any_value_disables() {
        temp_env::with_var(DISABLE_ENV_VAR, Some(""), || {
            assert!(DisableSwitch::read_env().is_disabled());
        });
        temp_env::with_var(DISABLE_ENV_VAR, Some("0"), || {
            assert!(DisableSwitch::read_env().is_disabled());
        });
    }

    #[test]
    fn test_unset_enables() {
        temp_env::with_var_unset(DISABLE_ENV_VAR, || {
            assert!(!DisableSwitch::read_env().is_disabled());
        });
    }

    #[test]
    fn test_process_value_is_fixed() {
        let first = DisableSwitch::from_env();
        let flipped = !first.is_disabled();
        let value = flipped.then_some("1");

        temp_env::with_var(DISABLE_ENV_VAR, value, || {
            assert_eq!(DisableSwitch::from_env(), first);
        });
    }
}
