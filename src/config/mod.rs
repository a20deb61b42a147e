use crate::git::GitError;

/// Git config key that switches the hook on or off.
pub const HOOK_ENABLED_KEY: &str = "hooks.gitleaks";

/// Errors that can occur when reading or writing the hook setting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error("invalid boolean for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// A boolean key/value store, such as git's local config.
pub trait ConfigStore {
    /// Read a boolean; `Ok(None)` when the key is absent.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError>;

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError>;
}

/// Stored state of the hook setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Enabled,
    Disabled,
    Unset,
}

impl Setting {
    pub fn as_str(self) -> &'static str {
        match self {
            Setting::Enabled => "true",
            Setting::Disabled => "false",
            Setting::Unset => "unset",
        }
    }
}

impl From<Option<bool>> for Setting {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Setting::Enabled,
            Some(false) => Setting::Disabled,
            None => Setting::Unset,
        }
    }
}

/// Hook configuration, loaded once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookConfig {
    pub enabled: bool,
    /// True when this run wrote the default into the store.
    pub initialized: bool,
}

impl HookConfig {
    /// Read the setting without modifying the store.
    pub fn peek(store: &dyn ConfigStore) -> Result<Setting, ConfigError> {
        store.get_bool(HOOK_ENABLED_KEY).map(Setting::from)
    }

    /// Load the hook setting, enabling it in the store on first run.
    ///
    /// Unset and `true` both mean enabled; only an explicit `false` disables
    /// the hook. A store that cannot be read leaves the hook enabled and is
    /// not written to.
    pub fn load(store: &mut dyn ConfigStore) -> Self {
        match Self::peek(store) {
            Ok(Setting::Enabled) => HookConfig {
                enabled: true,
                initialized: false,
            },
            Ok(Setting::Disabled) => HookConfig {
                enabled: false,
                initialized: false,
            },
            Ok(Setting::Unset) => {
                let initialized = match store.set_bool(HOOK_ENABLED_KEY, true) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, key = HOOK_ENABLED_KEY, "could not persist default");
                        false
                    }
                };
                HookConfig {
                    enabled: true,
                    initialized,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, key = HOOK_ENABLED_KEY, "unreadable setting, hook stays enabled");
                HookConfig {
                    enabled: true,
                    initialized: false,
                }
            }
        }
    }
}
