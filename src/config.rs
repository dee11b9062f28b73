//! Countgate configuration.

use crate::policy::gate::FeatureGate;
use crate::policy::mode::FeatureMode;
use crate::store::kv::FileStore;
use crate::GateError;
use once_cell::sync::Lazy;

/// Name of the build-time mode variable.
pub const FEATURE_MODE_KEY: &str = "FEATURE_MODE";

/// Store namespace used when none is given.
pub const DEFAULT_STORE_NAMESPACE: &str = "idolcountdown";

/// Mode baked in at compile time, resolved once per process.
static BUILD_MODE: Lazy<FeatureMode> =
    Lazy::new(|| FeatureMode::from_config_value(option_env!("FEATURE_MODE")));

/// The `FEATURE_MODE` this binary was compiled with.
pub fn build_mode() -> FeatureMode {
    *BUILD_MODE
}

/// Configuration for the app-side gate and its stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Build-time override for Free/Pro behavior.
    pub feature_mode: FeatureMode,

    /// Directory name under the platform data dir for persisted state.
    /// Each app build sharing state with its widget should use the same one.
    pub store_namespace: &'static str,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(FeatureMode::Normal)
    }
}

impl GateConfig {
    /// Configuration for an explicit mode.
    pub fn new(feature_mode: FeatureMode) -> Self {
        Self {
            feature_mode,
            store_namespace: DEFAULT_STORE_NAMESPACE,
        }
    }

    /// Configuration from the mode compiled into this binary.
    pub fn from_build() -> Self {
        Self::new(build_mode())
    }

    /// Configuration from the running process environment.
    ///
    /// Intended for tooling; shipped binaries should use [`Self::from_build`].
    pub fn from_env() -> Self {
        let raw = std::env::var(FEATURE_MODE_KEY).ok();
        Self::from_mode_str(raw.as_deref())
    }

    /// Configuration from a raw mode value. Unset or unrecognized values
    /// resolve to `NORMAL`.
    pub fn from_mode_str(raw: Option<&str>) -> Self {
        Self::new(FeatureMode::from_config_value(raw))
    }

    /// Use a different store namespace.
    pub fn with_namespace(mut self, store_namespace: &'static str) -> Self {
        self.store_namespace = store_namespace;
        self
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.store_namespace.is_empty() {
            return Err(GateError::ConfigError(
                "store_namespace cannot be empty".to_string(),
            ));
        }
        if self.store_namespace.contains(&['/', '\\'][..]) || self.store_namespace.contains("..") {
            return Err(GateError::ConfigError(format!(
                "store_namespace must be a single directory name, got {:?}",
                self.store_namespace
            )));
        }
        Ok(())
    }

    /// Build the feature gate for this configuration.
    pub fn gate(&self) -> FeatureGate {
        FeatureGate::new(self.feature_mode)
    }

    /// Open the file-backed store for this configuration's namespace.
    pub fn open_store(&self) -> Result<FileStore, GateError> {
        self.validate()?;
        FileStore::new(self.store_namespace)
    }
}
