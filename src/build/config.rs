//! Build driver configuration.

use std::path::PathBuf;

use tracing::warn;

/// SDK image tag used when `DOTNET_VERSION` is unset.
pub const DEFAULT_DOTNET_VERSION: &str = "9.0.300";

/// Environment variable selecting the SDK image tag.
pub const DOTNET_VERSION_ENV_VAR: &str = "DOTNET_VERSION";

/// Repository of the containerized .NET SDK.
pub const SDK_IMAGE: &str = "mcr.microsoft.com/dotnet/sdk";

/// Container engine executable used when none is given.
pub const DEFAULT_ENGINE: &str = "docker";

/// Where the project source lives inside the container.
pub const CONTAINER_WORKDIR: &str = "/src";

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub engine: String,
    pub sdk_version: String,
    /// Host directory copied into the container.
    pub source: PathBuf,
    pub workdir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            sdk_version: DEFAULT_DOTNET_VERSION.to_string(),
            source: PathBuf::from("."),
            workdir: CONTAINER_WORKDIR.to_string(),
        }
    }
}

impl BuildConfig {
    pub fn new(engine: impl Into<String>, sdk_version: &str, source: impl Into<PathBuf>) -> Self {
        let sdk_version = match sdk_version.trim() {
            "" => {
                warn!(
                    "Empty {} value, using default {}",
                    DOTNET_VERSION_ENV_VAR, DEFAULT_DOTNET_VERSION
                );
                DEFAULT_DOTNET_VERSION.to_string()
            }
            v => v.to_string(),
        };

        Self {
            engine: engine.into(),
            sdk_version,
            source: source.into(),
            workdir: CONTAINER_WORKDIR.to_string(),
        }
    }

    /// Fully qualified SDK image reference.
    pub fn image(&self) -> String {
        format!("{}:{}", SDK_IMAGE, self.sdk_version)
    }
}
