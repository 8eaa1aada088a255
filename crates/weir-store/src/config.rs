//! Service configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Append-time limits and gates for
/// [`StreamService`](crate::service::StreamService).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Largest serialized payload the service accepts, in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    /// Gate membership-sensitive events on the stream's current
    /// membership state.
    #[serde(default = "default_true")]
    pub enforce_membership: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
            enforce_membership: default_true(),
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

const fn default_max_payload_bytes() -> usize {
    1024 * 1024
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = ServiceConfig::load(&dir.path().join("weir.toml")).expect("load");
        assert_eq!(cfg.max_payload_bytes, 1024 * 1024);
        assert!(cfg.enforce_membership);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weir.toml");
        std::fs::write(&path, "max_payload_bytes = 4096\n").expect("write config");

        let cfg = ServiceConfig::load(&path).expect("load");
        assert_eq!(cfg.max_payload_bytes, 4096);
        assert!(cfg.enforce_membership);
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weir.toml");
        std::fs::write(&path, "max_payload_bytes = 512\nenforce_membership = false\n")
            .expect("write config");

        let cfg = ServiceConfig::load(&path).expect("load");
        assert_eq!(cfg.max_payload_bytes, 512);
        assert!(!cfg.enforce_membership);
    }

    #[test]
    fn unparseable_file_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weir.toml");
        std::fs::write(&path, "max_payload_bytes = \"lots\"\n").expect("write config");

        let err = ServiceConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("weir.toml"));
    }
}
