//! Build configuration for the front-end bundle.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// How the front-end is packaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ExportMode {
    /// Pre-rendered files, servable without an application runtime.
    #[default]
    #[serde(rename = "export", alias = "static")]
    Static,
    /// Served by a running application server.
    #[serde(rename = "standalone")]
    Standalone,
}

/// Image pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImageSettings {
    /// Skip on-demand image transformation.
    pub unoptimized: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self { unoptimized: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    pub output: ExportMode,
    #[serde(default)]
    pub images: ImageSettings,
    pub out_dir: PathBuf,
    /// Copied verbatim into the bundle when it exists.
    pub public_dir: PathBuf,
    /// Twin API base URL handed to the chat widget.
    pub api_url: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output: ExportMode::Static,
            images: ImageSettings::default(),
            out_dir: PathBuf::from("out"),
            public_dir: PathBuf::from("public"),
            api_url: "http://localhost:8000".to_string(),
        }
    }
}

impl ExportSettings {
    /// Check the settings can produce a static bundle.
    pub fn validate(&self) -> Result<()> {
        if self.output != ExportMode::Static {
            return Err(Error::Export(
                "export mode must be `export` to build a static bundle".to_string(),
            ));
        }
        if !self.images.unoptimized {
            return Err(Error::Export(
                "image optimization needs a server; set `images.unoptimized: true`".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_static_and_unoptimized() {
        let settings = ExportSettings::default();
        assert_eq!(settings.output, ExportMode::Static);
        assert!(settings.images.unoptimized);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_static_with_optimized_images_rejected() {
        let settings = ExportSettings {
            images: ImageSettings { unoptimized: false },
            ..ExportSettings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Export(_))));
    }

    #[test]
    fn test_standalone_rejected_for_export() {
        let settings = ExportSettings {
            output: ExportMode::Standalone,
            ..ExportSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_mode_accepts_static_alias() {
        let mode: ExportMode = serde_json::from_str("\"static\"").unwrap();
        assert_eq!(mode, ExportMode::Static);
        let mode: ExportMode = serde_json::from_str("\"export\"").unwrap();
        assert_eq!(mode, ExportMode::Static);
    }
}
