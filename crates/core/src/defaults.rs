//! Persisted custom parameter defaults.
//!
//! A flat YAML mapping with two keys, `gzip` and `threads`. Loading never
//! fails: a missing file means the built-in defaults, and a corrupt one is
//! logged and ignored.

use std::fs::{self, File};
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default)]
    pub gzip: bool,
    #[serde(default = "default_threads")]
    pub threads: String,
}

fn default_threads() -> String {
    "1".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            gzip: false,
            threads: default_threads(),
        }
    }
}

fn read_defaults(path: &str) -> Result<Defaults> {
    let reader = File::open(path)
        .map_err(|e| Error::io_error("defaults".to_string(), path.to_string(), e))?;

    serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "defaults".to_string(),
            path.to_string(),
            e,
        )
    })
}

/// Loads the defaults stored at `path`, falling back to [`Defaults::default`].
pub fn load_defaults(path: &str) -> Defaults {
    if !Path::exists(Path::new(path)) {
        return Defaults::default();
    }

    match read_defaults(path) {
        Ok(defaults) => {
            info!("Loaded custom defaults from `{path}`");
            defaults
        }
        Err(e) => {
            error!("Error loading defaults: {e}");
            Defaults::default()
        }
    }
}

/// Writes `defaults` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn save_defaults(path: &str, defaults: &Defaults) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io_error(
                "defaults directory".to_string(),
                parent.display().to_string(),
                e,
            )
        })?;
    }

    let writer = File::create(path)
        .map_err(|e| Error::io_error("defaults".to_string(), path.to_string(), e))?;

    serde_yaml::to_writer(writer, defaults).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "defaults".to_string(),
            path.to_string(),
            e,
        )
    })?;

    info!("Saved custom defaults to `{path}`");
    Ok(())
}
