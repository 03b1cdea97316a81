use anyhow::{Context, Result};
use randomizr_core::Config;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

const APP_ID: &str = "randomizr";
const CONFIG_FILE: &str = "config.json";

fn config_dir(app_id: &str) -> Option<PathBuf> {
    directories_next::ProjectDirs::from("", "", app_id)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Load the base configuration that command line flags are applied on top of.
///
/// An explicitly named file must load. Otherwise the per-user config file is
/// used if present, and built-in defaults if not.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read(path)
            .with_context(|| format!("unable to load config file {}", path.display()));
    }

    let Some(path) = config_dir(APP_ID)
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.is_file())
    else {
        return Ok(Config::default());
    };

    match read(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Ok(config)
        }
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "ignoring unreadable config file");
            Ok(Config::default())
        }
    }
}

fn read(path: &Path) -> Result<Config> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
