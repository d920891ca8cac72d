use crate::error::{CoreError, Result};
use std::path::{Path, PathBuf};

pub const CCM_DIR: &str = ".ccm";
pub const CONFIG_FILE: &str = "config.yaml";

pub fn ccm_dir(home: &Path) -> PathBuf {
    home.join(CCM_DIR)
}

pub fn config_path(home: &Path) -> PathBuf {
    ccm_dir(home).join(CONFIG_FILE)
}

/// `~/.ccm/config.yaml` for the current user.
pub fn default_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(CoreError::HomeNotFound)?;
    Ok(config_path(&home))
}
