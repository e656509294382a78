//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the config home.
const APP_DIR: &str = "movv";

/// Resolves the config file path.
///
/// Lookup order:
/// 1. `{dir}/config.toml` when `dir` is given.
/// 2. `$XDG_CONFIG_HOME/movv/config.toml` when set and non-empty.
/// 3. `$HOME/.config/movv/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

fn config_path_from(dir: Option<&Path>, xdg: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(base) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(base.join(APP_DIR).join(CONFIG_FILE));
    }
    match home.filter(|p| !p.as_os_str().is_empty()) {
        Some(home) => Ok(home
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE)),
        None => bail!("neither XDG_CONFIG_HOME nor HOME is set; pass --dir"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_takes_precedence() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let path = config_path_from(
            Some(&dir),
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/myproject/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path =
            config_path_from(None, Some(Path::new("/xdg")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/movv/config.toml"));
    }

    #[test]
    fn test_empty_xdg_falls_back_to_home() {
        // Arrange & Act
        let path = config_path_from(None, Some(Path::new("")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/movv/config.toml"));
    }

    #[test]
    fn test_no_location_is_error() {
        // Arrange & Act
        let result = config_path_from(None, None, None);

        // Assert
        assert!(result.unwrap_err().to_string().contains("pass --dir"));
    }
}
