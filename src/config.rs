//! Server configuration.
//!
//! A [`DashboardConfig`] is built once at startup (from the CLI) and handed
//! to the router by `Arc`. Handlers never consult process-wide state.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: i64 = 8081;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub port: u16,
    /// Contribution history JSON file, re-read on every request.
    pub data_file: PathBuf,
    /// Directory served for `/` and static assets.
    pub static_root: PathBuf,
    /// Markup file inside `static_root` served for `/`.
    pub index_file: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT as u16
}
fn default_data_file() -> PathBuf {
    PathBuf::from("shared/contribution-history.json")
}
fn default_static_root() -> PathBuf {
    PathBuf::from("dashboard")
}
fn default_index_file() -> String {
    "pr-dashboard.html".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_file: default_data_file(),
            static_root: default_static_root(),
            index_file: default_index_file(),
        }
    }
}

impl DashboardConfig {
    /// Validate CLI values and resolve paths to absolute form.
    ///
    /// `port` arrives as a wide integer so out-of-range values produce the
    /// same message whether they are negative, zero, or too large.
    pub fn from_cli(port: i64, data_file: Option<PathBuf>) -> Result<Self> {
        if !(1..=65535).contains(&port) {
            bail!("Port must be between 1 and 65535");
        }

        let defaults = Self::default();
        let data_file = data_file.unwrap_or(defaults.data_file);

        Ok(Self {
            port: port as u16,
            data_file: absolute(&data_file)?,
            static_root: absolute(&defaults.static_root)?,
            index_file: defaults.index_file,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_root.join(&self.index_file)
    }
}

/// Resolve `path` to a canonical absolute path.
///
/// `..` components and symlinks are resolved whenever the path, or at least
/// its parent directory, exists. A path with no existing parent is only made
/// absolute, since it may be created after startup.
fn absolute(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return Ok(canonical);
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(dir) = std::fs::canonicalize(parent) {
            return Ok(dir.join(name));
        }
    }

    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_ports() {
        for port in [0, -1, 65536, 100_000] {
            let err = DashboardConfig::from_cli(port, None).unwrap_err();
            assert_eq!(err.to_string(), "Port must be between 1 and 65535");
        }
    }

    #[test]
    fn test_accepts_port_bounds() {
        assert_eq!(DashboardConfig::from_cli(1, None).unwrap().port, 1);
        assert_eq!(DashboardConfig::from_cli(65535, None).unwrap().port, 65535);
    }

    #[test]
    fn test_paths_are_absolute() {
        let cfg = DashboardConfig::from_cli(8081, Some(PathBuf::from("data/history.json"))).unwrap();
        assert!(cfg.data_file.is_absolute());
        assert!(cfg.data_file.ends_with("data/history.json"));
        assert!(cfg.static_root.is_absolute());
        assert!(cfg.index_path().ends_with("dashboard/pr-dashboard.html"));
    }

    #[test]
    fn test_existing_paths_are_canonical() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        let file = tmp.path().join("h.json");
        std::fs::write(&file, "{}").unwrap();

        let cfg = DashboardConfig::from_cli(8081, Some(tmp.path().join("sub/../h.json"))).unwrap();
        assert_eq!(cfg.data_file, std::fs::canonicalize(&file).unwrap());
    }

    #[test]
    fn test_missing_file_in_existing_dir_is_canonical() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();

        let resolved = absolute(&tmp.path().join("sub/../later.json")).unwrap();
        assert_eq!(
            resolved,
            std::fs::canonicalize(tmp.path()).unwrap().join("later.json")
        );
    }

    #[test]
    fn test_default_data_file() {
        let cfg = DashboardConfig::from_cli(DEFAULT_PORT, None).unwrap();
        assert!(cfg.data_file.ends_with("shared/contribution-history.json"));
    }
}
