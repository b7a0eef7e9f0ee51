use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Overrides the directory holding config.json and stats.json
pub const HOME_ENV: &str = "PIGAME_HOME";

/// Where this process keeps its persisted records. Resolved once in `main`
/// and handed to the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    pub config_file: PathBuf,
    pub stats_file: PathBuf,
}

impl AppContext {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            config_file: dir.join("config.json"),
            stats_file: dir.join("stats.json"),
        }
    }

    pub fn resolve() -> Self {
        Self::in_dir(Self::data_dir())
    }

    fn data_dir() -> PathBuf {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            PathBuf::from(home)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "pigame") {
            proj_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from(".pigame")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_places_both_files() {
        let ctx = AppContext::in_dir("/tmp/somewhere");
        assert_eq!(ctx.config_file, PathBuf::from("/tmp/somewhere/config.json"));
        assert_eq!(ctx.stats_file, PathBuf::from("/tmp/somewhere/stats.json"));
    }
}
