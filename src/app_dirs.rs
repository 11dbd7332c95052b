use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("snapquiz");
            Some(state_dir.join("scores.db"))
        } else {
            ProjectDirs::from("", "", "snapquiz")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("scores.db"))
        }
    }

    pub fn results_log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "snapquiz")
            .map(|proj_dirs| proj_dirs.config_dir().join("results.csv"))
    }
}
