//! Environment constants and path utilities for taskr.
//!
//! This module centralizes the hardcoded file names and directories used
//! throughout the application, making them easier to maintain and modify.

use std::path::{Path, PathBuf};

/// Main application directory name (hidden directory like .git, .vscode)
pub const TASKR_DIR_NAME: &str = ".taskr";

/// Configuration file name inside [`TASKR_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "taskr.toml";

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "TASKR_CONFIG";

/// Separator between namespace segments in a task name
pub const NAMESPACE_SEPARATOR: &str = ":";

/// Group used for tasks without a category
pub const DEFAULT_TASK_GROUP: &str = "General";

/// Taskfile names accepted by discovery, in priority order
pub const TASKFILE_NAMES: &[&str] = &[
    "Taskfile.yml",
    "taskfile.yml",
    "Taskfile.yaml",
    "taskfile.yaml",
    "Taskfile.dist.yml",
    "taskfile.dist.yml",
    "Taskfile.dist.yaml",
    "taskfile.dist.yaml",
];

/// Table layout constants
pub mod table {
    /// Added to the longest task name to get the minimum name column width
    pub const MIN_COLUMN_WIDTH: usize = 4;

    /// Padding appended to every cell that is followed by another cell
    pub const TAB_PADDING: usize = 2;
}

/// Build the `.taskr` directory path from a root
pub fn taskr_dir_path(root: &Path) -> PathBuf {
    root.join(TASKR_DIR_NAME)
}

/// Build the local config file path (`<root>/.taskr/config.toml`)
pub fn local_config_file_path(root: &Path) -> PathBuf {
    taskr_dir_path(root).join(CONFIG_FILE_NAME)
}

/// Build the user config file path (`~/.taskr/config.toml`)
pub fn user_config_file_path(home: &Path) -> PathBuf {
    taskr_dir_path(home).join(CONFIG_FILE_NAME)
}

/// Build the fingerprint scratch directory for a Taskfile directory
pub fn fingerprint_dir_path(taskfile_dir: &Path) -> PathBuf {
    taskr_dir_path(taskfile_dir).join("checksum")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let root = Path::new("/work/project");
        assert_eq!(
            local_config_file_path(root),
            PathBuf::from("/work/project/.taskr/config.toml")
        );
        assert_eq!(
            fingerprint_dir_path(root),
            PathBuf::from("/work/project/.taskr/checksum")
        );
    }

    #[test]
    fn test_taskfile_names_prefer_capitalized_yml() {
        assert_eq!(TASKFILE_NAMES[0], "Taskfile.yml");
    }
}
