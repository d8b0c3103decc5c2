//! File-backed task setting store.
//!
//! Each task is one JSON file named `{name}_data.json`, indented with four
//! spaces:
//! ```text
//! {dir}/
//! ├── daily_data.json
//! └── weekly_data.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DigestError, Result};
use crate::task::types::TaskSetting;

/// File name suffix of task setting files.
const FILE_SUFFIX: &str = "_data.json";

/// Maximum task name length in characters.
const MAX_NAME_LENGTH: usize = 100;

/// Directory of task setting files.
#[derive(Debug, Clone)]
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    /// Create a store over `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the task files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of all stored tasks, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir)?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix(FILE_SUFFIX))
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Load every readable task. Files that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<TaskSetting>> {
        let mut settings = Vec::new();
        for name in self.names()? {
            match self.load(&name) {
                Ok(setting) => settings.push(setting),
                Err(e) => warn!(task = %name, "Skipping unreadable task setting: {}", e),
            }
        }
        Ok(settings)
    }

    /// Load one task by name.
    pub fn load(&self, name: &str) -> Result<TaskSetting> {
        validate_task_name(name)?;
        let path = self.path_for(name);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DigestError::NotFound(format!("task '{}'", name)));
            }
            Err(e) => return Err(e.into()),
        };

        let mut setting: TaskSetting = serde_json::from_str(&content)
            .map_err(|e| DigestError::Settings(format!("{}: {}", path.display(), e)))?;
        setting.setting_name = name.to_string();
        Ok(setting)
    }

    /// Save a task under `name`, replacing any existing file.
    pub fn save(&self, name: &str, setting: &TaskSetting) -> Result<PathBuf> {
        validate_task_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);
        let mut json = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
        setting.serialize(&mut serializer)?;
        fs::write(&path, json)?;
        debug!(task = %name, path = %path.display(), "Saved task setting");
        Ok(path)
    }

    /// Delete a task. Returns `false` if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        validate_task_name(name)?;
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, FILE_SUFFIX))
    }
}

/// Check that a task name is usable as a file name.
pub fn validate_task_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DigestError::Validation(
            "task name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DigestError::Validation(format!(
            "task name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name == "." || name == ".." {
        return Err(DigestError::Validation(format!("invalid task name: {}", name)));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(DigestError::Validation(format!(
            "task name contains invalid characters: {}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setting(user: &str) -> TaskSetting {
        TaskSetting {
            user_name: user.to_string(),
            wiki_id: "w1".to_string(),
            page_id: "p1".to_string(),
            page_title: "뉴스".to_string(),
            ..TaskSetting::default()
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());

        let path = store.save("daily", &setting("kim")).unwrap();
        assert!(path.ends_with("daily_data.json"));

        let loaded = store.load("daily").unwrap();
        assert_eq!(loaded.setting_name, "daily");
        assert_eq!(loaded.user_name, "kim");
        assert_eq!(loaded.page_title, "뉴스");
    }

    #[test]
    fn test_saved_file_is_pretty_utf8() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        let path = store.save("daily", &setting("홍길동")).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("\n    \"user_name\": \"홍길동\""));
        assert!(!content.contains("setting_name"));
    }

    #[test]
    fn test_missing_dir_is_created_and_empty() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("task_list");
        let store = TaskStore::new(&dir);

        assert!(store.list().unwrap().is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_names_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        store.save("b", &setting("kim")).unwrap();
        store.save("a", &setting("lee")).unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.names().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_skips_broken_files() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        store.save("good", &setting("kim")).unwrap();
        fs::write(temp.path().join("broken_data.json"), "{not json").unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].setting_name, "good");
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        assert!(matches!(store.load("nope"), Err(DigestError::NotFound(_))));
    }

    #[test]
    fn test_load_broken_is_settings_error() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        fs::write(temp.path().join("broken_data.json"), "[1,2]").unwrap();
        assert!(matches!(store.load("broken"), Err(DigestError::Settings(_))));
    }

    #[test]
    fn test_delete() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        store.save("daily", &setting("kim")).unwrap();

        assert!(store.delete("daily").unwrap());
        assert!(!store.delete("daily").unwrap());
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn test_validate_task_name() {
        assert!(validate_task_name("daily").is_ok());
        assert!(validate_task_name("경제 뉴스").is_ok());
        assert!(validate_task_name("").is_err());
        assert!(validate_task_name("   ").is_err());
        assert!(validate_task_name("..").is_err());
        assert!(validate_task_name("../etc").is_err());
        assert!(validate_task_name("a\\b").is_err());
        assert!(validate_task_name("a\nb").is_err());
        assert!(validate_task_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_save_rejects_bad_name() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        let result = store.save("../escape", &setting("kim"));
        assert!(matches!(result, Err(DigestError::Validation(_))));
    }
}
