//! Directory-backed tablature storage.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::clock::epoch_millis;
use crate::error::{CoreError, CoreResult};
use crate::tabs::model::{SavedTab, TabData};

const EXTENSION: &str = "json";

/// Stores each tablature as `<dir>/<filename>.json`.
#[derive(Debug, Clone)]
pub struct TabStore {
    dir: PathBuf,
}

impl TabStore {
    /// Opens the store at `dir`, creating the directory if it is missing.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> CoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `tab` as pretty-printed JSON and returns the file name used.
    ///
    /// The name is `<epoch millis>_<sanitized tab name>.json`, where every
    /// character other than an ASCII letter or digit becomes `_`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Serialize`] if the tablature cannot be encoded.
    /// - [`CoreError::Io`] if the file cannot be written.
    pub fn save(&self, tab: &TabData, now: SystemTime) -> CoreResult<String> {
        let filename = format!(
            "{}_{}.{EXTENSION}",
            epoch_millis(now),
            sanitize_name(&tab.name)
        );
        let json = serde_json::to_string_pretty(tab)?;
        std::fs::write(self.dir.join(&filename), json)?;
        tracing::debug!("Saved tablature {filename}");
        Ok(filename)
    }

    /// Lists every stored tablature, ordered by file name.
    ///
    /// Files that cannot be read or parsed are skipped. A store whose
    /// directory has disappeared lists as empty.
    pub fn list(&self) -> Vec<SavedTab> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", self.dir.display());
                return Vec::new();
            }
        };

        let mut tabs: Vec<SavedTab> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| {
                let stem = path.file_stem()?.to_string_lossy().to_string();
                let content = std::fs::read_to_string(&path).ok()?;
                let tab: TabData = serde_json::from_str(&content).ok()?;
                Some(SavedTab::from_tab(stem, &tab))
            })
            .collect();

        tabs.sort_by(|a, b| a.filename.cmp(&b.filename));
        tabs
    }

    /// Returns the raw JSON of the tablature stored as `name` (without extension).
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidName`] if `name` could escape the store directory.
    /// - [`CoreError::NotFound`] if no such tablature exists.
    /// - [`CoreError::Io`] for any other read failure.
    pub fn load(&self, name: &str) -> CoreResult<String> {
        let path = self.path_for(name)?;
        std::fs::read_to_string(&path).map_err(|e| not_found_or_io(e, &path))
    }

    /// Deletes the tablature stored as `name` (without extension).
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidName`] if `name` could escape the store directory.
    /// - [`CoreError::NotFound`] if no such tablature exists.
    /// - [`CoreError::Io`] for any other failure.
    pub fn delete(&self, name: &str) -> CoreResult<()> {
        let path = self.path_for(name)?;
        std::fs::remove_file(&path).map_err(|e| not_found_or_io(e, &path))?;
        tracing::debug!("Deleted tablature {}", path.display());
        Ok(())
    }

    fn path_for(&self, name: &str) -> CoreResult<PathBuf> {
        if !is_valid_name(name) {
            return Err(CoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }
}

fn not_found_or_io(e: std::io::Error, path: &Path) -> CoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CoreError::NotFound(path.to_path_buf())
    } else {
        CoreError::Io(e)
    }
}

/// Replaces every character that is not an ASCII letter or digit with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains(':') {
        return false;
    }
    true
}
