use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  sync::Mutex,
};

use tracing::debug;

use crate::error::Result;

/// Durable string key-value storage for user preferences.
pub trait PreferenceStore: Send + Sync {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keeps preferences in a JSON object on disk. The file is read once
/// and rewritten on every change.
pub struct FileStore {
  path: PathBuf,
  values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
  pub fn open(path: &Path) -> Result<Self> {
    let values = match std::fs::read_to_string(path) {
      Ok(content) => serde_json::from_str(&content)?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => return Err(e.into()),
    };

    debug!("loaded {} preferences from {}", values.len(), path.display());
    Ok(Self {
      path: path.to_owned(),
      values: Mutex::new(values),
    })
  }
}

impl PreferenceStore for FileStore {
  fn get(&self, key: &str) -> Option<String> {
    let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    values.get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    values.insert(key.to_owned(), value.to_owned());
    let content = serde_json::to_string_pretty(&*values)?;
    std::fs::write(&self.path, content)?;
    Ok(())
  }
}

#[derive(Default)]
pub struct MemoryStore {
  values: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    values.get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
    values.insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
      "feed-widgets-{}-{name}.json",
      std::process::id()
    ))
  }

  #[test]
  fn test_file_store_round_trip() {
    let path = temp_path("round-trip");
    let _ = std::fs::remove_file(&path);

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("gridView"), None);
    store.set("gridView", "false").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("gridView").as_deref(), Some("false"));

    std::fs::remove_file(&path).unwrap();
  }

  #[test]
  fn test_file_store_rejects_garbage() {
    let path = temp_path("garbage");
    std::fs::write(&path, "not json").unwrap();
    assert!(FileStore::open(&path).is_err());
    std::fs::remove_file(&path).unwrap();
  }
}
