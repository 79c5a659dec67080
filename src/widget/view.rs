use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::PreferenceStore;

pub const VIEW_KEY: &str = "gridView";

#[derive(
  Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  #[default]
  Grid,
  List,
}

impl ViewMode {
  fn from_stored(value: Option<&str>) -> Self {
    // anything but an explicit "false" keeps the grid
    match value {
      Some("false") => ViewMode::List,
      _ => ViewMode::Grid,
    }
  }

  fn stored(self) -> &'static str {
    match self {
      ViewMode::Grid => "true",
      ViewMode::List => "false",
    }
  }
}

/// The persisted grid/list choice. Read once when created.
pub struct ViewPreference {
  store: Arc<dyn PreferenceStore>,
  mode: Mutex<ViewMode>,
}

impl ViewPreference {
  pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
    let mode = ViewMode::from_stored(store.get(VIEW_KEY).as_deref());
    Self {
      store,
      mode: Mutex::new(mode),
    }
  }

  pub fn mode(&self) -> ViewMode {
    *self.mode.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Switch modes. The in-memory choice changes even if persisting fails.
  pub fn set(&self, mode: ViewMode) -> Result<()> {
    *self.mode.lock().unwrap_or_else(|e| e.into_inner()) = mode;
    self.store.set(VIEW_KEY, mode.stored())
  }
}
