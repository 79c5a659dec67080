use reqwest::StatusCode;
use url::Url;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("YAML parse error")]
  Yaml(#[from] serde_yaml::Error),

  #[error("Invalid URL {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Bad host attribute {name}: {reason}")]
  BadAttribute { name: String, reason: String },

  #[error("{0}")]
  Message(String),
}

/// Failure of a single feed request. Never retried by the client.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("HTTP status error {0} (url: {1})")]
  Status(StatusCode, Url),

  #[error("unexpected feed payload: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("cannot build feed URL: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      FetchError::Status(status, _) => Some(*status),
      _ => None,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("IO error")]
  Io(#[from] std::io::Error),

  #[error("Invalid URL {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Feed fetch error {0}")]
  Fetch(#[from] FetchError),

  #[error("Reqwest client error {0:?}")]
  Reqwest(#[from] reqwest::Error),

  #[error("Preference store error {0}")]
  Store(#[from] serde_json::Error),

  #[error("Config error {0:?}")]
  Config(#[from] ConfigError),

  #[error("{0}")]
  Message(String),
}
