use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ClientConfig;
use crate::error::{ConfigError, Result};
use crate::i18n::{Direction, Language};

/// Everything a page session needs to know up front. Immutable once
/// the widgets are built.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WidgetConfig {
  /// Origin of the blog serving the feeds
  #[serde(default = "default_origin")]
  pub origin: Url,
  /// Document language tag; unsupported languages fall back to English
  #[serde(default, deserialize_with = "deserialize_language")]
  pub language: Language,
  /// Follows the language unless set
  #[serde(default)]
  pub direction: Option<Direction>,
  #[serde(default)]
  pub posts: PostsConfig,
  #[serde(default)]
  pub comments: CommentsConfig,
  #[serde(default)]
  pub related: RelatedDefaults,
  #[serde(default)]
  pub images: ImageDefaults,
  #[serde(default)]
  pub copy_link: CopyLinkConfig,
  #[serde(default)]
  pub reading_time: ReadingTimeConfig,
  /// How long the load-more trigger shows an error before it can be
  /// used again
  #[serde(default = "default_cooldown")]
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  pub cooldown: Duration,
  /// JSON file holding the persisted view preference
  pub preferences: Option<std::path::PathBuf>,
  #[serde(default)]
  pub client: ClientConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PostsConfig {
  pub page_size: usize,
  /// First page fetched by "load more"; page 1 is rendered by the host
  pub start_page: usize,
  pub container: String,
  pub trigger: String,
  pub grid_trigger: String,
  pub list_trigger: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CommentsConfig {
  pub page_size: usize,
  /// First page fetched; the host already shows the newest comments
  pub start_page: usize,
  pub container: String,
  pub trigger: String,
  /// Element showing how many comments are rendered
  pub count: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RelatedDefaults {
  pub container: String,
  pub max_results: usize,
  pub length: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ImageDefaults {
  pub grid_placeholder: String,
  pub related_placeholder: String,
  pub default_avatar: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CopyLinkConfig {
  pub tooltip: String,
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  pub tooltip_duration: Duration,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ReadingTimeConfig {
  pub element: String,
  /// Selector of the article body whose words are counted
  pub body: String,
}

impl Default for WidgetConfig {
  fn default() -> Self {
    Self {
      origin: default_origin(),
      language: Language::default(),
      direction: None,
      posts: PostsConfig::default(),
      comments: CommentsConfig::default(),
      related: RelatedDefaults::default(),
      images: ImageDefaults::default(),
      copy_link: CopyLinkConfig::default(),
      reading_time: ReadingTimeConfig::default(),
      cooldown: default_cooldown(),
      preferences: None,
      client: ClientConfig::default(),
    }
  }
}

impl Default for PostsConfig {
  fn default() -> Self {
    Self {
      page_size: 7,
      start_page: 2,
      container: "articles-grid".into(),
      trigger: "load-more-button".into(),
      grid_trigger: "grid-icon".into(),
      list_trigger: "list-icon".into(),
    }
  }
}

impl Default for CommentsConfig {
  fn default() -> Self {
    Self {
      page_size: 5,
      start_page: 2,
      container: "mintblogger-comments".into(),
      trigger: "load-more-comments".into(),
      count: "comment-count".into(),
    }
  }
}

impl Default for RelatedDefaults {
  fn default() -> Self {
    Self {
      container: "mintblogger-related-posts".into(),
      max_results: 15,
      length: 3,
    }
  }
}

impl Default for ImageDefaults {
  fn default() -> Self {
    Self {
      grid_placeholder: "https://via.placeholder.com/640x360".into(),
      related_placeholder: "https://via.placeholder.com/300x200".into(),
      default_avatar: "https://lh3.googleusercontent.com/a/default-user".into(),
    }
  }
}

impl Default for CopyLinkConfig {
  fn default() -> Self {
    Self {
      tooltip: "copy-link-tooltip".into(),
      tooltip_duration: Duration::from_secs(2),
    }
  }
}

impl Default for ReadingTimeConfig {
  fn default() -> Self {
    Self {
      element: "reading-time".into(),
      body: ".post-body".into(),
    }
  }
}

impl WidgetConfig {
  pub fn direction(&self) -> Direction {
    self.direction.unwrap_or(self.language.direction())
  }

  pub fn load_from_file(path: &Path) -> Result<Self> {
    let f = std::fs::File::open(path)?;
    let config: Self = serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
  }

  pub fn parse_yaml(input: &str) -> Result<Self> {
    let config: Self = serde_yaml::from_str(input).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.origin.cannot_be_a_base() {
      return Err(ConfigError::Message(format!(
        "origin must be an http(s) URL: {}",
        self.origin
      )));
    }

    if self.posts.page_size == 0 || self.comments.page_size == 0 {
      return Err(ConfigError::Message("page_size must be positive".into()));
    }

    if self.posts.start_page == 0 || self.comments.start_page == 0 {
      return Err(ConfigError::Message("start_page is 1-based".into()));
    }

    Ok(())
  }
}

fn deserialize_language<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let tag = String::deserialize(deserializer)?;
  Ok(Language::from_tag(&tag))
}

fn default_origin() -> Url {
  Url::parse("http://localhost/").expect("static url")
}

fn default_cooldown() -> Duration {
  Duration::from_millis(1500)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = WidgetConfig::parse_yaml("{}").unwrap();
    assert_eq!(config.posts.page_size, 7);
    assert_eq!(config.posts.start_page, 2);
    assert_eq!(config.comments.page_size, 5);
    assert_eq!(config.comments.start_page, 2);
    assert_eq!(config.related.max_results, 15);
    assert_eq!(config.related.length, 3);
    assert_eq!(config.cooldown, Duration::from_millis(1500));
    assert_eq!(config.language, Language::En);
    assert_eq!(config.images, ImageDefaults::default());
  }

  #[test]
  fn test_parse_config() {
    let config = WidgetConfig::parse_yaml(
      r#"
origin: https://blog.example.com
language: ar
direction: rtl
cooldown: 3s
posts:
  page_size: 10
  container: posts
related:
  length: 4
client:
  timeout: 5s
"#,
    )
    .unwrap();

    assert_eq!(config.origin.as_str(), "https://blog.example.com/");
    assert_eq!(config.language, Language::Ar);
    assert_eq!(config.direction(), Direction::Rtl);
    assert_eq!(config.cooldown, Duration::from_secs(3));
    assert_eq!(config.posts.page_size, 10);
    assert_eq!(config.posts.container, "posts");
    assert_eq!(config.posts.trigger, "load-more-button");
    assert_eq!(config.related.length, 4);
    assert_eq!(config.related.max_results, 15);
  }

  #[test]
  fn test_language_tags_fall_back() {
    let config = WidgetConfig::parse_yaml("language: fr").unwrap();
    assert_eq!(config.language, Language::En);
    assert_eq!(config.direction(), Direction::Ltr);

    let config = WidgetConfig::parse_yaml("language: ar-EG").unwrap();
    assert_eq!(config.language, Language::Ar);
    assert_eq!(config.direction(), Direction::Rtl);

    let config =
      WidgetConfig::parse_yaml("{language: ar, direction: ltr}").unwrap();
    assert_eq!(config.direction(), Direction::Ltr);
  }

  #[test]
  fn test_reject_bad_values() {
    assert!(WidgetConfig::parse_yaml("origin: 'mailto:me@example.com'").is_err());
    assert!(WidgetConfig::parse_yaml("posts: {page_size: 0}").is_err());
    assert!(WidgetConfig::parse_yaml("comments: {start_page: 0}").is_err());
  }
}
