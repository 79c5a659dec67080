mod query;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub use query::{FeedKind, FeedQuery, Projection, QueryFilter};

/// Wrapper for the `{"$t": "..."}` text nodes used throughout the feed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Text {
  #[serde(rename = "$t", default)]
  pub t: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Link {
  #[serde(default)]
  pub rel: String,
  #[serde(default)]
  pub href: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Thumbnail {
  pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthorImage {
  pub src: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Author {
  pub name: Option<Text>,
  #[serde(rename = "gd$image")]
  pub image: Option<AuthorImage>,
}

/// One post or comment as served by the feed. Every field is optional;
/// defaulting happens in the mapper.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct FeedEntry {
  pub id: Option<Text>,
  pub title: Option<Text>,
  #[serde(default)]
  pub link: Vec<Link>,
  #[serde(rename = "media$thumbnail")]
  pub thumbnail: Option<Thumbnail>,
  pub summary: Option<Text>,
  pub content: Option<Text>,
  #[serde(default)]
  pub author: Vec<Author>,
  pub published: Option<Text>,
}

#[derive(Deserialize, Debug)]
struct FeedEnvelope {
  feed: FeedBody,
}

#[derive(Deserialize, Debug)]
struct FeedBody {
  #[serde(default)]
  entry: Option<Vec<FeedEntry>>,
}

impl FeedEntry {
  pub fn id(&self) -> Option<&str> {
    self.id.as_ref().map(|t| t.t.as_str())
  }

  pub fn title(&self) -> Option<&str> {
    non_empty(&self.title)
  }

  pub fn alternate_link(&self) -> Option<&str> {
    self
      .link
      .iter()
      .find(|link| link.rel == "alternate")
      .map(|link| link.href.as_str())
  }

  pub fn thumbnail_url(&self) -> Option<&str> {
    self.thumbnail.as_ref().and_then(|t| t.url.as_deref())
  }

  pub fn summary(&self) -> Option<&str> {
    non_empty(&self.summary)
  }

  pub fn content(&self) -> Option<&str> {
    non_empty(&self.content)
  }

  pub fn author_name(&self) -> Option<&str> {
    self
      .author
      .first()
      .and_then(|a| a.name.as_ref())
      .map(|t| t.t.as_str())
  }

  pub fn author_image(&self) -> Option<&str> {
    self
      .author
      .first()
      .and_then(|a| a.image.as_ref())
      .and_then(|image| image.src.as_deref())
  }

  pub fn published(&self) -> Option<&str> {
    non_empty(&self.published)
  }
}

fn non_empty(text: &Option<Text>) -> Option<&str> {
  text.as_ref().map(|t| t.t.as_str()).filter(|s| !s.is_empty())
}

/// Parse a feed response body into its entries. A missing or empty
/// `entry` list means there is nothing (more) to show.
pub fn parse_entries(body: &str) -> Result<Vec<FeedEntry>, FetchError> {
  let envelope: FeedEnvelope = serde_json::from_str(body)?;
  Ok(envelope.feed.entry.unwrap_or_default())
}

#[cfg(test)]
mod test {
  use super::*;

  const FIXTURE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/posts.json"));

  #[test]
  fn test_parse_fixture() {
    let entries = parse_entries(FIXTURE).unwrap();
    assert_eq!(entries.len(), 3);

    let first = &entries[0];
    assert_eq!(first.id(), Some("tag:blogger.com,1999:blog-1.post-101"));
    assert_eq!(first.title(), Some("Getting started with feeds"));
    assert_eq!(
      first.alternate_link(),
      Some("https://blog.example.com/2024/01/getting-started.html")
    );
    assert_eq!(first.author_name(), Some("Dana"));
    // fields the widgets never read, like `category`, are ignored
    assert_eq!(entries[1].author_name(), Some("Sam"));
  }

  #[test]
  fn test_parse_without_entries() {
    let entries = parse_entries(r#"{"feed": {"title": {"$t": "x"}}}"#).unwrap();
    assert!(entries.is_empty());

    let entries = parse_entries(r#"{"feed": {"entry": []}}"#).unwrap();
    assert!(entries.is_empty());
  }

  #[test]
  fn test_parse_missing_envelope() {
    let err = parse_entries(r#"{"entries": []}"#).unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));

    let err = parse_entries("<html>not json</html>").unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
  }

  #[test]
  fn test_sparse_entry() {
    let entries = parse_entries(r#"{"feed": {"entry": [{}]}}"#).unwrap();
    let entry = &entries[0];
    assert_eq!(entry, &FeedEntry::default());
    assert!(entry.title().is_none());
    assert!(entry.alternate_link().is_none());
    assert!(entry.author_image().is_none());
  }

  #[test]
  fn test_empty_title_counts_as_missing() {
    let entries =
      parse_entries(r#"{"feed": {"entry": [{"title": {"$t": ""}}]}}"#).unwrap();
    assert!(entries[0].title().is_none());
  }
}
