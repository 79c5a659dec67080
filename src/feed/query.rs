use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
  Posts,
  Comments,
}

/// `summary` omits the post body; `default` carries the full content.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
  Summary,
  Default,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryFilter {
  /// Free-text search, sent as `q`.
  Search(String),
  /// Posts carrying any of the labels, sent as `q=label:"A"|label:"B"`.
  Labels(Vec<String>),
  /// Posts under a single label, selected by the `/-/{label}` path.
  Label(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedQuery {
  pub kind: FeedKind,
  pub projection: Projection,
  /// 1-based page number
  pub page: usize,
  pub page_size: usize,
  pub filter: Option<QueryFilter>,
}

impl fmt::Display for FeedKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FeedKind::Posts => f.write_str("posts"),
      FeedKind::Comments => f.write_str("comments"),
    }
  }
}

impl fmt::Display for Projection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Projection::Summary => f.write_str("summary"),
      Projection::Default => f.write_str("default"),
    }
  }
}

impl QueryFilter {
  fn query_param(&self) -> Option<String> {
    match self {
      QueryFilter::Search(text) => Some(text.clone()),
      QueryFilter::Labels(labels) => Some(
        labels
          .iter()
          .map(|label| format!("label:\"{label}\""))
          .join("|"),
      ),
      QueryFilter::Label(_) => None,
    }
  }
}

impl FeedQuery {
  pub fn new(kind: FeedKind, projection: Projection, page_size: usize) -> Self {
    Self {
      kind,
      projection,
      page: 1,
      page_size,
      filter: None,
    }
  }

  pub fn with_page(mut self, page: usize) -> Self {
    self.page = page;
    self
  }

  pub fn with_filter(mut self, filter: Option<QueryFilter>) -> Self {
    self.filter = filter;
    self
  }

  pub fn start_index(&self) -> usize {
    self.page.saturating_sub(1) * self.page_size + 1
  }

  pub fn to_url(&self, origin: &Url) -> Result<Url, url::ParseError> {
    let mut url =
      origin.join(&format!("/feeds/{}/{}", self.kind, self.projection))?;

    if let Some(QueryFilter::Label(label)) = &self.filter {
      url
        .path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .push("-")
        .push(label);
    }

    {
      let mut pairs = url.query_pairs_mut();
      pairs
        .append_pair("alt", "json")
        .append_pair("orderby", "published")
        .append_pair("start-index", &self.start_index().to_string())
        .append_pair("max-results", &self.page_size.to_string());

      if let Some(q) = self.filter.as_ref().and_then(|f| f.query_param()) {
        pairs.append_pair("q", &q);
      }
    }

    Ok(url)
  }
}
