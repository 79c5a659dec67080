use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, error, info};

use crate::client::BoxedSource;
use crate::config::{RelatedDefaults, WidgetConfig};
use crate::error::ConfigError;
use crate::feed::{FeedEntry, FeedKind, FeedQuery, Projection, QueryFilter};
use crate::mapper::{EntryMapper, ImageSize};
use crate::render;
use crate::util::shuffle;

use super::{Session, SharedSurface};

const MARKER: &str = "related";

/// Settings read from the `data-*` attributes of the host container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedConfig {
  pub post_id: String,
  pub tags: Vec<String>,
  pub max_results: usize,
  pub length: usize,
}

impl RelatedConfig {
  /// `Ok(None)` when the container is not marked as a related-posts widget.
  pub fn from_attributes(
    attrs: &HashMap<String, String>,
    defaults: &RelatedDefaults,
  ) -> Result<Option<Self>, ConfigError> {
    if attrs.get("data-bjs").map(String::as_str) != Some(MARKER) {
      return Ok(None);
    }

    let post_id = attrs.get("data-id").cloned().unwrap_or_default();
    let tags = match attrs.get("data-tags") {
      Some(raw) => parse_tags(raw)?,
      None => vec![],
    };

    Ok(Some(Self {
      post_id,
      tags,
      max_results: positive_or(attrs, "data-max-results", defaults.max_results),
      length: positive_or(attrs, "data-length", defaults.length),
    }))
  }
}

fn parse_tags(raw: &str) -> Result<Vec<String>, ConfigError> {
  let unescaped = raw.replace("&quot;", "\"");
  serde_json::from_str(&unescaped).map_err(|e| ConfigError::BadAttribute {
    name: "data-tags".into(),
    reason: e.to_string(),
  })
}

fn positive_or(
  attrs: &HashMap<String, String>,
  name: &str,
  default: usize,
) -> usize {
  attrs
    .get(name)
    .and_then(|v| v.trim().parse::<usize>().ok())
    .filter(|&n| n > 0)
    .unwrap_or(default)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelatedOutcome {
  /// No tags to match on
  Skipped,
  Rendered(usize),
  /// The feed had nothing besides the current post
  Empty,
  Failed,
}

/// A random sample of posts sharing a label with the current post.
pub struct RelatedPosts {
  config: WidgetConfig,
  source: BoxedSource,
  surface: SharedSurface,
  mapper: Arc<EntryMapper>,
  rng: Mutex<StdRng>,
}

impl RelatedPosts {
  pub(super) fn new(session: &Session, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };

    Self {
      config: session.config.clone(),
      source: session.source.clone(),
      surface: session.surface.clone(),
      mapper: session.mapper.clone(),
      rng: Mutex::new(rng),
    }
  }

  /// Read the container attributes and load when the widget is enabled.
  pub async fn mount(
    &self,
    attrs: &HashMap<String, String>,
  ) -> Result<RelatedOutcome, ConfigError> {
    match RelatedConfig::from_attributes(attrs, &self.config.related)? {
      Some(related) => Ok(self.load(&related).await),
      None => {
        debug!("container is not a related-posts widget");
        Ok(RelatedOutcome::Skipped)
      }
    }
  }

  /// Drop the current post, shuffle the rest and keep `length` of them.
  pub fn select(
    &self,
    mut entries: Vec<FeedEntry>,
    related: &RelatedConfig,
  ) -> Vec<FeedEntry> {
    entries.retain(|entry| entry.id() != Some(related.post_id.as_str()));

    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
    shuffle(&mut entries, &mut *rng);
    entries.truncate(related.length);
    entries
  }

  pub async fn load(&self, related: &RelatedConfig) -> RelatedOutcome {
    if related.tags.is_empty() {
      info!("no tags on post {}, skipping related posts", related.post_id);
      return RelatedOutcome::Skipped;
    }

    let query =
      FeedQuery::new(FeedKind::Posts, Projection::Default, related.max_results)
        .with_filter(Some(QueryFilter::Labels(related.tags.clone())));
    let container = &self.config.related.container;

    let entries = match self.source.fetch_entries(&query).await {
      Ok(entries) => entries,
      Err(e) => {
        error!("failed to load related posts: {e}");
        self.surface.replace(container, render::related_error());
        return RelatedOutcome::Failed;
      }
    };

    let sample = self.select(entries, related);
    if sample.is_empty() {
      return RelatedOutcome::Empty;
    }

    let items: Vec<_> = sample
      .iter()
      .map(|entry| self.mapper.map_entry(entry, ImageSize::Related))
      .collect();
    self.surface.replace(
      container,
      render::related_section(
        &items,
        self.config.language,
        self.config.direction(),
      ),
    );
    RelatedOutcome::Rendered(items.len())
  }
}
