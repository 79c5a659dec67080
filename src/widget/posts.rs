use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::PostsConfig;
use crate::feed::{FeedKind, FeedQuery, Projection, QueryFilter};
use crate::i18n::Message;
use crate::mapper::{DisplayItem, EntryMapper, ImageSize};
use crate::render;

use super::{
  LoadResult, Paginator, Session, SharedSurface, Trigger, ViewMode,
  ViewPreference,
};

/// The paginated post listing with its grid/list toggle.
pub struct PostListing {
  ids: PostsConfig,
  surface: SharedSurface,
  mapper: Arc<EntryMapper>,
  paginator: Paginator,
  trigger: Trigger,
  view: ViewPreference,
  items: Mutex<Vec<DisplayItem>>,
}

impl PostListing {
  pub(super) fn new(session: &Session, filter: Option<QueryFilter>) -> Self {
    let config = &session.config;
    let query =
      FeedQuery::new(FeedKind::Posts, Projection::Summary, config.posts.page_size)
        .with_page(config.posts.start_page)
        .with_filter(filter);

    Self {
      ids: config.posts.clone(),
      surface: session.surface.clone(),
      mapper: session.mapper.clone(),
      paginator: Paginator::new(session.source.clone(), query),
      trigger: Trigger {
        id: config.posts.trigger.clone(),
        language: config.language,
        exhausted: Message::NoMorePosts,
        cooldown: config.cooldown,
      },
      view: ViewPreference::load(session.store.clone()),
      items: Mutex::new(vec![]),
    }
  }

  /// Put the listing in its initial state: stored view mode applied and
  /// the trigger ready.
  pub fn mount(&self) {
    let language = self.trigger.language;
    self
      .surface
      .set_text(&self.ids.grid_trigger, language.translate(Message::GridView));
    self
      .surface
      .set_text(&self.ids.list_trigger, language.translate(Message::ListView));

    self.apply_view();
    self.trigger.show(&*self.surface, self.paginator.state().phase);
    info!("post listing mounted in {:?} view", self.view.mode());
  }

  pub fn view_mode(&self) -> ViewMode {
    self.view.mode()
  }

  pub fn paginator(&self) -> &Paginator {
    &self.paginator
  }

  pub fn rendered(&self) -> usize {
    self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
  }

  pub async fn load_more(&self) -> LoadResult {
    self
      .trigger
      .press(&self.paginator, &*self.surface, |entries| {
        let mode = self.view.mode();
        let new_items: Vec<DisplayItem> = entries
          .iter()
          .map(|entry| self.mapper.map_entry(entry, ImageSize::Grid))
          .collect();

        self
          .surface
          .append(&self.ids.container, render::post_cards(&new_items, mode));
        self
          .items
          .lock()
          .unwrap_or_else(|e| e.into_inner())
          .extend(new_items);
      })
      .await
  }

  /// Switch between grid and list. Selecting one deactivates the other.
  pub fn select_view(&self, mode: ViewMode) {
    if let Err(e) = self.view.set(mode) {
      warn!("failed to persist view mode: {e}");
    }
    self.apply_view();
  }

  fn apply_view(&self) {
    let mode = self.view.mode();
    let surface = &self.surface;

    surface.set_active(&self.ids.grid_trigger, mode == ViewMode::Grid);
    surface.set_active(&self.ids.list_trigger, mode == ViewMode::List);
    surface.set_class(&self.ids.container, render::container_class(mode));

    // cards rendered by the host are left alone
    let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
    if !items.is_empty() {
      surface.replace(&self.ids.container, render::post_cards(&items, mode));
    }
  }
}
