use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use tracing::info;

use crate::config::CommentsConfig;
use crate::feed::{FeedKind, FeedQuery, Projection};
use crate::i18n::Message;
use crate::mapper::EntryMapper;
use crate::render;

use super::{LoadResult, Paginator, Session, SharedSurface, Trigger};

/// Recent comments, five at a time.
pub struct CommentList {
  ids: CommentsConfig,
  surface: SharedSurface,
  mapper: Arc<EntryMapper>,
  paginator: Paginator,
  trigger: Trigger,
  rendered: AtomicUsize,
}

impl CommentList {
  pub(super) fn new(session: &Session) -> Self {
    let config = &session.config;
    let query = FeedQuery::new(
      FeedKind::Comments,
      Projection::Default,
      config.comments.page_size,
    )
    .with_page(config.comments.start_page);

    Self {
      ids: config.comments.clone(),
      surface: session.surface.clone(),
      mapper: session.mapper.clone(),
      paginator: Paginator::new(session.source.clone(), query),
      trigger: Trigger {
        id: config.comments.trigger.clone(),
        language: config.language,
        exhausted: Message::NoMoreComments,
        cooldown: config.cooldown,
      },
      rendered: AtomicUsize::new(0),
    }
  }

  pub fn paginator(&self) -> &Paginator {
    &self.paginator
  }

  pub fn rendered(&self) -> usize {
    self.rendered.load(Ordering::SeqCst)
  }

  /// Fetch and render the first page not shown by the host.
  pub async fn load_initial(&self) -> LoadResult {
    info!("loading comments");
    self.trigger.show(&*self.surface, self.paginator.state().phase);
    self.load_more().await
  }

  pub async fn load_more(&self) -> LoadResult {
    self
      .trigger
      .press(&self.paginator, &*self.surface, |entries| {
        for entry in &entries {
          let item = self.mapper.map_comment(entry);
          self
            .surface
            .append(&self.ids.container, render::comment_card(&item));
        }

        let added = entries.len();
        let total = self.rendered.fetch_add(added, Ordering::SeqCst) + added;
        let label = render::comment_count(total, self.mapper.language());
        self.surface.set_text(&self.ids.count, &label);
      })
      .await
  }
}
