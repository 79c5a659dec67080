mod comments;
mod pagination;
mod posts;
mod related;
mod view;

use std::{sync::Arc, time::Duration};

use tracing::{error, info};

use crate::client::BoxedSource;
use crate::config::WidgetConfig;
use crate::feed::FeedEntry;
use crate::i18n::{Language, Message};
use crate::mapper::EntryMapper;
use crate::store::PreferenceStore;
use crate::surface::{Surface, TriggerStyle, TriggerView};

pub use comments::CommentList;
pub use pagination::{LoadOutcome, Paginator, Phase};
pub use posts::PostListing;
pub use related::{RelatedConfig, RelatedOutcome, RelatedPosts};
pub use view::{VIEW_KEY, ViewMode, ViewPreference};

pub type SharedSurface = Arc<dyn Surface>;

/// What one press of a load-more trigger ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadResult {
  Skipped,
  Rendered(usize),
  Exhausted,
  /// The load failed; the trigger has already recovered
  Failed,
}

/// The trigger as it should look in a given phase.
pub fn trigger_view(
  phase: Phase,
  language: Language,
  exhausted: Message,
) -> TriggerView {
  match phase {
    Phase::Idle => TriggerView {
      label: language.translate(Message::LoadMore).to_owned(),
      ..TriggerView::default()
    },
    Phase::Loading => TriggerView {
      label: language.translate(Message::Loading).to_owned(),
      disabled: true,
      busy: true,
      style: TriggerStyle::Normal,
    },
    Phase::Exhausted => TriggerView {
      label: language.translate(exhausted).to_owned(),
      disabled: true,
      busy: false,
      style: TriggerStyle::Muted,
    },
    Phase::ErrorCooldown => TriggerView {
      label: language.translate(Message::ErrorOccurred).to_owned(),
      disabled: true,
      busy: false,
      style: TriggerStyle::Error,
    },
  }
}

/// A load-more trigger bound to its controller.
struct Trigger {
  id: String,
  language: Language,
  exhausted: Message,
  cooldown: Duration,
}

impl Trigger {
  fn show(&self, surface: &dyn Surface, phase: Phase) {
    surface.set_trigger(
      &self.id,
      trigger_view(phase, self.language, self.exhausted),
    );
  }

  /// Run one load through `paginator`, keeping the trigger in sync.
  /// `render` receives the entries of a successful page.
  async fn press(
    &self,
    paginator: &Paginator,
    surface: &dyn Surface,
    render: impl FnOnce(Vec<FeedEntry>),
  ) -> LoadResult {
    let Some(query) = paginator.begin() else {
      return LoadResult::Skipped;
    };
    self.show(surface, Phase::Loading);

    match paginator.run(query).await {
      LoadOutcome::Loaded(entries) => {
        let count = entries.len();
        render(entries);
        self.show(surface, Phase::Idle);
        LoadResult::Rendered(count)
      }
      LoadOutcome::Exhausted => {
        info!("{}: nothing more to load", self.id);
        self.show(surface, Phase::Exhausted);
        LoadResult::Exhausted
      }
      LoadOutcome::Failed(e) => {
        error!("{}: loading failed: {e}", self.id);
        self.show(surface, Phase::ErrorCooldown);
        tokio::time::sleep(self.cooldown).await;
        paginator.end_cooldown();
        self.show(surface, Phase::Idle);
        LoadResult::Failed
      }
      LoadOutcome::Skipped => LoadResult::Skipped,
    }
  }
}

/// Shared pieces of one page view, from which the widgets are built.
pub struct Session {
  pub config: WidgetConfig,
  pub source: BoxedSource,
  pub surface: SharedSurface,
  pub mapper: Arc<EntryMapper>,
  pub store: Arc<dyn PreferenceStore>,
}

impl Session {
  pub fn new(
    config: WidgetConfig,
    source: BoxedSource,
    surface: SharedSurface,
    store: Arc<dyn PreferenceStore>,
  ) -> Self {
    let mapper =
      Arc::new(EntryMapper::new(config.images.clone(), config.language));
    Self {
      config,
      source,
      surface,
      mapper,
      store,
    }
  }

  pub fn posts(&self, filter: Option<crate::feed::QueryFilter>) -> PostListing {
    PostListing::new(self, filter)
  }

  pub fn comments(&self) -> CommentList {
    CommentList::new(self)
  }

  pub fn related(&self, seed: Option<u64>) -> RelatedPosts {
    RelatedPosts::new(self, seed)
  }
}
