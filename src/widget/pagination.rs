use std::sync::{Mutex, MutexGuard};

use crate::client::BoxedSource;
use crate::error::FetchError;
use crate::feed::{FeedEntry, FeedQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Loading,
  /// Terminal: the feed returned no entries
  Exhausted,
  /// The last load failed; waiting before the trigger is usable again
  ErrorCooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
  /// 1-based page fetched by the next load
  pub page: usize,
  pub phase: Phase,
}

#[derive(Debug)]
pub enum LoadOutcome {
  /// Another load is in flight, cooling down, or the feed is exhausted
  Skipped,
  Loaded(Vec<FeedEntry>),
  Exhausted,
  Failed(FetchError),
}

/// Walks a feed page by page, allowing one request at a time.
pub struct Paginator {
  source: BoxedSource,
  query: FeedQuery,
  state: Mutex<PaginationState>,
}

impl Paginator {
  /// `query.page` is the first page to fetch.
  pub fn new(source: BoxedSource, query: FeedQuery) -> Self {
    let state = PaginationState {
      page: query.page.max(1),
      phase: Phase::Idle,
    };

    Self {
      source,
      query,
      state: Mutex::new(state),
    }
  }

  fn lock(&self) -> MutexGuard<'_, PaginationState> {
    self.state.lock().unwrap_or_else(|e| e.into_inner())
  }

  pub fn state(&self) -> PaginationState {
    *self.lock()
  }

  pub fn is_loading(&self) -> bool {
    self.lock().phase == Phase::Loading
  }

  /// Claim the controller for one load. Returns the query to run, or
  /// `None` when a load must not start now.
  pub fn begin(&self) -> Option<FeedQuery> {
    let mut state = self.lock();
    if state.phase != Phase::Idle {
      return None;
    }

    state.phase = Phase::Loading;
    Some(self.query.clone().with_page(state.page))
  }

  /// Fetch a query obtained from [`Paginator::begin`] and settle the state.
  pub async fn run(&self, query: FeedQuery) -> LoadOutcome {
    let result = self.source.fetch_entries(&query).await;

    let mut state = self.lock();
    match result {
      Ok(entries) if entries.is_empty() => {
        state.phase = Phase::Exhausted;
        LoadOutcome::Exhausted
      }
      Ok(entries) => {
        state.page += 1;
        state.phase = Phase::Idle;
        LoadOutcome::Loaded(entries)
      }
      Err(e) => {
        state.phase = Phase::ErrorCooldown;
        LoadOutcome::Failed(e)
      }
    }
  }

  pub async fn load_more(&self) -> LoadOutcome {
    match self.begin() {
      Some(query) => self.run(query).await,
      None => LoadOutcome::Skipped,
    }
  }

  pub fn end_cooldown(&self) {
    let mut state = self.lock();
    if state.phase == Phase::ErrorCooldown {
      state.phase = Phase::Idle;
    }
  }
}
