use std::sync::{
  Arc, Mutex,
  atomic::{AtomicUsize, Ordering},
};

use axum::{
  Router,
  extract::State,
  http::{StatusCode, Uri, header},
  response::{IntoResponse, Response},
};
use tokio::sync::Notify;
use url::Url;

use crate::client::FeedSource;
use crate::error::FetchError;
use crate::feed::{self, FeedEntry, FeedQuery, Text};

pub const POSTS_FIXTURE: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/posts.json"));
pub const COMMENTS_FIXTURE: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/comments.json"));

pub fn fixture_posts() -> Vec<FeedEntry> {
  feed::parse_entries(POSTS_FIXTURE).expect("bad posts fixture")
}

pub fn fixture_comments() -> Vec<FeedEntry> {
  feed::parse_entries(COMMENTS_FIXTURE).expect("bad comments fixture")
}

/// Minimal entries with distinct ids, titles and links.
pub fn numbered_entries(n: usize) -> Vec<FeedEntry> {
  (1..=n)
    .map(|i| FeedEntry {
      id: Some(Text {
        t: format!("post-{i}"),
      }),
      title: Some(Text {
        t: format!("Post {i}"),
      }),
      link: vec![feed::Link {
        rel: "alternate".into(),
        href: format!("https://blog.example.com/post-{i}.html"),
      }],
      published: Some(Text {
        t: "2024-01-05T10:30:00.000Z".into(),
      }),
      ..FeedEntry::default()
    })
    .collect()
}

fn page_of<T: Clone>(items: &[T], query: &FeedQuery) -> Vec<T> {
  items
    .iter()
    .skip(query.start_index() - 1)
    .take(query.page_size)
    .cloned()
    .collect()
}

/// In-memory feed that honours start-index/max-results and counts calls.
#[derive(Default)]
pub struct MockSource {
  entries: Vec<FeedEntry>,
  calls: AtomicUsize,
  queries: Mutex<Vec<FeedQuery>>,
  fail_status: Mutex<Option<u16>>,
  gate: Option<Arc<Notify>>,
}

impl MockSource {
  pub fn new(entries: Vec<FeedEntry>) -> Self {
    Self {
      entries,
      ..Self::default()
    }
  }

  /// Every fetch waits for `gate.notify_one()` before answering.
  pub fn gated(entries: Vec<FeedEntry>, gate: Arc<Notify>) -> Self {
    Self {
      entries,
      gate: Some(gate),
      ..Self::default()
    }
  }

  pub fn fail_with(&self, status: u16) {
    *self.fail_status.lock().unwrap() = Some(status);
  }

  pub fn recover(&self) {
    *self.fail_status.lock().unwrap() = None;
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn queries(&self) -> Vec<FeedQuery> {
    self.queries.lock().unwrap().clone()
  }
}

#[async_trait::async_trait]
impl FeedSource for MockSource {
  async fn fetch_entries(
    &self,
    query: &FeedQuery,
  ) -> Result<Vec<FeedEntry>, FetchError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.queries.lock().unwrap().push(query.clone());

    if let Some(gate) = &self.gate {
      gate.notified().await;
    }

    let fail_status = *self.fail_status.lock().unwrap();
    if let Some(status) = fail_status {
      let url = Url::parse("https://blog.example.com/feeds/posts/summary")
        .expect("static url");
      let status = reqwest::StatusCode::from_u16(status).expect("bad status");
      return Err(FetchError::Status(status, url));
    }

    Ok(page_of(&self.entries, query))
  }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
  pub path: String,
  pub query: Vec<(String, String)>,
}

impl RecordedRequest {
  pub fn param(&self, name: &str) -> Option<&str> {
    self
      .query
      .iter()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Clone)]
enum Mode {
  Fixture,
  Status(u16),
  Body(String),
}

struct ServerState {
  mode: Mutex<Mode>,
  requests: Mutex<Vec<RecordedRequest>>,
}

/// A local HTTP server answering feed requests from the JSON fixtures.
pub struct FixtureServer {
  origin: Url,
  state: Arc<ServerState>,
}

impl FixtureServer {
  pub async fn start() -> Self {
    let state = Arc::new(ServerState {
      mode: Mutex::new(Mode::Fixture),
      requests: Mutex::new(vec![]),
    });

    let app = Router::new()
      .fallback(handle_feed)
      .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .expect("failed to bind fixture server");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
      axum::serve(listener, app).await.expect("fixture server died");
    });

    let origin = Url::parse(&format!("http://{addr}/")).expect("bad origin");
    Self { origin, state }
  }

  pub fn origin(&self) -> Url {
    self.origin.clone()
  }

  pub fn fail_with(&self, status: u16) {
    *self.state.mode.lock().unwrap() = Mode::Status(status);
  }

  pub fn serve_body(&self, body: &str) {
    *self.state.mode.lock().unwrap() = Mode::Body(body.to_owned());
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.state.requests.lock().unwrap().clone()
  }
}

async fn handle_feed(
  State(state): State<Arc<ServerState>>,
  uri: Uri,
) -> Response {
  let url = Url::parse(&format!("http://fixture{uri}")).expect("bad uri");
  let request = RecordedRequest {
    path: url.path().to_owned(),
    query: url
      .query_pairs()
      .map(|(k, v)| (k.into_owned(), v.into_owned()))
      .collect(),
  };
  state.requests.lock().unwrap().push(request.clone());

  let mode = state.mode.lock().unwrap().clone();
  let body = match mode {
    Mode::Status(status) => {
      let status = StatusCode::from_u16(status).expect("bad status");
      return (status, "server error").into_response();
    }
    Mode::Body(body) => body,
    Mode::Fixture => fixture_page(&request),
  };

  ([(header::CONTENT_TYPE, "application/json; charset=UTF-8")], body)
    .into_response()
}

fn fixture_page(request: &RecordedRequest) -> String {
  let fixture = if request.path.starts_with("/feeds/comments") {
    COMMENTS_FIXTURE
  } else {
    POSTS_FIXTURE
  };

  let mut json: serde_json::Value =
    serde_json::from_str(fixture).expect("bad fixture");
  let start: usize = request
    .param("start-index")
    .and_then(|s| s.parse().ok())
    .unwrap_or(1);
  let max: usize = request
    .param("max-results")
    .and_then(|s| s.parse().ok())
    .unwrap_or(25);

  let entries = json["feed"]["entry"]
    .as_array()
    .cloned()
    .unwrap_or_default();
  let page: Vec<_> = entries.into_iter().skip(start.saturating_sub(1)).take(max).collect();

  // the live feed drops the key entirely past the last page
  let feed = json["feed"].as_object_mut().expect("feed object");
  if page.is_empty() {
    feed.remove("entry");
  } else {
    feed.insert("entry".into(), serde_json::Value::Array(page));
  }

  json.to_string()
}
