mod response;

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{FetchError, Result};
use crate::feed::{self, FeedEntry, FeedQuery};

pub use self::response::Response;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
  user_agent: Option<String>,
  #[serde(default = "default_timeout")]
  #[serde(deserialize_with = "duration_str::deserialize_duration")]
  timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: None,
      timeout: default_timeout(),
    }
  }
}

impl ClientConfig {
  fn to_builder(&self) -> reqwest::ClientBuilder {
    let user_agent = self
      .user_agent
      .as_deref()
      .unwrap_or(crate::util::USER_AGENT);

    reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(self.timeout)
  }

  pub fn build(&self, origin: Url) -> Result<FeedClient> {
    let client = self.to_builder().build()?;
    Ok(FeedClient { origin, client })
  }
}

/// Anything that can answer a feed query. Widgets only see this trait.
#[async_trait::async_trait]
pub trait FeedSource {
  async fn fetch_entries(
    &self,
    query: &FeedQuery,
  ) -> Result<Vec<FeedEntry>, FetchError>;
}

pub type BoxedSource = Arc<dyn FeedSource + Send + Sync>;

/// Reads the feed endpoints of one blog origin.
pub struct FeedClient {
  origin: Url,
  client: reqwest::Client,
}

impl FeedClient {
  async fn get(&self, url: &Url) -> Result<Response, FetchError> {
    let resp = self.client.get(url.clone()).send().await?;
    Response::from_reqwest_resp(resp).await
  }
}

#[async_trait::async_trait]
impl FeedSource for FeedClient {
  async fn fetch_entries(
    &self,
    query: &FeedQuery,
  ) -> Result<Vec<FeedEntry>, FetchError> {
    let url = query.to_url(&self.origin)?;
    debug!("fetching {url}");

    let resp = self.get(&url).await?.error_for_status()?;
    let entries = feed::parse_entries(&resp.text())?;
    debug!("received {} entries from {url}", entries.len());
    Ok(entries)
  }
}

fn default_timeout() -> Duration {
  Duration::from_secs(10)
}
