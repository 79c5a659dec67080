use std::{sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::Result;
use crate::i18n::{Language, Message};
use crate::widget::{Session, SharedSurface};

const WORDS_PER_MINUTE: usize = 200;

/// Minutes needed to read `text`, rounded up. Never less than one.
pub fn reading_time(text: &str) -> usize {
  let words = text.split_whitespace().count().max(1);
  words.div_ceil(WORDS_PER_MINUTE)
}

pub fn reading_time_label(text: &str, language: Language) -> String {
  let minutes: String = reading_time(text)
    .to_string()
    .chars()
    .map(|c| language.localize_digit(c))
    .collect();
  language.translate_count(Message::ReadingTime, minutes)
}

/// Write the reading time of `text` into the configured element.
pub fn show_reading_time(session: &Session, text: &str) -> usize {
  let config = &session.config;
  let label = reading_time_label(text, config.language);
  session.surface.set_text(&config.reading_time.element, &label);
  reading_time(text)
}

#[async_trait::async_trait]
pub trait Clipboard: Send + Sync {
  async fn write_text(&self, text: &str) -> Result<()>;
}

/// Terminal clipboard through the OSC 52 escape sequence.
pub struct Osc52Clipboard;

pub fn osc52_sequence(text: &str) -> String {
  format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

#[async_trait::async_trait]
impl Clipboard for Osc52Clipboard {
  async fn write_text(&self, text: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
  }
}

/// Copies a post link and flashes a confirmation tooltip.
pub struct CopyLink {
  clipboard: Arc<dyn Clipboard>,
  surface: SharedSurface,
  tooltip: String,
  duration: Duration,
  language: Language,
}

impl CopyLink {
  pub fn new(session: &Session, clipboard: Arc<dyn Clipboard>) -> Self {
    let config = &session.config;
    Self {
      clipboard,
      surface: session.surface.clone(),
      tooltip: config.copy_link.tooltip.clone(),
      duration: config.copy_link.tooltip_duration,
      language: config.language,
    }
  }

  /// Returns whether the link reached the clipboard.
  pub async fn copy(&self, url: &str) -> bool {
    if let Err(e) = self.clipboard.write_text(url).await {
      warn!("failed to copy link: {e}");
      return false;
    }

    info!("copied {url}");
    let message = self.language.translate(Message::CopyLinkSuccess);
    self.surface.set_text(&self.tooltip, message);
    self.surface.set_visible(&self.tooltip, true);

    tokio::time::sleep(self.duration).await;
    self.surface.set_visible(&self.tooltip, false);
    true
  }
}

#[cfg(test)]
mod test {
  use std::sync::Mutex;

  use crate::config::WidgetConfig;
  use crate::error::Error;
  use crate::i18n::Direction;
  use crate::store::MemoryStore;
  use crate::surface::HtmlPage;
  use crate::test_utils::MockSource;

  use super::*;

  #[derive(Default)]
  struct FakeClipboard {
    broken: bool,
    written: Mutex<Vec<String>>,
  }

  #[async_trait::async_trait]
  impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
      if self.broken {
        return Err(Error::Message("clipboard unavailable".into()));
      }
      self.written.lock().unwrap().push(text.to_owned());
      Ok(())
    }
  }

  fn session(language: Language) -> (Arc<HtmlPage>, Session) {
    let config = WidgetConfig {
      language,
      ..WidgetConfig::default()
    };
    let page = Arc::new(HtmlPage::new(language, Direction::Ltr));
    let session = Session::new(
      config,
      Arc::new(MockSource::default()),
      page.clone(),
      Arc::new(MemoryStore::default()),
    );
    (page, session)
  }

  #[test]
  fn test_reading_time_rounds_up() {
    assert_eq!(reading_time(""), 1);
    assert_eq!(reading_time("one"), 1);
    assert_eq!(reading_time(&"word ".repeat(200)), 1);
    assert_eq!(reading_time(&"word ".repeat(201)), 2);
    assert_eq!(reading_time(&"word\n\t".repeat(1000)), 5);
  }

  #[test]
  fn test_show_reading_time() {
    let (page, session) = session(Language::En);
    let minutes = show_reading_time(&session, &"word ".repeat(450));
    assert_eq!(minutes, 3);
    assert_eq!(
      page.element("reading-time").unwrap().text.as_deref(),
      Some("3 min read")
    );

    assert_eq!(reading_time_label("a b", Language::Ar), "١ دقائق للقراءة");
  }

  #[test]
  fn test_adjacent_paragraphs_count_separately() {
    let page = format!(
      r#"<div class="post-body"><p>{}end</p><p>start</p></div>"#,
      "word ".repeat(199)
    );
    let text = crate::html::selected_text(&page, ".post-body")
      .unwrap()
      .unwrap();
    assert_eq!(text.split_whitespace().count(), 201);
    assert_eq!(reading_time(&text), 2);
  }

  #[test]
  fn test_osc52_sequence() {
    assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
  }

  #[tokio::test(start_paused = true)]
  async fn test_copy_shows_then_hides_tooltip() {
    let (page, session) = session(Language::En);
    let clipboard = Arc::new(FakeClipboard::default());
    let copy_link = CopyLink::new(&session, clipboard.clone());

    let url = "https://blog.example.com/p.html";
    let (copied, ()) = tokio::join!(copy_link.copy(url), async {
      tokio::time::sleep(Duration::from_millis(1900)).await;
      let tooltip = page.element("copy-link-tooltip").unwrap();
      assert_eq!(tooltip.text.as_deref(), Some("Article link copied"));
      assert_eq!(tooltip.visible, Some(true));
    });

    assert!(copied);
    assert_eq!(page.element("copy-link-tooltip").unwrap().visible, Some(false));
    assert_eq!(*clipboard.written.lock().unwrap(), vec![url.to_owned()]);
  }

  #[tokio::test]
  async fn test_copy_failure_shows_nothing() {
    let (page, session) = session(Language::En);
    let clipboard = Arc::new(FakeClipboard {
      broken: true,
      ..FakeClipboard::default()
    });

    let copied = CopyLink::new(&session, clipboard).copy("x").await;
    assert!(!copied);
    assert!(page.element("copy-link-tooltip").is_none());
  }
}
