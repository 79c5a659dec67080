use std::{collections::HashMap, sync::Mutex};

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::config::ImageDefaults;
use crate::feed::FeedEntry;
use crate::html::strip_markup;
use crate::i18n::Language;
use crate::util::date;

pub const NO_TITLE: &str = "No Title";
pub const NO_LINK: &str = "#";
pub const NO_EXCERPT: &str = "No excerpt available";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

const EXCERPT_CHARS: usize = 100;
const ELLIPSIS: &str = "...";
const BLANK_AVATARS: [&str; 2] = ["g/blank.gif", "g/b16-rounded.gif"];

lazy_static::lazy_static! {
  static ref SIZE_SEGMENT: Regex = Regex::new(r"/s[0-9]+(-c)?/").expect("bad regex");
  static ref AVATAR_SIZE_SEGMENT: Regex = Regex::new(r"/s\d+-c/").expect("bad regex");
}

/// Where a thumbnail is shown; decides the size token and placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSize {
  Grid,
  Related,
}

impl ImageSize {
  fn token(self) -> &'static str {
    match self {
      ImageSize::Grid => "/s640/",
      ImageSize::Related => "/s300-c/",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayItem {
  pub title: String,
  pub url: String,
  pub image: String,
  pub excerpt: String,
  pub author: String,
  pub avatar: String,
  /// Timestamp as used for the `datetime` attribute
  pub published: String,
  pub date: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentItem {
  pub author: String,
  pub body: String,
  pub published: String,
  pub date: String,
  /// Title of the commented post, when the entry title names it
  pub post_title: Option<String>,
}

/// Turns raw feed entries into display records. Lives for one page
/// session and memoizes avatar rewrites per author image.
pub struct EntryMapper {
  images: ImageDefaults,
  language: Language,
  session_start: DateTime<FixedOffset>,
  avatars: Mutex<HashMap<String, String>>,
}

impl EntryMapper {
  pub fn new(images: ImageDefaults, language: Language) -> Self {
    Self {
      images,
      language,
      session_start: date::now(),
      avatars: Mutex::new(HashMap::new()),
    }
  }

  pub fn language(&self) -> Language {
    self.language
  }

  /// Date used for entries without a usable publish timestamp.
  pub fn session_start(&self) -> DateTime<FixedOffset> {
    self.session_start
  }

  pub fn map_entry(&self, entry: &FeedEntry, size: ImageSize) -> DisplayItem {
    let (published, date) = self.published(entry);

    DisplayItem {
      title: entry.title().unwrap_or(NO_TITLE).to_owned(),
      url: entry.alternate_link().unwrap_or(NO_LINK).to_owned(),
      image: self.image(entry, size),
      excerpt: excerpt_of(entry),
      author: entry.author_name().unwrap_or(UNKNOWN_AUTHOR).to_owned(),
      avatar: self.avatar(entry.author_image()),
      published,
      date,
    }
  }

  pub fn map_comment(&self, entry: &FeedEntry) -> CommentItem {
    let (published, date) = self.published(entry);
    let post_title = entry
      .title()
      .and_then(|title| title.split(" on ").nth(1))
      .map(str::to_owned);

    CommentItem {
      author: entry.author_name().unwrap_or(UNKNOWN_AUTHOR).to_owned(),
      body: entry.content().map(strip_markup).unwrap_or_default(),
      published,
      date,
      post_title,
    }
  }

  fn published(&self, entry: &FeedEntry) -> (String, String) {
    let parsed = entry.published().and_then(date::parse_date);
    let timestamp = parsed.unwrap_or(self.session_start);
    let raw = match (entry.published(), parsed) {
      (Some(raw), Some(_)) => raw.to_owned(),
      _ => timestamp.to_rfc3339(),
    };

    (raw, date::format_long_date(&timestamp, self.language))
  }

  fn image(&self, entry: &FeedEntry, size: ImageSize) -> String {
    match entry.thumbnail_url() {
      Some(url) => resize_image(url, size),
      None => match size {
        ImageSize::Grid => self.images.grid_placeholder.clone(),
        ImageSize::Related => self.images.related_placeholder.clone(),
      },
    }
  }

  fn avatar(&self, src: Option<&str>) -> String {
    let Some(src) = src else {
      return self.images.default_avatar.clone();
    };

    let mut avatars = self.avatars.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(cached) = avatars.get(src) {
      return cached.clone();
    }

    let avatar = if BLANK_AVATARS.iter().any(|blank| src.contains(blank)) {
      self.images.default_avatar.clone()
    } else {
      AVATAR_SIZE_SEGMENT.replace(src, "/s80-c/").into_owned()
    };

    avatars.insert(src.to_owned(), avatar.clone());
    avatar
  }

  #[cfg(test)]
  fn cached_avatars(&self) -> usize {
    self.avatars.lock().unwrap().len()
  }
}

/// Replace the first size segment (`/s72-c/`, `/s1600/`) of an image URL.
pub fn resize_image(url: &str, size: ImageSize) -> String {
  SIZE_SEGMENT.replace(url, size.token()).into_owned()
}

fn excerpt_of(entry: &FeedEntry) -> String {
  if let Some(summary) = entry.summary() {
    return truncate_excerpt(summary);
  }

  match entry.content() {
    Some(content) => truncate_excerpt(&strip_markup(content)),
    None => NO_EXCERPT.to_owned(),
  }
}

/// First 100 characters, trimmed, with "..." appended only when
/// something was cut off.
pub fn truncate_excerpt(text: &str) -> String {
  let head: String = text.chars().take(EXCERPT_CHARS).collect();
  let mut excerpt = head.trim().to_owned();
  if text.chars().count() > EXCERPT_CHARS {
    excerpt.push_str(ELLIPSIS);
  }
  excerpt
}
