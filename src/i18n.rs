use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Ar,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  #[default]
  Ltr,
  Rtl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
  LoadMore,
  Loading,
  NoMorePosts,
  NoMoreComments,
  CopyLinkSuccess,
  ReadingTime,
  GridView,
  ListView,
  CommentCount,
  RelatedPosts,
  ErrorOccurred,
}

impl Language {
  /// Resolve a document language tag such as "ar-EG". Only the primary
  /// subtag is considered; unsupported languages fall back to English.
  pub fn from_tag(tag: &str) -> Self {
    let primary = tag.split(['-', '_']).next().unwrap_or_default();
    match primary.to_ascii_lowercase().as_str() {
      "ar" => Language::Ar,
      _ => Language::default(),
    }
  }

  /// Writing direction of the language's script.
  pub fn direction(self) -> Direction {
    match self {
      Language::En => Direction::Ltr,
      Language::Ar => Direction::Rtl,
    }
  }

  pub fn translate(self, message: Message) -> &'static str {
    use Message::*;

    match (self, message) {
      (Language::En, LoadMore) => "Load More",
      (Language::En, Loading) => "Loading...",
      (Language::En, NoMorePosts) => "No more posts",
      (Language::En, NoMoreComments) => "No more comments",
      (Language::En, CopyLinkSuccess) => "Article link copied",
      (Language::En, ReadingTime) => "{} min read",
      (Language::En, GridView) => "Grid View",
      (Language::En, ListView) => "List View",
      (Language::En, CommentCount) => "{} Comments",
      (Language::En, RelatedPosts) => "Suggested for you",
      (Language::En, ErrorOccurred) => "An error occurred. Please try again.",

      (Language::Ar, LoadMore) => "تحميل المزيد",
      (Language::Ar, Loading) => "جاري التحميل...",
      (Language::Ar, NoMorePosts) => "لا توجد مزيد من المقالات",
      (Language::Ar, NoMoreComments) => "لا توجد المزيد من التعليقات",
      (Language::Ar, CopyLinkSuccess) => "تم نسخ رابط المقال",
      (Language::Ar, ReadingTime) => "{} دقائق للقراءة",
      (Language::Ar, GridView) => "عرض شبكي",
      (Language::Ar, ListView) => "عرض القائمة",
      (Language::Ar, CommentCount) => "{} تعليقات",
      (Language::Ar, RelatedPosts) => "مقترح لك",
      (Language::Ar, ErrorOccurred) => "حدث خطأ. حاول مرة أخرى.",
    }
  }

  /// Translate a message with a `{}` placeholder.
  pub fn translate_count(self, message: Message, count: impl ToString) -> String {
    self
      .translate(message)
      .replacen("{}", &count.to_string(), 1)
  }

  pub fn localize_digit(self, c: char) -> char {
    match (self, c.to_digit(10)) {
      (Language::Ar, Some(d)) => char::from_u32(0x0660 + d).unwrap_or(c),
      _ => c,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_language_from_tag() {
    assert_eq!(Language::from_tag("ar-EG"), Language::Ar);
    assert_eq!(Language::from_tag("ar"), Language::Ar);
    assert_eq!(Language::from_tag("en-US"), Language::En);
    assert_eq!(Language::from_tag("fr"), Language::En);
    assert_eq!(Language::from_tag(""), Language::En);
    assert_eq!(Language::from_tag("ar-EG").direction(), Direction::Rtl);
  }

  #[test]
  fn test_translate_count() {
    assert_eq!(
      Language::En.translate_count(Message::ReadingTime, 4),
      "4 min read"
    );
    assert_eq!(
      Language::Ar.translate_count(Message::CommentCount, 3),
      "3 تعليقات"
    );
  }

  #[test]
  fn test_localize_digit() {
    assert_eq!(Language::Ar.localize_digit('7'), '٧');
    assert_eq!(Language::En.localize_digit('7'), '7');
    assert_eq!(Language::Ar.localize_digit('x'), 'x');
  }
}
