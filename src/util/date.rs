use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime, Utc};

use crate::i18n::Language;

const COMMON_DATE_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f", // ISO timestamp without offset
  "%Y-%m-%d %H:%M:%S",    // Common format without timezone
];

pub fn parse_date(date_str: impl AsRef<str>) -> Option<DateTime<FixedOffset>> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Some(parsed);
  }

  for fmt in COMMON_DATE_FORMATS {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_str, fmt) {
      return Some(parsed.and_utc().fixed_offset());
    }
  }

  // date only
  if let Ok(parsed) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
    return parsed
      .and_hms_opt(0, 0, 0)
      .map(|dt| dt.and_utc().fixed_offset());
  }

  None
}

/// Long-form date ("January 5, 2024") in the given language. The date
/// is taken in the timestamp's own offset.
pub fn format_long_date(date: &DateTime<FixedOffset>, lang: Language) -> String {
  match lang {
    Language::En => date.format_localized("%B %-d, %Y", Locale::en_US),
    Language::Ar => date.format_localized("%-d %B %Y", Locale::ar_EG),
  }
  .to_string()
  .chars()
  .map(|c| lang.localize_digit(c))
  .collect()
}

pub fn now() -> DateTime<FixedOffset> {
  Utc::now().fixed_offset()
}
