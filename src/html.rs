use std::collections::HashMap;

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::ConfigError;

const BLOCK_ELEMENTS: &[&str] = &[
  "address", "article", "aside", "blockquote", "br", "dd", "div", "dl",
  "dt", "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5",
  "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table", "td",
  "th", "tr", "ul",
];

/// Text of `elem` and its children. Block elements start on a new word.
fn push_text(elem: ElementRef<'_>, out: &mut String) {
  for node in elem.descendants() {
    match node.value() {
      Node::Text(text) => out.push_str(text),
      Node::Element(e) if BLOCK_ELEMENTS.contains(&e.name()) => {
        separate(out)
      }
      _ => {}
    }
  }
}

fn separate(out: &mut String) {
  if !out.is_empty() && !out.ends_with(char::is_whitespace) {
    out.push(' ');
  }
}

/// Text content of an HTML fragment, markup removed.
pub fn strip_markup(fragment: &str) -> String {
  let html = Html::parse_fragment(fragment);
  let mut text = String::new();
  push_text(html.root_element(), &mut text);
  text.trim().to_owned()
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
  Selector::parse(selector)
    .map_err(|e| ConfigError::Message(format!("bad selector {selector}: {e}")))
}

/// Attributes of the element with the given id, if the page has one.
pub fn element_attributes(
  document: &str,
  id: &str,
) -> Result<Option<HashMap<String, String>>, ConfigError> {
  let html = Html::parse_document(document);
  let selector = parse_selector(&format!("[id=\"{id}\"]"))?;

  let attrs = html.select(&selector).next().map(|elem| {
    elem
      .value()
      .attrs()
      .map(|(name, value)| (name.to_owned(), value.to_owned()))
      .collect()
  });

  Ok(attrs)
}

/// Concatenated text of every element matching `selector`.
pub fn selected_text(
  document: &str,
  selector: &str,
) -> Result<Option<String>, ConfigError> {
  let html = Html::parse_document(document);
  let selector = parse_selector(selector)?;

  let mut matched = false;
  let mut text = String::new();
  for elem in html.select(&selector) {
    matched = true;
    push_text(elem, &mut text);
    separate(&mut text);
  }

  Ok(matched.then_some(text))
}
