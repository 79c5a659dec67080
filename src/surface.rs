use std::{collections::BTreeMap, sync::Mutex};

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::i18n::{Direction, Language};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriggerStyle {
  #[default]
  Normal,
  /// Shown while a failed load cools down
  Error,
  /// Nothing left to load
  Muted,
}

/// Visible state of a load-more control.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TriggerView {
  pub label: String,
  pub disabled: bool,
  pub busy: bool,
  pub style: TriggerStyle,
}

/// The page the widgets render into, addressed by element id.
///
/// Widgets never touch markup of elements they don't own; everything
/// goes through these calls so the host can be swapped.
pub trait Surface: Send + Sync {
  fn append(&self, id: &str, fragment: Markup);
  fn replace(&self, id: &str, fragment: Markup);
  fn set_class(&self, id: &str, class: &str);
  fn set_text(&self, id: &str, text: &str);
  fn set_trigger(&self, id: &str, view: TriggerView);
  fn set_active(&self, id: &str, active: bool);
  fn set_visible(&self, id: &str, visible: bool);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
  pub class: Option<String>,
  pub children: Vec<String>,
  pub text: Option<String>,
  pub trigger: Option<TriggerView>,
  pub active: Option<bool>,
  pub visible: Option<bool>,
}

impl Element {
  pub fn html(&self) -> String {
    self.children.concat()
  }
}

/// In-memory surface that can be serialized to an HTML document.
pub struct HtmlPage {
  language: Language,
  direction: Direction,
  elements: Mutex<BTreeMap<String, Element>>,
}

impl HtmlPage {
  pub fn new(language: Language, direction: Direction) -> Self {
    Self {
      language,
      direction,
      elements: Mutex::new(BTreeMap::new()),
    }
  }

  fn with_element(&self, id: &str, f: impl FnOnce(&mut Element)) {
    let mut elements = self.elements.lock().unwrap_or_else(|e| e.into_inner());
    f(elements.entry(id.to_owned()).or_default());
  }

  pub fn element(&self, id: &str) -> Option<Element> {
    let elements = self.elements.lock().unwrap_or_else(|e| e.into_inner());
    elements.get(id).cloned()
  }

  pub fn trigger(&self, id: &str) -> Option<TriggerView> {
    self.element(id).and_then(|e| e.trigger)
  }

  pub fn render_element(&self, id: &str) -> Markup {
    match self.element(id) {
      Some(element) => element_fragment(id, &element),
      None => html! {},
    }
  }

  pub fn render(&self) -> Markup {
    let elements = self.elements.lock().unwrap_or_else(|e| e.into_inner());
    let lang = match self.language {
      Language::En => "en",
      Language::Ar => "ar",
    };
    let dir = match self.direction {
      Direction::Ltr => "ltr",
      Direction::Rtl => "rtl",
    };

    html! {
      (DOCTYPE)
      html lang=(lang) dir=(dir) {
        head {
          meta charset="utf-8";
        }
        body {
          @for (id, element) in elements.iter() {
            (element_fragment(id, element))
          }
        }
      }
    }
  }
}

impl Surface for HtmlPage {
  fn append(&self, id: &str, fragment: Markup) {
    self.with_element(id, |e| e.children.push(fragment.into_string()));
  }

  fn replace(&self, id: &str, fragment: Markup) {
    self.with_element(id, |e| e.children = vec![fragment.into_string()]);
  }

  fn set_class(&self, id: &str, class: &str) {
    self.with_element(id, |e| e.class = Some(class.to_owned()));
  }

  fn set_text(&self, id: &str, text: &str) {
    self.with_element(id, |e| e.text = Some(text.to_owned()));
  }

  fn set_trigger(&self, id: &str, view: TriggerView) {
    self.with_element(id, |e| e.trigger = Some(view));
  }

  fn set_active(&self, id: &str, active: bool) {
    self.with_element(id, |e| e.active = Some(active));
  }

  fn set_visible(&self, id: &str, visible: bool) {
    self.with_element(id, |e| e.visible = Some(visible));
  }
}

fn element_class(element: &Element) -> String {
  let mut classes: Vec<&str> = element
    .class
    .as_deref()
    .map(|c| c.split_whitespace().collect())
    .unwrap_or_default();

  if element.active == Some(true) {
    classes.push("active");
  }
  match element.visible {
    Some(true) => classes.push("opacity-100"),
    Some(false) => classes.push("opacity-0"),
    None => {}
  }
  if let Some(trigger) = &element.trigger {
    match trigger.style {
      TriggerStyle::Normal => {}
      TriggerStyle::Error => classes.push("err"),
      TriggerStyle::Muted => classes.push("cursor-not-allowed"),
    }
  }

  classes.join(" ")
}

fn element_fragment(id: &str, element: &Element) -> Markup {
  let class = element_class(element);

  html! {
    @if let Some(trigger) = &element.trigger {
      button id=(id) class=(class) disabled[trigger.disabled] {
        (trigger.label)
        @if trigger.busy {
          " " span.mask.spin {}
        }
      }
    } @else {
      div id=(id) class=(class) {
        @if let Some(text) = &element.text {
          (text)
        }
        (PreEscaped(element.html()))
      }
    }
  }
}
