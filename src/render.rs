use maud::{Markup, html};

use crate::i18n::{Direction, Language, Message};
use crate::mapper::{CommentItem, DisplayItem};
use crate::widget::ViewMode;

pub const RELATED_ERROR: &str =
  "Error loading related posts. Please try again later.";

/// Structural classes of a post card that depend on the view mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardClasses {
  pub card: &'static str,
  pub media: &'static str,
  pub body: &'static str,
}

pub fn card_classes(mode: ViewMode) -> CardClasses {
  match mode {
    ViewMode::Grid => CardClasses {
      card: "rounded-lg dark:bg-neutral-800",
      media: "w-full h-60 rounded-t-lg",
      body: "p-4 dark:bg-neutral-800",
    },
    ViewMode::List => CardClasses {
      card: "rounded-lg flex dark:bg-neutral-800",
      media: "w-1/3 md:h-48 h-60 rounded-r-lg",
      body: "p-4 dark:bg-neutral-800 flex-1",
    },
  }
}

pub fn container_class(mode: ViewMode) -> &'static str {
  match mode {
    ViewMode::Grid => "grid gap-6 grid-cols-1 md:grid-cols-2",
    ViewMode::List => "grid gap-6 grid-cols-1",
  }
}

pub fn post_card(item: &DisplayItem, mode: ViewMode) -> Markup {
  let classes = card_classes(mode);

  html! {
    div class=(classes.card) {
      div class=(classes.media) {
        a aria-label="Image" href=(item.url) {
          img alt=(item.title)
            class="object-cover w-full h-full rounded-t-lg nice-effect"
            src=(item.image);
        }
      }
      div class=(classes.body) {
        h3 class="text-lg font-semibold mb-5" {
          a class="link-title" href=(item.url) { (item.title) }
        }
        p class="text-sm text-neutral-600 dark:text-neutral-300" {
          (item.excerpt)
        }
        div class="shrink-0 group block mt-4" {
          div class="flex items-center" {
            img alt="Avatar"
              class="inline-block shrink-0 w-8 h-8 sm:w-10 sm:h-10 rounded-full"
              src=(item.avatar);
            div class="rtl:mr-3 ltr:ml-3" {
              h3 class="font-semibold text-neutral-800 dark:text-neutral-300 text-sm" {
                (item.author)
              }
              time datetime=(item.published) class="text-xs sm:text-sm text-neutral-500" {
                (item.date)
              }
            }
          }
        }
      }
    }
  }
}

/// Every card of a listing, in order, styled for `mode`.
pub fn post_cards(items: &[DisplayItem], mode: ViewMode) -> Markup {
  html! {
    @for item in items {
      (post_card(item, mode))
    }
  }
}

pub fn related_card(item: &DisplayItem, direction: Direction) -> Markup {
  let (time_margin, author_margin) = match direction {
    Direction::Ltr => ("mr-4", "ml-2"),
    Direction::Rtl => ("ml-4", "mr-2"),
  };

  html! {
    article class="relative isolate flex flex-col justify-end overflow-hidden rounded-lg bg-gray-900 px-4 pb-4 pt-32" {
      img alt="" class="absolute inset-0 -z-10 h-full w-full object-cover"
        width="300" height="200" src=(item.image);
      div class="absolute inset-0 -z-10 bg-gradient-to-t from-gray-900 via-gray-900/40" {}
      div class="flex flex-wrap items-center gap-y-1 overflow-hidden text-sm leading-6 text-gray-300" {
        time datetime=(item.published) class=(time_margin) { (item.date) }
        div class={ (author_margin) " flex items-center gap-x-2 text-gray-500" } {
          span class="relative flex overflow-hidden rounded-full h-5 w-5 flex-none" {
            img class="aspect-square h-full w-full" alt=(item.author) src=(item.avatar);
          }
          span { (item.author) }
        }
      }
      h3 class="mt-2 text-base font-semibold leading-6 text-white" {
        a href=(item.url) { (item.title) }
      }
    }
  }
}

pub fn related_section(
  items: &[DisplayItem],
  language: Language,
  direction: Direction,
) -> Markup {
  let dir = match direction {
    Direction::Ltr => "ltr",
    Direction::Rtl => "rtl",
  };

  html! {
    div class="items-related" {
      div class="widget-title mb-4" {
        h3 class="text-lg font-bold mb-2" {
          (language.translate(Message::RelatedPosts))
        }
      }
      div class="mt-3 grid auto-rows-fr grid-cols-1 gap-4 lg:grid-cols-3" dir=(dir) {
        @for item in items {
          (related_card(item, direction))
        }
      }
    }
  }
}

pub fn related_error() -> Markup {
  html! {
    p class="text-red-500" { (RELATED_ERROR) }
  }
}

pub fn comment_card(item: &CommentItem) -> Markup {
  html! {
    div class="mintblogger-comment" {
      div class="comment-author" { (item.author) }
      div class="comment-content" { (item.body) }
      div class="comment-meta" {
        time class="comment-date" datetime=(item.published) { (item.date) }
        @if let Some(post_title) = &item.post_title {
          span class="comment-post" { (post_title) }
        }
      }
    }
  }
}

pub fn comment_count(count: usize, language: Language) -> String {
  let count: String = count
    .to_string()
    .chars()
    .map(|c| language.localize_digit(c))
    .collect();
  language.translate_count(Message::CommentCount, count)
}
