use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  sync::Arc,
};

use clap::Parser;
use tracing::{info, warn};
use url::Url;

use crate::{
  config::WidgetConfig,
  error::{ConfigError, Error, Result},
  feed::QueryFilter,
  html,
  i18n::Language,
  store::FileStore,
  surface::HtmlPage,
  ux::{self, CopyLink, Osc52Clipboard},
  widget::{
    LoadResult, RelatedConfig, RelatedOutcome, Session, ViewMode,
    ViewPreference,
  },
};

const DEFAULT_PREFERENCES: &str = "feed-widgets.json";

#[derive(Parser)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,

  /// YAML widget configuration; defaults apply when omitted
  #[clap(long, short, env = "FEED_WIDGETS_CONFIG")]
  config: Option<PathBuf>,

  /// Document language tag, e.g. "ar-EG"
  #[clap(long)]
  lang: Option<String>,

  /// Blog origin serving the feeds
  #[clap(long)]
  origin: Option<Url>,
}

#[derive(Parser)]
enum SubCommand {
  /// Render pages of the post listing
  Posts(PostsArgs),
  /// Render pages of recent comments
  Comments(CommentsArgs),
  /// Render the related-posts section for a post
  Related(RelatedArgs),
  /// Show or change the stored grid/list preference
  View(ViewArgs),
  /// Estimate the reading time of an article page
  ReadingTime(ReadingTimeArgs),
  /// Copy a post link to the terminal clipboard
  CopyLink(CopyLinkArgs),
}

#[derive(Parser)]
struct PostsArgs {
  /// Number of "load more" presses
  #[clap(long, default_value_t = 1)]
  pages: usize,
  /// Free-text search
  #[clap(long, conflicts_with = "label")]
  search: Option<String>,
  /// Only posts under this label
  #[clap(long)]
  label: Option<String>,
  /// Switch the view before rendering
  #[clap(long, value_enum)]
  view: Option<ViewMode>,
}

#[derive(Parser)]
struct CommentsArgs {
  #[clap(long, default_value_t = 1)]
  pages: usize,
}

#[derive(Parser)]
struct RelatedArgs {
  /// Post page carrying the related-posts container
  #[clap(long, conflicts_with_all = ["post_id", "tags"])]
  page: Option<PathBuf>,
  #[clap(long, requires = "tags")]
  post_id: Option<String>,
  /// Labels of the post as a JSON array
  #[clap(long)]
  tags: Option<String>,
  #[clap(long)]
  max_results: Option<usize>,
  #[clap(long)]
  length: Option<usize>,
  /// Seed for a reproducible sample
  #[clap(long)]
  seed: Option<u64>,
}

#[derive(Parser)]
struct ViewArgs {
  #[clap(value_enum)]
  mode: Option<ViewMode>,
}

#[derive(Parser)]
struct ReadingTimeArgs {
  file: PathBuf,
}

#[derive(Parser)]
struct CopyLinkArgs {
  url: String,
}

impl Cli {
  pub async fn run(self) -> Result<()> {
    let config = self.load_config()?;
    let (session, page) = build_session(config)?;

    match self.subcmd {
      SubCommand::Posts(args) => render_posts(&session, args).await,
      SubCommand::Comments(args) => render_comments(&session, args).await,
      SubCommand::Related(args) => render_related(&session, args).await?,
      SubCommand::View(args) => return switch_view(&session, args),
      SubCommand::ReadingTime(args) => {
        let minutes = reading_time(&session, &args.file)?;
        info!("{}: {minutes} min", args.file.display());
      }
      SubCommand::CopyLink(args) => {
        let copy_link = CopyLink::new(&session, Arc::new(Osc52Clipboard));
        if !copy_link.copy(&args.url).await {
          return Err(Error::Message("could not copy the link".into()));
        }
      }
    }

    println!("{}", page.render().into_string());
    Ok(())
  }

  fn load_config(&self) -> Result<WidgetConfig> {
    let mut config = match &self.config {
      Some(path) => WidgetConfig::load_from_file(path)?,
      None => WidgetConfig::default(),
    };

    if let Some(tag) = &self.lang {
      config.language = Language::from_tag(tag);
      config.direction = None;
    }
    if let Some(origin) = &self.origin {
      config.origin = origin.clone();
    }

    Ok(config)
  }
}

fn build_session(config: WidgetConfig) -> Result<(Session, Arc<HtmlPage>)> {
  let source = Arc::new(config.client.build(config.origin.clone())?);
  let page = Arc::new(HtmlPage::new(config.language, config.direction()));
  let preferences = config
    .preferences
    .clone()
    .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES));
  let store = Arc::new(FileStore::open(&preferences)?);

  let session = Session::new(config, source, page.clone(), store);
  Ok((session, page))
}

async fn render_posts(session: &Session, args: PostsArgs) {
  let filter = match (args.search, args.label) {
    (Some(search), _) => Some(QueryFilter::Search(search)),
    (None, Some(label)) => Some(QueryFilter::Label(label)),
    (None, None) => None,
  };

  let listing = session.posts(filter);
  listing.mount();
  if let Some(mode) = args.view {
    listing.select_view(mode);
  }

  for _ in 0..args.pages {
    match listing.load_more().await {
      LoadResult::Rendered(n) => info!("rendered {n} posts"),
      LoadResult::Exhausted | LoadResult::Skipped => break,
      LoadResult::Failed => {
        warn!("stopping after a failed page");
        break;
      }
    }
  }
}

async fn render_comments(session: &Session, args: CommentsArgs) {
  let comments = session.comments();
  let mut result = comments.load_initial().await;

  for _ in 1..args.pages {
    if !matches!(result, LoadResult::Rendered(_)) {
      break;
    }
    result = comments.load_more().await;
  }
  info!("rendered {} comments", comments.rendered());
}

async fn render_related(session: &Session, args: RelatedArgs) -> Result<()> {
  let widget = session.related(args.seed);
  let defaults = &session.config.related;

  let outcome = match &args.page {
    Some(path) => {
      let document = std::fs::read_to_string(path)?;
      let mut attrs = html::element_attributes(&document, &defaults.container)?
        .ok_or_else(|| {
          ConfigError::Message(format!(
            "no #{} element in {}",
            defaults.container,
            path.display()
          ))
        })?;
      override_attr(&mut attrs, "data-max-results", args.max_results);
      override_attr(&mut attrs, "data-length", args.length);
      widget.mount(&attrs).await?
    }
    None => {
      let tags = args.tags.as_deref().unwrap_or("[]");
      let attrs = HashMap::from([
        ("data-bjs".to_owned(), "related".to_owned()),
        ("data-id".to_owned(), args.post_id.clone().unwrap_or_default()),
        ("data-tags".to_owned(), tags.to_owned()),
      ]);
      let mut related = RelatedConfig::from_attributes(&attrs, defaults)?
        .ok_or_else(|| ConfigError::Message("not a related widget".into()))?;
      related.max_results = args.max_results.unwrap_or(related.max_results);
      related.length = args.length.unwrap_or(related.length);
      widget.load(&related).await
    }
  };

  match outcome {
    RelatedOutcome::Rendered(n) => info!("rendered {n} related posts"),
    other => info!("related posts: {other:?}"),
  }
  Ok(())
}

fn override_attr(
  attrs: &mut HashMap<String, String>,
  name: &str,
  value: Option<usize>,
) {
  if let Some(value) = value {
    attrs.insert(name.to_owned(), value.to_string());
  }
}

fn switch_view(session: &Session, args: ViewArgs) -> Result<()> {
  let preference = ViewPreference::load(session.store.clone());
  if let Some(mode) = args.mode {
    preference.set(mode)?;
  }

  let mode = match preference.mode() {
    ViewMode::Grid => "grid",
    ViewMode::List => "list",
  };
  println!("{mode}");
  Ok(())
}

fn reading_time(session: &Session, path: &Path) -> Result<usize> {
  let document = std::fs::read_to_string(path)?;
  let body = &session.config.reading_time.body;

  let text = match html::selected_text(&document, body)? {
    Some(text) => text,
    None => {
      warn!("no {body} in {}, counting the whole page", path.display());
      html::strip_markup(&document)
    }
  };

  Ok(ux::show_reading_time(session, &text))
}
