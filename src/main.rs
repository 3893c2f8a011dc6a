mod app;
mod cache;
mod config;
mod constants;
mod dataset;
mod display;
mod duration;
mod error;
mod export;
mod input;
mod model;
mod normalize;
mod session;
mod strategy;
mod theme;
mod trends;
mod ui;
mod youtube;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{API_KEY_ENV, Config};
use constants::constants;
use session::Session;
use strategy::{Outcome, Request};
use trends::{GoogleTrends, StaticTrends, Trends};
use youtube::YouTubeClient;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Region code for charts, categories and trends (default from prefs, then KR)
  #[arg(short, long, global = true)]
  region: Option<String>,

  /// Display language for category names
  #[arg(short, long, global = true)]
  language: Option<String>,

  /// YouTube Data API key (overrides YOUTUBE_API_KEY and prefs.toml)
  #[arg(long, global = true)]
  api_key: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Keyword search, sorted by views
  Search {
    query: String,
    /// Maximum number of results (at most 50)
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    export: Option<PathBuf>,
  },
  /// Most-popular chart with excluded categories filtered out
  Chart {
    #[arg(long)]
    export: Option<PathBuf>,
  },
  /// Most-viewed recent videos across every category
  Top {
    #[arg(long)]
    export: Option<PathBuf>,
  },
  /// One best-match video per trending search phrase, in trend order
  Trends {
    /// File with one phrase per line instead of the live trends feed
    #[arg(long)]
    phrases: Option<PathBuf>,
    #[arg(long)]
    export: Option<PathBuf>,
  },
  /// List the category map for the region
  Categories,
}

// --- Logging ---

/// Interactive mode logs to a daily file so the terminal stays clean; headless mode logs to stderr.
fn init_logging(interactive: bool) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  if interactive {
    let dir = ProjectDirs::from("", "", "yta")
      .map(|dirs| dirs.data_dir().join("logs"))
      .unwrap_or_else(|| PathBuf::from("logs"));
    let appender = tracing_appender::rolling::daily(dir, "yta.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Some(guard)
  } else {
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    None
  }
}

// --- Session ---

fn build_session(args: &Args, config: &Config, phrases_file: Option<&Path>) -> Result<Session> {
  let Some(api_key) = config.resolve_api_key(args.api_key.as_deref(), std::env::var(API_KEY_ENV).ok()) else {
    bail!("No API key. Pass --api-key, set {}, or add api_key to {}", API_KEY_ENV, prefs_location());
  };
  let api = YouTubeClient::new(api_key).context("Failed to create API client")?;

  let trends = match (phrases_file, &config.trend_phrases) {
    (Some(path), _) => Trends::Static(StaticTrends::from_file(path)?),
    (None, Some(phrases)) => Trends::Static(StaticTrends::new(phrases.clone())),
    (None, None) => Trends::Feed(GoogleTrends::new(api.http().clone(), constants().trends_feed_url.clone())),
  };

  let region = args.region.clone().unwrap_or_else(|| config.region()).to_uppercase();
  let language = args.language.clone().unwrap_or_else(|| config.language());
  info!(region = %region, language = %language, "session: starting");
  Ok(Session::new(api, trends, region, language, config.excluded_categories()))
}

fn prefs_location() -> String {
  Config::path().map(|p| p.display().to_string()).unwrap_or_else(|| "prefs.toml".to_string())
}

// --- Headless ---

async fn run_headless(args: &Args, command: &Command, config: &Config) -> Result<()> {
  let phrases = match command {
    Command::Trends { phrases, .. } => phrases.as_deref(),
    _ => None,
  };
  let mut session = build_session(args, config, phrases)?;

  let (request, export_path) = match command {
    Command::Search { query, limit, export } => {
      let mut request = Request::search(query.as_str(), args.region.clone());
      if let (Request::Search(params), Some(limit)) = (&mut request, limit) {
        params.limit = *limit;
      }
      (request, export)
    }
    Command::Chart { export } => (session.chart_request(), export),
    Command::Top { export } => (session.category_top_request(), export),
    Command::Trends { export, .. } => (session.trends_request(), export),
    Command::Categories => {
      let categories = session.ensure_categories().await.context("Failed to load categories")?;
      for (id, category) in categories.iter() {
        let marker = if category.assignable { "" } else { "  (not assignable)" };
        println!("{:>4}  {}{}", id, category.name, marker);
      }
      return Ok(());
    }
  };

  match session.fetch(&request).await {
    Outcome::Table(dataset) => {
      print!("{}", display::render_table(&dataset));
      if let Some(path) = export_path {
        export::write_xlsx(&dataset, path)?;
        eprintln!("Exported {} rows to {}", dataset.len(), path.display());
      }
      Ok(())
    }
    Outcome::Empty => {
      eprintln!("No results found.");
      Ok(())
    }
    Outcome::Failed(msg) => bail!("{} failed: {}", request.name(), msg),
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _guard = init_logging(args.command.is_none());
  let config = Config::load();

  if let Some(command) = &args.command {
    return run_headless(&args, command, &config).await;
  }

  let session = build_session(&args, &config, None)?;
  let mut app = App::new(session, theme::theme_index(config.theme_name.as_deref()));

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, &mut app).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
  app.start();

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  info!("exiting");
  Ok(())
}
