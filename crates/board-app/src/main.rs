//! board-demo: runs a scripted session against the in-memory backend and
//! prints the rendered feed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use board_app::BoardApp;
use board_config_and_utils::{init_logging, Config, Paths};
use board_core::SortOrder;
use clap::Parser;
use tracing::info;

const SETTLE: Duration = Duration::from_secs(2);

/// Board client playground.
#[derive(Parser)]
#[command(name = "board-demo")]
#[command(about = "Run a scripted board session and print the rendered feed")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ~/.board/config.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feed order (newest, oldest). Defaults to the configured order
    #[arg(short, long)]
    sort: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BOARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Only print posts tagged with this hashtag
    #[arg(long)]
    tag: Option<String>,

    /// Base directory for config and logs. Defaults to ~/.board
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::load(&paths)?,
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(sort) = cli.sort.as_deref() {
        config.default_sort = SortOrder::parse_lossy(sort);
    }
    config.validate()?;

    let log_file = init_logging(&config.log_level, Some(paths.log_file()), false)?;
    info!(log_file = %log_file.display(), "board-demo starting");

    let app = BoardApp::start(config).await?;
    run_script(&app).await?;

    let page = match cli.tag.as_deref() {
        Some(tag) => app.render_filtered(tag).await?,
        None => app.render(),
    };
    println!("{}", page.to_html());

    app.shutdown().await;
    Ok(())
}

/// Two users post, like, comment and edit.
async fn run_script(app: &BoardApp) -> anyhow::Result<()> {
    app.auth
        .register("alice@example.com", "alice-secret")
        .await?;
    let first = app
        .mutations
        .create_post("Hello board! #Intro #rust", None)
        .await?;
    app.mutations
        .create_post("Second thoughts on #rust ownership", None)
        .await?;
    app.auth.logout().await?;

    app.auth.register("bob@example.com", "bob-secret").await?;
    app.mutations.toggle_like(&first).await?;
    app.mutations.add_comment(&first, "Welcome, Alice!").await?;
    app.auth.logout().await?;

    app.auth.login("alice@example.com", "alice-secret").await?;
    app.mutations
        .edit_post(&first, "Hello board! (edited) #Intro #rust")
        .await?;

    let state = app
        .wait_for_feed(SETTLE, |state| {
            state
                .view
                .get(&first)
                .is_some_and(|post| post.is_edited() && !post.comments.is_empty())
        })
        .await?;
    if state.view.len() != 2 {
        bail!("expected 2 posts, found {}", state.view.len());
    }
    info!(posts = state.view.len(), renders = state.renders, "Script finished");
    Ok(())
}
