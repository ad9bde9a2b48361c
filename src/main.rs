use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use ccctv::player::SimulatedSurface;
use ccctv::{
    App, Config, FileStore, FixtureSource, ItemSource, MediaApi, MemoryStore, Result,
    SharedStore, parse_key_script,
};

#[derive(Parser)]
#[command(name = "ccctv")]
#[command(about = "Remote-control navigation core for a media.ccc.de TV client")]
#[command(version)]
struct Cli {
    /// Serve content from a JSON fixture instead of the live API
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a key script through the app and print what is on screen
    Replay {
        /// File with one key per line (names like ArrowDown or numeric codes)
        script: PathBuf,

        /// Persist preferences and watchlist in this file
        #[arg(long)]
        store: Option<PathBuf>,

        /// Milliseconds without completions before the next key is sent
        #[arg(long, default_value = "600")]
        settle_ms: u64,

        /// Length of the simulated media in seconds
        #[arg(long, default_value = "3600")]
        media_length: f64,
    },

    /// List a page of recent conferences
    Recent {
        /// Number of conferences to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Search lectures by title
    Search {
        query: Vec<String>,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match Config::load() {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let source = open_source(cli.fixture.as_deref(), &config)?;

    match cli.command {
        Commands::Replay {
            script,
            store,
            settle_ms,
            media_length,
        } => {
            let store: SharedStore = match store {
                Some(path) => Arc::new(FileStore::open(path)?),
                None => MemoryStore::shared(),
            };
            let surface = Box::new(SimulatedSurface::new(Some(media_length)));
            cmd_replay(
                &script,
                App::new(config, store, source, surface),
                Duration::from_millis(settle_ms),
            )
            .await
        }
        Commands::Recent { offset } => cmd_recent(source.as_ref(), offset).await,
        Commands::Search { query } => cmd_search(source.as_ref(), &query.join(" ")).await,
        Commands::Config { save } => cmd_config(&config, save),
    }
}

fn open_source(fixture: Option<&Path>, config: &Config) -> Result<Arc<dyn ItemSource>> {
    Ok(match fixture {
        Some(path) => Arc::new(FixtureSource::load(path)?),
        None => Arc::new(MediaApi::new(&config.api)),
    })
}

async fn cmd_replay(script: &Path, mut app: App, settle: Duration) -> Result<()> {
    let keys = parse_key_script(&std::fs::read_to_string(script)?)?;

    app.start();
    app.run_until_idle(settle).await;
    println!("start -> {}", app.snapshot());

    for event in &keys {
        let label = event
            .key
            .clone()
            .or_else(|| event.code.map(|c| c.to_string()))
            .unwrap_or_default();
        let routed = app.handle_key(event);
        app.run_until_idle(settle).await;
        match routed {
            Some(routed) => println!("{label} [{:?}] -> {}", routed.result, app.snapshot()),
            None => println!("{label} (ignored) -> {}", app.snapshot()),
        }
        if let Some(notice) = app.notice() {
            println!("  ! {notice}");
        }
    }
    Ok(())
}

async fn cmd_recent(source: &dyn ItemSource, offset: usize) -> Result<()> {
    for row in source.fetch_page(offset).await? {
        println!("{} ({}): {} lectures", row.title, row.id, row.lectures().len());
        for lecture in row.lectures() {
            println!("  {} [{} views]", lecture.title, lecture.view_count.unwrap_or(0));
        }
    }
    Ok(())
}

async fn cmd_search(source: &dyn ItemSource, query: &str) -> Result<()> {
    let results = source.search(query).await?;
    if results.is_empty() {
        println!("No results for '{query}'");
    }
    for lecture in results {
        match &lecture.conference_title {
            Some(conference) => println!("{} ({conference})", lecture.title),
            None => println!("{}", lecture.title),
        }
    }
    Ok(())
}

fn cmd_config(config: &Config, save: bool) -> Result<()> {
    print!("{}", serde_yaml_ng::to_string(config)?);
    if save {
        config.save()?;
        println!("# saved to {}", Config::config_path().display());
    }
    Ok(())
}
