//! Folio CLI
//!
//! Replay a portfolio page fixture through the reveal engine and inspect
//! the selector table.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod report;

use folio_app::{Site, SiteConfig};
use folio_core::PageFixture;
use report::Timeline;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless portfolio page runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Site configuration (site.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page, scroll through it and report what was revealed
    Simulate {
        /// Page fixture (JSON)
        page: PathBuf,

        /// Scroll target; defaults to the bottom of the page
        #[arg(long)]
        to: Option<f32>,

        /// Pixels per scroll step
        #[arg(long, default_value = "200")]
        step: f32,

        /// Milliseconds between scroll steps
        #[arg(long, default_value = "100")]
        interval: f64,

        /// Click the element with this id once the page has loaded
        #[arg(long)]
        click: Vec<String>,

        /// Submit the contact form after scrolling
        #[arg(long)]
        submit: bool,
    },

    /// Print the effective selector table
    Table {
        /// Count each template's matches in this page fixture
        #[arg(long)]
        page: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            page,
            to,
            step,
            interval,
            click,
            submit,
        } => cmd_simulate(&page, config, to, step, interval, &click, submit),

        Commands::Table { page } => cmd_table(&config, page.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => {
            info!("Using configuration {}", path.display());
            SiteConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))
        }
        None => Ok(SiteConfig::default()),
    }
}

fn cmd_simulate(
    page: &Path,
    config: SiteConfig,
    to: Option<f32>,
    step: f32,
    interval: f64,
    clicks: &[String],
    submit: bool,
) -> Result<()> {
    if step <= 0.0 {
        anyhow::bail!("Scroll step must be positive, got {}", step);
    }
    if interval < 0.0 {
        anyhow::bail!("Interval must not be negative, got {}", interval);
    }

    let fixture = PageFixture::load(page)
        .with_context(|| format!("Failed to load page fixture {}", page.display()))?;
    let settle_ms = config.reveal.sweep_delay_ms + f64::from(config.reveal.sweep_duration_ms);
    let mut site = Site::builder(fixture.to_document())
        .page_path(fixture.path.clone())
        .config(config)
        .build()?;
    info!("Simulating {} ({})", page.display(), site.page_path());

    let mut timeline = Timeline::new();
    timeline.record(site.now(), site.on_dom_ready());
    timeline.record(site.now(), site.on_load());
    let events = site.advance(site.config().reveal.ready_delay_ms);
    timeline.record(site.now(), events);

    for id in clicks {
        let Some(target) = site.document().by_id(id) else {
            warn!("No element with id '{}' to click", id);
            continue;
        };
        let events = site.click(target)?;
        timeline.record(site.now(), events);
        let events = site.advance(interval);
        timeline.record(site.now(), events);
    }

    let viewport = site.document().viewport().height;
    let bottom = (site.document().scroll_height() - viewport).max(0.0);
    let target = to.unwrap_or(bottom).clamp(0.0, bottom);
    let mut y = site.document().viewport().scroll_y;
    while y < target {
        y = (y + step).min(target);
        let events = site.scroll_to(y);
        timeline.record(site.now(), events);
        let events = site.advance(interval);
        timeline.record(site.now(), events);
    }

    if submit {
        match pollster::block_on(site.submit()) {
            Some(outcome) => info!("Contact form: {:?}", outcome),
            None => warn!("Page has no contact form"),
        }
    }

    let events = site.advance(settle_ms);
    timeline.record(site.now(), events);

    timeline.print();
    report::print_visibility(&site);

    let hidden = report::still_hidden(&site)?;
    if hidden > 0 {
        warn!("{} animatable element(s) are still hidden", hidden);
    }
    Ok(())
}

fn cmd_table(config: &SiteConfig, page: Option<&Path>) -> Result<()> {
    let document = match page {
        Some(path) => Some(
            PageFixture::load(path)
                .with_context(|| format!("Failed to load page fixture {}", path.display()))?
                .to_document(),
        ),
        None => None,
    };
    report::print_table(&config.reveal.table(), document.as_ref())
}
