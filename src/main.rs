use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use modsweep::cleaner::{
    CleanerError, Config, ConsoleReporter, DefaultSelection, Event, Pipeline, Reporter, Selector,
};
use modsweep::ui::Picker;

/// Find dependency directories in a project tree and reclaim their space.
#[derive(Parser, Debug)]
#[command(name = "modsweep", version, about)]
struct Cli {
    /// Directory to search (defaults to the current directory)
    path: Option<PathBuf>,

    /// Invert selection (by default, all found directories are selected for deletion)
    #[arg(long)]
    invert: bool,

    /// Skip the interactive picker and remove the default selection
    #[arg(short, long)]
    yes: bool,

    /// Show what would be removed without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum concurrent removals
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Manifest inspection workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Print every discovered and measured directory
    #[arg(short, long)]
    verbose: bool,
}

/// Console reporter that keeps a spinner alive until discovery is summarised.
struct SpinnerReporter {
    console: ConsoleReporter,
    spinner: ProgressBar,
    found: AtomicUsize,
}

impl SpinnerReporter {
    fn new(console: ConsoleReporter) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            console,
            spinner,
            found: AtomicUsize::new(0),
        }
    }
}

impl Reporter for SpinnerReporter {
    fn report(&self, event: Event) {
        match &event {
            Event::Discovered { .. } => {
                let found = self.found.fetch_add(1, Ordering::Relaxed) + 1;
                self.spinner.set_message(format!("{} found", found));
            }
            Event::Summary { .. } => self.spinner.finish_and_clear(),
            _ => {}
        }
        self.spinner.suspend(|| self.console.report(event));
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    if cli.invert {
        config.invert_selection = true;
    }
    if let Some(n) = cli.concurrency {
        config.delete_concurrency = n;
    }
    if let Some(n) = cli.workers {
        config.scan_workers = n;
    }
    config.validate()?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{}", format!("Version: {}\n", env!("CARGO_PKG_VERSION")).magenta());

    let config = Arc::new(load_config(&cli).context("loading configuration")?);
    let root = Pipeline::resolve_root(cli.path.as_deref())?;

    println!(
        "{}",
        format!("Searching for {} directories in {}...", config.marker_name, root.display()).cyan()
    );
    println!(
        "{}",
        "This may take a while depending on the size of the tree.\n".cyan()
    );

    let reporter = Arc::new(SpinnerReporter::new(ConsoleReporter::new(cli.verbose)));
    let pipeline = Pipeline::new(Arc::clone(&config), reporter).with_dry_run(cli.dry_run);

    let mut selector: Box<dyn Selector> = if cli.yes {
        Box::new(DefaultSelection)
    } else {
        Box::new(Picker::new(format!(
            "Select {} directories to remove",
            config.marker_name
        )))
    };

    match pipeline.run(&root, selector.as_mut()).await {
        Ok(_) => Ok(()),
        Err(e @ CleanerError::Selection { .. }) => {
            eprintln!("{}", e.to_string().red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
