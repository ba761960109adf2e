use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use themescope::classifier::Classifier;
use themescope::config::Config;
use themescope::keywords::bukvarix::BukvarixSource;
use themescope::output::UNDETERMINED_MESSAGE;
use themescope::store::ThemeStore;
use themescope::text::stemmer::SnowballStemmer;

/// Themescope: determine the theme of a Russian text.
///
/// Themes are keyword dictionaries collected from a keyword search service
/// and stored in a JSON file. A text is assigned to the theme whose keywords
/// it mentions most.
#[derive(Parser)]
#[command(name = "themescope", version, about)]
struct Cli {
    /// Theme dictionary file (overrides THEMESCOPE_THEMES_FILE)
    #[arg(short = 't', long, global = true)]
    themes_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect keywords for a new theme and store it
    Add {
        /// Theme name (case-sensitive)
        theme: String,
    },

    /// Remove a stored theme
    Remove {
        /// Theme name (case-sensitive)
        theme: String,
    },

    /// List stored themes
    List,

    /// Classify the given text
    Text {
        /// The text to classify
        text: String,

        /// Also draw a per-theme bar chart
        #[arg(long)]
        chart: bool,
    },

    /// Classify the contents of a text file
    File {
        /// Input file (overrides THEMESCOPE_INPUT_FILE)
        #[arg(short = 'i', long)]
        input_file: Option<PathBuf>,

        /// Also draw a per-theme bar chart
        #[arg(long)]
        chart: bool,
    },

    /// Serve classification requests over TCP
    Serve {
        /// Listen address (overrides THEMESCOPE_LISTEN_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("themescope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(path) = cli.themes_file {
        config.themes_file = path;
    }
    info!(themes_file = %config.themes_file.display(), "Program started");

    let classifier = Arc::new(build_classifier(&config)?);

    match cli.command {
        Commands::Add { theme } => {
            println!("{}", classifier.add_theme(&theme).await);
        }

        Commands::Remove { theme } => {
            println!("{}", classifier.remove_theme(&theme).await);
        }

        Commands::List => {
            println!("{}", classifier.list_themes().await);
        }

        Commands::Text { text, chart } => {
            print_classification(&classifier, &text, chart).await;
        }

        Commands::File { input_file, chart } => {
            let path = input_file.unwrap_or_else(|| config.input_file.clone());
            let text = if chart {
                tokio::fs::read_to_string(&path).await.ok()
            } else {
                None
            };
            match text {
                Some(text) => print_classification(&classifier, &text, true).await,
                // classify_file reports a missing or unreadable file as a message
                None => println!("{}", classifier.classify_file(&path).await),
            }
        }

        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.listen_addr.clone());
            println!("{}", format!("Listening on {addr}").bold());
            themescope::server::serve(&addr, classifier).await?;
        }
    }

    info!("Program finished work");
    Ok(())
}

/// Open the theme store and wire up the one classifier for this process.
fn build_classifier(config: &Config) -> Result<Classifier> {
    let store = ThemeStore::load(&config.themes_file).with_context(|| {
        format!(
            "Cannot use themes file {}",
            config.themes_file.display()
        )
    })?;

    let source = BukvarixSource::new(&config.keyword_source_url, config.keyword_source_timeout)?;

    Ok(Classifier::new(
        store,
        Arc::new(SnowballStemmer::russian()),
        Arc::new(source),
        config.retry.clone(),
    ))
}

/// Print the classification message, optionally preceded by the bar chart.
async fn print_classification(classifier: &Classifier, text: &str, chart: bool) {
    if chart {
        if let Ok(result) = classifier.score_text(text).await {
            themescope::output::terminal::display_scores(&result);
        }
    }

    let message = classifier.classify(text).await;
    if message == UNDETERMINED_MESSAGE {
        println!("{}", message.yellow());
    } else {
        println!("{message}");
    }
}
