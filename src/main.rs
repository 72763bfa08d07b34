//! amz-e2e - End-to-end search flow checks for Amazon storefronts
//!
//! Drives a live storefront through a WebDriver endpoint and reports on
//! search behavior: relevance, pricing, currency, page health, layout.

use amz_e2e::amazon::locales::Locale;
use amz_e2e::amazon::session::Device;
use amz_e2e::commands::FlowCommand;
use amz_e2e::config::{Config, Env, OutputFormat};
use amz_e2e::format::Formatter;
use amz_e2e::pages::SearchMode;
use amz_e2e::price;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-e2e",
    version,
    about = "End-to-end search flow checks for Amazon storefronts",
    long_about = "Drives a storefront search flow (home page, search, results, pagination) \
                  over WebDriver and verifies relevance, pricing, currency, and page health."
)]
struct Cli {
    /// Storefront locale
    #[arg(short, long, default_value = "us", global = true)]
    locale: Locale,

    /// Target environment
    #[arg(short, long, default_value = "production", global = true, env = "AMZ_E2E_ENV")]
    env: Env,

    /// Use the staging storefront URL
    #[arg(long, global = true)]
    staging: bool,

    /// WebDriver endpoint
    #[arg(short, long, global = true, env = "AMZ_E2E_WEBDRIVER")]
    webdriver: Option<String>,

    /// Device profile to emulate
    #[arg(short, long, default_value = "desktop", global = true)]
    device: Device,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search flow for a query
    #[command(alias = "r")]
    Run {
        /// Search query
        query: String,

        /// Submit via the search button or the Enter key
        #[arg(long, default_value = "button")]
        mode: SearchMode,

        /// Result pages to walk
        #[arg(long, default_value = "3")]
        pages: u32,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,
    },

    /// Parse and classify one raw price string
    Price {
        /// The raw price text, quoted
        text: String,
    },

    /// List supported locales
    Locales,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.locale = cli.locale;
    config.env = cli.env;
    config.device = cli.device;
    config.format = cli.format;

    if cli.staging {
        config.use_staging = Some(true);
    }
    if let Some(url) = cli.webdriver {
        config.webdriver_url = url;
    }

    match cli.command {
        Commands::Run { query, mode, pages, headless } => {
            config.max_pages = pages;
            config.headless = headless;

            let formatter = Formatter::new(config.format);
            let cmd = FlowCommand::new(config);
            let report = cmd.execute(&query, mode).await?;

            println!("{}", formatter.format_report(&report));

            if !report.healthy() {
                std::process::exit(1);
            }
        }

        Commands::Price { text } => {
            match price::classify(&text) {
                price::PriceText::Value(value) => println!("{:.2}", value),
                price::PriceText::Missing => println!("missing (no digits)"),
                price::PriceText::Malformed => println!("malformed (digits but unparseable)"),
            }
        }

        Commands::Locales => {
            println!("Supported storefront locales:\n");
            println!("{:<6} {:<16} {:<10} {:<8} {:<8}", "Code", "Domain", "Language", "Currency", "Symbol");
            println!("{:-<6} {:-<16} {:-<10} {:-<8} {:-<8}", "", "", "", "", "");

            for locale in Locale::all() {
                println!(
                    "{:<6} {:<16} {:<10} {:<8} {:<8}",
                    locale.to_string(),
                    locale.domain(),
                    locale.language(),
                    locale.currency(),
                    locale.currency_symbol()
                );
            }
        }
    }

    Ok(())
}
