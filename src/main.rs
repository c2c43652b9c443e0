// src/main.rs

use std::path::{Path, PathBuf};

use aeo_audit::{
    commands::AnalysisSession,
    config::AppConfig,
    domain::models::{AnalysisState, FaqItem, Report},
    lifecycle,
    service::{report_assembler::faq_json_ld, FaqGenerator, HttpFaqGenerator, PageFetcher},
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "aeo-audit")]
#[command(about = "Answer Engine Optimization readiness audit for a single web page")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Path to config TOML. If omitted, uses ./aeo-audit.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit a page and print the report as JSON.
    Analyze {
        #[command(flatten)]
        source: Source,

        /// Base URL for link classification when auditing a file.
        #[arg(long, requires = "file")]
        base_url: Option<String>,

        /// Proxy template for fetching (overrides fetch.proxy_template).
        #[arg(long)]
        proxy: Option<String>,

        /// Also ask the configured FAQ service for answered FAQs.
        #[arg(long)]
        generate_faqs: bool,

        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print only the FAQPage JSON-LD suggested from a saved page's headings.
    FaqJsonld {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = "")]
        base_url: String,
    },
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// Fetch and audit this URL.
    #[arg(long)]
    url: Option<String>,

    /// Audit a saved HTML file instead of fetching.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    report: &'a Report,
    generated_faqs: Vec<FaqItem>,
    #[serde(rename = "generatedFaqJsonLD")]
    generated_faq_json_ld: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        tracing::error!("{:#}", err);
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::resolve(args.config.as_deref())?.apply_env();
    lifecycle::init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));

    match args.cmd {
        Command::Analyze {
            source,
            base_url,
            proxy,
            generate_faqs,
            compact,
        } => {
            let options = AnalyzeOptions {
                base_url,
                proxy,
                generate_faqs,
                compact,
            };
            analyze(&config, source, options).await
        }
        Command::FaqJsonld { file, base_url } => {
            let html = read_html(&file)?;
            let report = aeo_audit::analyze(&html, &base_url);
            println!("{}", report.faq_json_ld);
            Ok(())
        }
    }
}

struct AnalyzeOptions {
    base_url: Option<String>,
    proxy: Option<String>,
    generate_faqs: bool,
    compact: bool,
}

async fn analyze(config: &AppConfig, source: Source, options: AnalyzeOptions) -> Result<()> {
    let mut session = AnalysisSession::new();

    match (&source.url, &source.file) {
        (Some(url), _) => {
            let mut fetcher = PageFetcher::new(&config.fetch)?;
            if let Some(proxy) = options.proxy {
                fetcher = fetcher.with_proxy(proxy);
            }
            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });
            session.analyze_url(&fetcher, url, &cancel).await;
        }
        (None, Some(file)) => {
            let html = read_html(file)?;
            session.analyze_html(&html, options.base_url.as_deref().unwrap_or(""));
        }
        (None, None) => bail!("either --url or --file is required"),
    }

    let report: &Report = match session.state() {
        AnalysisState::Ready(report) => report,
        AnalysisState::Failed(err) => bail!("analysis failed: {}", err),
        _ => return Err(anyhow!("analysis did not complete")),
    };

    if !options.generate_faqs {
        return print_json(report, options.compact);
    }

    let generator = HttpFaqGenerator::from_config(&config.faq, &config.fetch)?;
    let generated_faqs = session
        .generate_faqs(generator.as_ref().map(|g| g as &dyn FaqGenerator))
        .await
        .map_err(|e| anyhow!("{}", e))?;
    let output = AnalyzeOutput {
        report,
        generated_faq_json_ld: faq_json_ld(&generated_faqs),
        generated_faqs,
    };
    print_json(&output, options.compact)
}

fn read_html(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}
