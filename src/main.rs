use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use cms_fingerprint::cms::{CmsPlugin, CmsType, DrupalPlugin, create_default_plugins};
use cms_fingerprint::config::ScanConfig;
use cms_fingerprint::fingerprint::changelog::TracingWarner;
use cms_fingerprint::fingerprint::resolver::UnrecognizedPolicy;
use cms_fingerprint::fingerprint::transport::HttpVerb;
use cms_fingerprint::fingerprint::transports::ReqwestTransport;
use cms_fingerprint::fingerprint::types::Verdict;
use cms_fingerprint::logging::{self, LogOptions};
use cms_fingerprint::scan::{ScanReport, Scanner};

#[derive(Parser)]
#[command(name = "cms-fingerprint")]
#[command(version, about = "Identify the installed CMS version by hashing static assets")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fingerprint a target
    Scan {
        cms: CmsType,

        /// Base URL of the site, e.g. https://example.com/
        #[arg(short, long)]
        url: String,

        #[arg(long)]
        verb: Option<HttpVerb>,

        /// Corpus to use instead of the configured one
        #[arg(long)]
        versions_file: Option<PathBuf>,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Probe only the N most discriminating files
        #[arg(long)]
        max_files: Option<usize>,

        #[arg(long)]
        concurrency: Option<usize>,

        #[arg(long)]
        policy: Option<UnrecognizedPolicy>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Load and validate a corpus
    Validate {
        cms: CmsType,

        #[arg(long)]
        versions_file: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn resolve_plugin(
    cms: CmsType,
    versions_file: Option<PathBuf>,
    config: &ScanConfig,
) -> anyhow::Result<Arc<dyn CmsPlugin>> {
    if let Some(path) = versions_file {
        return Ok(match cms {
            CmsType::Drupal => Arc::new(DrupalPlugin::new(path)),
        });
    }

    create_default_plugins(&config.corpus_dir())
        .remove(&cms)
        .with_context(|| format!("No plugin registered for {}", cms))
}

fn print_report(report: &ScanReport, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{} ({})", report.url, report.cms);
    match report.outcome.verdict() {
        Verdict::NoEvidence => println!("  version: unknown, no known file was served"),
        Verdict::Unhashed => {
            println!("  version: unknown, files were served without content to hash")
        }
        Verdict::NoMatch => println!("  version: no known version matches every file"),
        Verdict::Exact(version) => println!("  version: {}", version),
        Verdict::Ambiguous(versions) => {
            println!("  version: one of {}", versions.join(", "))
        }
    }
    for file in &report.outcome.unrecognized_files {
        println!("  unrecognized: {}", file);
    }
    if report.changelog_exposed {
        println!("  changelog: exposed");
    }
    Ok(())
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scan {
            cms,
            url,
            verb,
            versions_file,
            config,
            max_files,
            concurrency,
            policy,
            format,
        } => {
            let mut config = ScanConfig::load_or_default(config.as_deref())?;
            if let Some(max_files) = max_files {
                config.resolver.max_files = Some(max_files);
            }
            if let Some(concurrency) = concurrency {
                config.resolver.concurrency = concurrency;
            }
            if let Some(policy) = policy {
                config.resolver.unrecognized_policy = policy;
            }
            let verb = verb.unwrap_or(config.http.verb);

            let plugin = resolve_plugin(cms, versions_file, &config)?;
            let corpus = Arc::new(plugin.load_corpus()?);
            let transport = Arc::new(ReqwestTransport::new(&config.http)?);

            let scanner = Scanner::new(
                plugin,
                corpus,
                transport,
                Arc::new(TracingWarner),
                &config.resolver,
            );
            let report = scanner
                .scan(&url, verb)
                .await
                .with_context(|| format!("Scan of {} aborted", url))?;

            print_report(&report, format)
        }
        Command::Validate {
            cms,
            versions_file,
            config,
        } => {
            let config = ScanConfig::load_or_default(config.as_deref())?;
            let plugin = resolve_plugin(cms, versions_file, &config)?;
            let corpus = plugin
                .load_corpus()
                .with_context(|| format!("Invalid corpus {:?}", plugin.versions_file()))?;

            println!(
                "{:?}: {} files, {} versions, highest {}",
                plugin.versions_file(),
                corpus.file_count(),
                corpus.versions().len(),
                corpus.highest_version().unwrap_or_default()
            );
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogOptions {
        file: cli.log_file.as_deref(),
        json: cli.log_json,
        filter: None,
    })?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}
