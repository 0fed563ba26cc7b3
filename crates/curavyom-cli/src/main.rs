//! CuraVyom command line.
//!
//! Usage:
//!   curavyom ask "Compare Metformin and Rapamycin"
//!   curavyom classify "What is the safety profile?"
//!   curavyom score --clinical-count 45 --patent-freedom high --market-cagr 12.5%
//!   curavyom compare candidates.json
//!   curavyom check "Trial NCT00000000 reported a fatal adverse event"
//!   curavyom catalog --shadowed
//!   curavyom consult doc "insulin sensitivity"
//!
//! Logs go to stderr, filtered by `CURAVYOM_LOG` (e.g.
//! `CURAVYOM_LOG=curavyom::audit=info`). `-v` raises the default level.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use curavyom_core::{
    assess_risk, verify, Candidate, CandidateComparator, EvidenceRecord, EvidenceScorer,
    PatentFreedom,
};
use curavyom_runtime::agents::{consult_one, specialist_for};
use curavyom_runtime::{
    DocumentRetriever, InMemoryRetriever, Orchestrator, ProviderRegistry, RuntimeConfig,
    SpecialistKind,
};

mod output;

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "CURAVYOM_LOG";

#[derive(Parser)]
#[command(name = "curavyom")]
#[command(version, about = "Drug repurposing query router", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Runtime config (YAML). Falls back to $CURAVYOM_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a query through the orchestrator
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show which intent a query resolves to
    Classify {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Score a piece of evidence
    Score {
        #[arg(long)]
        clinical_count: Option<u32>,

        /// high, medium or low
        #[arg(long)]
        patent_freedom: Option<String>,

        /// Percentage such as 12.5%
        #[arg(long)]
        market_cagr: Option<String>,
    },
    /// Rank candidates from a JSON array file
    Compare { file: PathBuf },
    /// Run the risk and fact checks over some text
    Check {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List the intent catalog in match order
    Catalog {
        /// Only list keywords an earlier rule always wins
        #[arg(long)]
        shadowed: bool,
    },
    /// Ask a single specialist
    Consult {
        /// clinical, patent, market, regulatory, doc or search
        specialist: String,

        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format;
    match cli.command {
        Commands::Ask { query } => ask(&query.join(" "), cli.config.as_deref(), format).await,
        Commands::Classify { query } => classify(&query.join(" "), cli.config.as_deref(), format),
        Commands::Score {
            clinical_count,
            patent_freedom,
            market_cagr,
        } => score(clinical_count, patent_freedom.as_deref(), market_cagr, format),
        Commands::Compare { file } => compare(&file, format),
        Commands::Check { text } => check(&text.join(" "), format),
        Commands::Catalog { shadowed } => catalog(shadowed, cli.config.as_deref(), format),
        Commands::Consult { specialist, query } => {
            consult(&specialist, &query.join(" "), cli.config.as_deref(), format).await
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::from_env().context("Failed to load config from environment")?,
    };
    tracing::debug!(?config, "Runtime config loaded");
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn ask(query: &str, config: Option<&Path>, format: Format) -> Result<()> {
    let orchestrator = Orchestrator::builder()
        .config(load_config(config)?)
        .build()
        .context("Failed to build orchestrator")?;

    let envelope = orchestrator.process(query).await;
    match format {
        Format::Json => print_json(&envelope),
        Format::Text => {
            println!("{}", output::envelope(&envelope));
            Ok(())
        }
    }
}

fn classify(query: &str, config: Option<&Path>, format: Format) -> Result<()> {
    let catalog = load_config(config)?.intent_catalog();
    let label = catalog.classify(query);
    let keyword = catalog.matched(query).map(|(_, kw)| kw.to_string());

    match format {
        Format::Json => print_json(&serde_json::json!({
            "query": query,
            "intent": label,
            "keyword": keyword,
        })),
        Format::Text => {
            match keyword {
                Some(kw) => println!("{} (matched \"{}\")", label, kw),
                None => println!("{} (no keyword matched)", label),
            }
            Ok(())
        }
    }
}

fn score(
    clinical_count: Option<u32>,
    patent_freedom: Option<&str>,
    market_cagr: Option<String>,
    format: Format,
) -> Result<()> {
    let patent_freedom = match patent_freedom {
        Some(raw) => Some(
            PatentFreedom::parse(raw)
                .with_context(|| format!("Unknown patent freedom {:?}; use high, medium or low", raw))?,
        ),
        None => None,
    };

    let evidence = EvidenceRecord {
        clinical_count,
        patent_freedom,
        market_cagr,
    };
    let result = EvidenceScorer::new().score(&evidence)?;

    match format {
        Format::Json => print_json(&result),
        Format::Text => {
            println!("{}", output::score(&result));
            Ok(())
        }
    }
}

fn compare(file: &Path, format: Format) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of candidates", file.display()))?;

    let result = CandidateComparator::new().compare(&candidates)?;

    match format {
        Format::Json => print_json(&result),
        Format::Text => {
            println!("{}", output::comparison(&result));
            Ok(())
        }
    }
}

fn check(text: &str, format: Format) -> Result<()> {
    let risk = assess_risk(text);
    let facts = verify(text);

    match format {
        Format::Json => print_json(&serde_json::json!({
            "risk_assessment": risk,
            "fact_check": facts,
        })),
        Format::Text => {
            println!("{}", output::check(&risk, &facts));
            Ok(())
        }
    }
}

fn catalog(shadowed_only: bool, config: Option<&Path>, format: Format) -> Result<()> {
    let catalog = load_config(config)?.intent_catalog();

    if shadowed_only {
        let shadowed = catalog.shadowed();
        return match format {
            Format::Json => print_json(&shadowed),
            Format::Text => {
                println!("{}", output::shadowed(&shadowed));
                Ok(())
            }
        };
    }

    match format {
        Format::Json => print_json(&catalog.rules()),
        Format::Text => {
            println!("{}", output::catalog(catalog.rules()));
            Ok(())
        }
    }
}

async fn consult(name: &str, query: &str, config: Option<&Path>, format: Format) -> Result<()> {
    let kind = SpecialistKind::parse(name).with_context(|| {
        let known: Vec<&str> = SpecialistKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("Unknown specialist {:?}; expected one of {}", name, known.join(", "))
    })?;

    let config = load_config(config)?;
    let provider = ProviderRegistry::with_defaults().create(&config.provider)?;
    let retriever: Arc<dyn DocumentRetriever> = Arc::new(InMemoryRetriever::default());
    let specialist = specialist_for(kind, &provider, &retriever);

    let report = consult_one(specialist.as_ref(), query, config.specialist_timeout).await?;

    match format {
        Format::Json => print_json(&report),
        Format::Text => {
            println!("**{}**\n\n{}", kind.display_name(), report.text);
            Ok(())
        }
    }
}
