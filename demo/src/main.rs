//! Symptom Triage Core: demo CLI
//!
//! Runs the bundled scenarios, analyzes ad-hoc conversations, and checks
//! knowledge base files before they are deployed.
//!
//! Usage:
//!   cargo run -p triage-demo -- scenarios
//!   cargo run -p triage-demo -- scenarios cardiac
//!   cargo run -p triage-demo -- analyze "fever and a bad cough" "no runny nose"
//!   cargo run -p triage-demo -- analyze --tags "fever:severe,-cough" "tachycardia"
//!   cargo run -p triage-demo -- check-kb crates/triage-reference/knowledge/reference.toml

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use triage_contracts::{
    analysis::{RawInput, SymptomTag},
    config::AnalysisConfig,
    session::SessionState,
    symptom::Severity,
};
use triage_core::traits::KnowledgeBase;
use triage_kb::{load, IndexedKnowledgeBase, KnowledgeSource};
use triage_normalize::Lexicon;
use triage_reference::{
    build_analyzer, reference_knowledge_base, reference_lexicon,
    scenarios::{cardiac, correction, flu_vs_cold, sepsis},
};
use triage_session::summarize;

type CliResult<T> = Result<T, Box<dyn Error>>;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Symptom triage core demo.
///
/// Normalizes free-text symptom descriptions, ranks candidate conditions,
/// and escalates red-flag combinations. Output is informational only.
#[derive(Parser)]
#[command(
    name = "triage",
    about = "Symptom triage core demo",
    long_about = "Runs symptom triage scenarios and ad-hoc analyses showing normalization,\n\
                  multi-turn accumulation, candidate ranking, and red-flag escalation."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or all bundled scenarios.
    Scenarios {
        #[arg(value_enum, default_value_t = Scenario::All)]
        scenario: Scenario,
    },
    /// Analyze a conversation, one argument per turn, printing a JSON report per turn.
    Analyze {
        /// Knowledge base file (.toml or .json). Defaults to the bundled reference base.
        #[arg(long)]
        kb: Option<PathBuf>,
        /// Analysis config TOML. Unset keys keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Lexicon TOML. Defaults to the bundled reference lexicon.
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Read each turn as comma-separated tags: `code`, `code:severity`, `-code` (denied).
        #[arg(long)]
        tags: bool,
        /// Print the consultation summary after the last turn.
        #[arg(long)]
        summary: bool,
        #[arg(required = true)]
        turns: Vec<String>,
    },
    /// Load and validate a knowledge base file, then list its contents.
    CheckKb { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scenario {
    All,
    FluVsCold,
    Cardiac,
    Correction,
    Sepsis,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Scenarios { scenario } => {
            print_banner();
            run_scenarios(scenario).map(|()| {
                println!("All selected scenarios completed successfully.");
            })
        }
        Command::Analyze {
            kb,
            config,
            lexicon,
            tags,
            summary,
            turns,
        } => analyze(kb, config, lexicon, tags, summary, &turns),
        Command::CheckKb { file } => check_kb(file),
    };

    if let Err(e) = result {
        eprintln!("triage error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn run_scenarios(scenario: Scenario) -> CliResult<()> {
    match scenario {
        Scenario::All => {
            flu_vs_cold::run_scenario()?;
            cardiac::run_scenario()?;
            correction::run_scenario()?;
            sepsis::run_scenario()?;
        }
        Scenario::FluVsCold => flu_vs_cold::run_scenario()?,
        Scenario::Cardiac => cardiac::run_scenario()?,
        Scenario::Correction => correction::run_scenario()?,
        Scenario::Sepsis => sepsis::run_scenario()?,
    }
    Ok(())
}

// ── Analyze ───────────────────────────────────────────────────────────────────

fn analyze(
    kb_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    lexicon_path: Option<PathBuf>,
    tags: bool,
    summary: bool,
    turns: &[String],
) -> CliResult<()> {
    let kb = match kb_path {
        Some(path) => load(&KnowledgeSource::File(path))?,
        None => reference_knowledge_base()?,
    };
    let config = match config_path {
        Some(path) => AnalysisConfig::from_file(&path)?,
        None => AnalysisConfig::default(),
    };
    let lexicon = match lexicon_path {
        Some(path) => Lexicon::from_file(&path)?,
        None => reference_lexicon()?,
    };
    let analyzer = build_analyzer(&config, lexicon);

    let mut session = SessionState::new();
    info!(session_id = %session.session_id, turns = turns.len(), "analyzing conversation");

    for turn in turns {
        let input = if tags {
            RawInput::Tags(parse_tags(turn)?)
        } else {
            RawInput::text(turn.as_str())
        };
        let report = analyzer.analyze_turn(session, &input, &kb)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        session = report.session;
    }

    if summary {
        println!("{}", serde_json::to_string_pretty(&summarize(&session))?);
    }
    Ok(())
}

/// Parse "fever:severe, -cough, headache" into tags.
fn parse_tags(turn: &str) -> CliResult<Vec<SymptomTag>> {
    turn.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_tag)
        .collect()
}

fn parse_tag(item: &str) -> CliResult<SymptomTag> {
    if let Some(code) = item.strip_prefix('-') {
        return Ok(SymptomTag::new(code.trim()).excluded());
    }
    match item.split_once(':') {
        None => Ok(SymptomTag::new(item)),
        Some((code, severity)) => {
            let severity = match severity.trim().to_lowercase().as_str() {
                "mild" => Severity::Mild,
                "moderate" => Severity::Moderate,
                "severe" => Severity::Severe,
                other => {
                    return Err(format!(
                        "unknown severity '{}' in tag '{}' (expected mild, moderate, or severe)",
                        other, item
                    )
                    .into())
                }
            };
            Ok(SymptomTag::new(code.trim()).with_severity(severity))
        }
    }
}

// ── Check KB ──────────────────────────────────────────────────────────────────

fn check_kb(file: PathBuf) -> CliResult<()> {
    let display = file.display().to_string();
    let kb: IndexedKnowledgeBase = load(&KnowledgeSource::File(file))?;

    println!("Knowledge base OK: {}", display);
    println!(
        "  {} symptom(s), {} condition(s)",
        kb.symptom_count(),
        kb.condition_count()
    );
    println!();
    for profile in kb.profiles() {
        println!(
            "  {:<26}{} symptom(s), {} red flag(s), guidelines: {}",
            profile.condition.as_str(),
            profile.symptom_weights.len(),
            profile.red_flags.len(),
            if profile.guidelines.is_empty() {
                "-".to_string()
            } else {
                profile.guidelines.join(", ")
            }
        );
        for flag in &profile.red_flags {
            println!(
                "  {:<26}  red flag: {} (min {})",
                "",
                flag.describe(),
                flag.min_severity
            );
        }
    }
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Symptom Triage Core");
    println!("Reference Scenarios");
    println!("===================");
    println!();
    println!("Pipeline per turn:");
    println!("  [1] Normalizer maps text or tags to symptom observations");
    println!("  [2] Accumulator merges them into the session (latest statement wins)");
    println!("  [3] Scorer ranks conditions by weighted symptom overlap");
    println!("  [4] Safety gate checks red flags on every turn, whatever the scores");
    println!("  [5] Framing picks emergency, clinician, or informational output");
    println!();
    println!("Output is informational only and never a diagnosis.");
    println!();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
