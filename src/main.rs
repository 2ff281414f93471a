//! Mender - Heuristic Code Repair Pipeline
//!
//! Command-line front end over the analysis-and-repair pipeline: submit a
//! file for fixing, list supported languages, inspect learned patterns,
//! and roll up analytics insights.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use mender::analytics::{AnalyticsAggregator, StoreDataSource};
use mender::config::MenderConfig;
use mender::fix::{FixPreferences, FixStyle};
use mender::pipeline::{BugFixRequest, BugFixer};
use mender::{AnalyticsTask, MenderError};

#[derive(Parser)]
#[command(name = "mender")]
#[command(version = "0.1.0")]
#[command(about = "Heuristic code bug analysis and repair", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to mender.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a source file and apply the best candidate fix
    Fix {
        /// Path to the source file
        file: PathBuf,

        /// Language tag (javascript, typescript, python, java)
        #[arg(short, long)]
        language: String,

        /// The error message the code produced, if any
        #[arg(short, long)]
        error: Option<String>,

        /// Free-form context about the code's intent
        #[arg(long)]
        context: Option<String>,

        /// Team that owns the code, for the analytics rollups
        #[arg(long)]
        team: Option<String>,

        /// Fix style: conservative or aggressive
        #[arg(long, default_value = "conservative")]
        style: String,

        /// Annotate the fixed code with a comment
        #[arg(long)]
        include_comments: bool,

        /// Attach illustrative test case descriptions
        #[arg(long)]
        include_tests: bool,

        /// Print the reasoning trace for the applied fix
        #[arg(long)]
        explain: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// List supported languages
    Languages {
        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show learned fix patterns
    Patterns {
        /// Only patterns trusted for future generation
        #[arg(long)]
        optimized: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Roll up fix history into insights
    Insights {
        /// Keep rolling up on the configured interval until interrupted
        #[arg(long)]
        watch: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "mender=debug,info"
    } else {
        "mender=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let MenderError::UnsupportedLanguage { supported, .. } = &e {
            eprintln!("Supported languages: {}", supported.join(", "));
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), MenderError> {
    let config = MenderConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fix {
            file,
            language,
            error,
            context,
            team,
            style,
            include_comments,
            include_tests,
            explain,
            json,
        } => {
            let style = match style.to_lowercase().as_str() {
                "conservative" => FixStyle::Conservative,
                "aggressive" => FixStyle::Aggressive,
                other => {
                    return Err(MenderError::invalid_request(
                        "style",
                        format!("'{}' is not conservative or aggressive", other),
                    ));
                }
            };
            let code = std::fs::read_to_string(&file).map_err(|e| {
                MenderError::invalid_request("file", format!("{}: {}", file.display(), e))
            })?;

            let request = BugFixRequest {
                code,
                language,
                error,
                context,
                team,
                preferences: Some(FixPreferences {
                    style,
                    include_comments,
                    include_tests,
                }),
            };

            let fixer = BugFixer::new(&config);
            let response = fixer.fix(&request)?;
            let explanation = explain.then(|| fixer.explain(&request, &response)).flatten();

            if json {
                let mut output = serde_json::to_value(&response)?;
                if let Some(explanation) = &explanation {
                    output["explanation"] = serde_json::to_value(explanation)?;
                }
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_response(&response);
                if let Some(explanation) = &explanation {
                    print_explanation(explanation);
                }
            }
        }

        Commands::Languages { json } => {
            let languages = BugFixer::languages();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "languages": languages }))?
                );
            } else {
                println!("{}", "Supported languages:".bold());
                for language in languages {
                    println!("  {}", language);
                }
            }
        }

        Commands::Patterns { optimized, json } => {
            let fixer = BugFixer::new(&config);
            let mut patterns = if optimized {
                fixer.store().optimized_patterns()
            } else {
                fixer.store().patterns()
            };
            patterns.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
            } else if patterns.is_empty() {
                println!("No learned patterns yet.");
            } else {
                println!("{}", "Learned patterns:".bold());
                for pattern in patterns {
                    println!(
                        "  {} {} confidence {:.2}, success {:.0}%, used {}",
                        pattern.key.to_string().cyan(),
                        pattern.signature,
                        pattern.confidence,
                        pattern.success_rate * 100.0,
                        pattern.usage_count
                    );
                }
            }
        }

        Commands::Insights { watch, json } => {
            let fixer = BugFixer::new(&config);
            let source = StoreDataSource::new(Arc::clone(fixer.store()));
            let aggregator = Arc::new(AnalyticsAggregator::new(
                config.analytics.clone(),
                Box::new(source),
            ));

            if watch {
                let mut task = AnalyticsTask::new(Arc::clone(&aggregator));
                task.start();
                println!("Rolling up every {}s, Ctrl-C to stop.", config.analytics.interval_secs);
                let _ = tokio::signal::ctrl_c().await;
                task.stop().await;
            } else {
                aggregator.tick();
            }

            let insights = aggregator.insights();
            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else if insights.is_empty() {
                println!("No insights from the current fix history.");
            } else {
                println!("{}", "Insights:".bold());
                for insight in insights {
                    let marker = if insight.actionable {
                        "!".yellow().bold()
                    } else {
                        "-".normal()
                    };
                    println!("  {} {}: {}", marker, insight.title.bold(), insight.description);
                }
            }
        }
    }

    Ok(())
}

fn print_response(response: &mender::FixResponse) {
    let status = if response.success {
        "Fixed".green().bold()
    } else {
        "Not fixed".red().bold()
    };
    println!(
        "{} {} {} (severity {})",
        status,
        response.analysis.error_type.tag().cyan(),
        response.analysis.root_cause,
        response.analysis.severity
    );

    if let Some(applied) = response.applied_fixes.first() {
        println!(
            "{} {} (confidence {:.2})",
            "Applied:".bold(),
            applied.description,
            applied.confidence
        );
    }

    for warning in &response.warnings {
        println!("{} {}", "Warning:".yellow().bold(), warning);
    }
    for suggestion in &response.suggestions {
        println!("{} {}", "Suggestion:".bold(), suggestion);
    }

    if !response.analysis.security_issues.is_empty() {
        println!("{}", "Security findings:".red().bold());
        for issue in &response.analysis.security_issues {
            println!("  [{}] {}", issue.severity, issue.description);
        }
    }

    let quality = &response.analysis.code_quality;
    println!(
        "{} complexity {}, maintainability {}, readability {}, performance {}",
        "Quality:".bold(),
        quality.complexity,
        quality.maintainability,
        quality.readability,
        quality.performance
    );

    println!("\n{}", "Fixed code:".bold());
    println!("{}", response.fixed_code);
}

fn print_explanation(explanation: &mender::Explanation) {
    println!("\n{}", "Reasoning:".bold());
    for (index, step) in explanation.reasoning.iter().enumerate() {
        println!(
            "  {}. {} (confidence {:.2})",
            index + 1,
            step.title,
            step.confidence
        );
        for evidence in &step.evidence {
            println!("     - {}", evidence);
        }
    }

    println!("{}", "Alternatives considered:".bold());
    for alternative in &explanation.alternatives {
        println!(
            "  {:?}: {} (not chosen: {})",
            alternative.label, alternative.description, alternative.why_not_chosen
        );
    }

    println!("{} {}", "Performance:".bold(), explanation.performance_impact);
    println!("{} {}", "Security:".bold(), explanation.security_implications);
}
