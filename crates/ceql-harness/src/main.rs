use anyhow::{Context, Result};
use ceql_harness::{build_compiler, load_samples, RunnerConfig, SampleRunner};
use ceql_query::CaseMode;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = cli.level().to_string().to_lowercase();
    let env_filter = format!("ceql_query={},ceql_harness={}", level, level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    let mut compiler = build_compiler(cli.binding.as_deref(), cli.within.as_deref())
        .context("Failed to set up compiler")?;

    match cli.command {
        Commands::Compile {
            case_sensitive,
            ignore_case,
            json,
            query,
        } => {
            let mode = if case_sensitive {
                CaseMode::Sensitive
            } else if ignore_case {
                CaseMode::Insensitive
            } else {
                CaseMode::Default
            };

            let result = compiler.compile_with(&query, mode);
            if json {
                let value = match &result {
                    Ok(cqp) => serde_json::json!({ "query": query, "cqp": cqp }),
                    Err(diagnostics) => {
                        serde_json::json!({ "query": query, "diagnostics": diagnostics })
                    }
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            }

            match result {
                Ok(cqp) => {
                    if !json {
                        println!("{}", cqp);
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(diagnostics) => {
                    if !json {
                        for diagnostic in &diagnostics {
                            eprintln!("{}", diagnostic);
                        }
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Check {
            samples,
            max_consecutive_failures,
            json,
            no_progress,
        } => {
            let samples = load_samples(&samples)
                .with_context(|| format!("Failed to read samples from {}", samples.display()))?;

            let mut runner = SampleRunner::new(
                compiler,
                RunnerConfig {
                    max_consecutive_failures,
                    show_progress: !no_progress && !json,
                },
            );
            let summary = runner.run(&samples);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }

            Ok(if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
