mod checks;
mod cli;
mod config;
mod domain;
mod error;
mod evaluate;
mod parse;
mod report;
mod types;

use crate::error::KubescoreError;
use crate::types::config::RunOverrides;
use crate::types::scorecard::Grade;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GRADE_FAILED: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("KUBESCORE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: cli::Cli) -> Result<i32, KubescoreError> {
    match cli.command {
        cli::Commands::Score(cmd) => {
            let cwd = std::env::current_dir()?;
            let mut loaded = config::load_config(&cwd, cmd.config.as_deref())?;

            let kubernetes_version = cmd
                .kubernetes_version
                .as_deref()
                .map(str::parse::<types::version::PlatformVersion>)
                .transpose()?;
            loaded.apply_overrides(RunOverrides {
                kubernetes_version,
                enabled_optional_tests: cmd.enable_optional_test,
                ignored_tests: cmd.ignore_test,
                exit_one_on_warning: cmd.exit_one_on_warning,
            });
            loaded.validate()?;

            let registry = checks::registry()?;
            let selection = loaded.selection();
            selection.validate(&registry)?;

            let sources = parse::sources::read_sources(&cmd.paths)?;
            let objects = parse::parse_sources(&sources)?;
            tracing::info!(
                objects = objects.len(),
                active_checks = selection.active(&registry).len(),
                "evaluating"
            );

            let scorecard = evaluate::evaluate(&objects, &registry, &selection, !cmd.sequential);

            let output_format = match cmd.format {
                Some(cli::ReportFormat::Human) => report::OutputFormat::Human,
                Some(cli::ReportFormat::Json) => report::OutputFormat::Json,
                Some(cli::ReportFormat::Sarif) => report::OutputFormat::Sarif,
                None => loaded.output.format.unwrap_or(report::OutputFormat::Human),
            };
            let rendered = report::render(&scorecard, &registry, output_format, cli.verbose > 0)?;
            println!("{rendered}");

            let has_critical = scorecard.has_grade(Grade::Critical);
            let has_warnings = scorecard.has_grade(Grade::Warning);

            if has_critical || (loaded.run.exit_one_on_warning && has_warnings) {
                Ok(exit_code::GRADE_FAILED)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::List => {
            let registry = checks::registry()?;
            for check in registry.all() {
                println!(
                    "{},{},{}",
                    check.id,
                    check.title,
                    if check.optional { "optional" } else { "default" }
                );
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
