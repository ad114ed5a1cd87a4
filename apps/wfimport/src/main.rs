//! wfimport CLI binary entry point.
//! Resolves configuration, delegates to the importer, and maps results to
//! exit codes: 0 success, 1 failed run, 2 configuration error.

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;
use wfimport::cli::{Cli, Commands, ImportArgs};
use wfimport::config::{self, CliOverrides, Effective, OutputMode};
use wfimport::importer::{self, ImportSettings, Importer};
use wfimport::runtime::DockerCli;
use wfimport::{output, utils};

fn main() {
    let Cli {
        root,
        container,
        output,
        log_level,
        cmd,
    } = Cli::parse();
    init_tracing(&log_level);

    let base = CliOverrides {
        root,
        container,
        output,
        ..Default::default()
    };

    match cmd.unwrap_or_else(|| Commands::Import(ImportArgs::default())) {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Import(args) => {
            let eff = resolve(CliOverrides {
                dir: args.dir,
                classifier: args.classifier,
                max_errors: args.max_errors,
                copy_timeout: args.copy_timeout,
                import_timeout: args.import_timeout,
                ..base
            });
            let human = eff.output == OutputMode::Human;
            if human {
                output::print_banner();
                announce(&eff);
            }
            let importer = Importer::new(runtime_for(&eff), ImportSettings::from(&eff))
                .with_progress(human);
            let report = importer.run(&eff.dir);
            output::print_report(&report, eff.output, eff.max_errors);
            process::exit(if report.success() { 0 } else { 1 });
        }
        Commands::Validate { dir } => {
            let eff = resolve(CliOverrides { dir, ..base });
            match importer::validate_directory(&eff.dir, &eff.backup_suffix) {
                Ok(results) => {
                    output::print_validation(&results, eff.output);
                    if results.iter().any(|r| !r.result.valid) {
                        process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Check => {
            let eff = resolve(base);
            let importer = Importer::new(runtime_for(&eff), ImportSettings::from(&eff));
            if importer.check_environment() {
                println!("container '{}' is running", eff.container);
            } else {
                eprintln!(
                    "{} container '{}' is not running",
                    utils::error_prefix(),
                    eff.container
                );
                process::exit(1);
            }
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wfimport={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Resolve configuration or exit with status 2.
fn resolve(cli: CliOverrides) -> Effective {
    match config::resolve_effective(&cli) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            process::exit(2);
        }
    }
}

fn runtime_for(eff: &Effective) -> DockerCli {
    DockerCli::new(eff.runtime.clone(), eff.platform_cli.clone())
}

fn announce(eff: &Effective) {
    match eff.config_path.as_ref() {
        Some(p) => eprintln!(
            "{} using config {}",
            utils::info_prefix(),
            utils::rel_to_wd(p)
        ),
        None => eprintln!(
            "{} No wfimport.toml found; using defaults.",
            utils::note_prefix()
        ),
    }
    eprintln!(
        "{} importing from {} into container '{}'",
        utils::info_prefix(),
        utils::rel_to_wd(&eff.dir),
        eff.container
    );
}
