use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use promodoro::cli::args::{Cli, Commands, FocusCommands};
use promodoro::cli::commands;
use promodoro::config::{Config, Paths};
use promodoro::storage::Database;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.command);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Commands that take over the terminal stay silent unless `RUST_LOG` asks otherwise.
fn init_logging(command: &Commands) {
    let draws_terminal = match command {
        Commands::Tui => true,
        Commands::Focus(args) => matches!(args.command, None | Some(FocusCommands::Popup { .. })),
        _ => false,
    };
    let default_filter = if draws_terminal { "off" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Config(args) => commands::config(&paths, &config, args.command, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
        command => {
            let db = Database::open_with_paths(&paths).with_context(|| {
                format!("could not open database at {}", paths.database.display())
            })?;

            match command {
                Commands::Task(args) => commands::task(&db, &config, args.command, format)?,
                Commands::Focus(args) => commands::focus(&db, &config, args, format)?,
                Commands::Report(args) => commands::report(&db, &args, format)?,
                Commands::Tui => {
                    let outcome = promodoro::tui::run(&db, &config)?;
                    log::debug!("Dashboard logged {} sessions", outcome.logged.len());
                    outcome
                        .handoff
                        .map(|params| {
                            format!(
                                "Timer handed off. Continue it with:\n  promodoro focus popup '{}'",
                                params.to_query()
                            )
                        })
                        .unwrap_or_default()
                }
                Commands::Config(_) | Commands::Completions { .. } => String::new(),
            }
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
