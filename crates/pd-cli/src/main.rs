//! PD - command-line companion for the prompt-driven canvas
//!
//! Usage:
//!   pd validate response.txt            Decode and print sanitized events
//!   pd convert response.txt --apply     Convert, apply to a blank canvas
//!   pd describe prompt.json             Canvas summary sent to the model
//!   pd messages prompt.json             Full chat messages for a prompt
//!   pd replay prompt.json response.txt  Stream changes with pacing
//!
//! Any file argument may be `-` to read stdin.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs to stderr so stdout stays pipeable JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { file } => {
            println!("{}", commands::validate(&commands::read_input(&file)?)?);
        }
        Commands::Convert {
            file,
            apply,
            pretty,
        } => {
            let raw = commands::read_input(&file)?;
            println!("{}", commands::convert(&raw, apply, pretty)?);
        }
        Commands::Describe { prompt } => {
            print!("{}", commands::describe(&commands::read_input(&prompt)?)?);
        }
        Commands::Messages { prompt } => {
            println!(
                "{}",
                commands::messages(&commands::read_input(&prompt)?, &config)?
            );
        }
        Commands::Replay { prompt, response } => {
            let prompt = commands::read_input(&prompt)?;
            let response = commands::read_input(&response)?;
            let mut stdout = std::io::stdout().lock();
            let count = commands::replay(&prompt, response, config, &mut stdout).await?;
            log::info!("{count} change(s) streamed");
        }
    }

    Ok(())
}
