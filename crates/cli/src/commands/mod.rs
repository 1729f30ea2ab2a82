mod resolve;
mod send;

use std::time::Instant;

use igdm::{BotConfig, SqliteDirectory};
use serde::Serialize;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

/// Loads the configuration, runs the subcommand and prints its envelope.
///
/// Errors are returned unprinted; the caller owns failure output.
pub async fn dispatch(cli: Cli, started: Instant) -> Result<()> {
	let format = cli.format;
	let config = config::load(cli.config.as_deref(), &cli.overrides.to_overrides())?;

	match cli.command {
		Commands::Send(args) => {
			let report = send::execute(args, &config).await?;
			emit("send", report, format, started);
		}
		Commands::Resolve(args) => {
			let resolved = resolve::execute(args, &config).await?;
			emit("resolve", resolved, format, started);
		}
	}
	Ok(())
}

fn open_directory(config: &BotConfig) -> Result<SqliteDirectory> {
	let url = config.database_url.clone().unwrap_or_else(config::default_database_url);
	debug!(target = "igdm", url = %url, "opening thread directory");
	Ok(SqliteDirectory::open_url(&url).map_err(igdm::BotError::from)?)
}

fn emit<T: Serialize>(command: &str, data: T, format: OutputFormat, started: Instant) {
	let result = ResultBuilder::new(command).started_at(started).data(data).build();
	print_result(&result, format);
}
