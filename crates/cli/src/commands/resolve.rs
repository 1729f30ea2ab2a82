use igdm::{BotConfig, ResolvedThread};

use super::open_directory;
use crate::cli::ResolveArgs;
use crate::error::Result;

pub async fn execute(args: ResolveArgs, config: &BotConfig) -> Result<Vec<ResolvedThread>> {
	let directory = open_directory(config)?;
	Ok(igdm::resolve_all(config, &directory, &args.recipients).await?)
}
