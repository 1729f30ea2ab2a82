use std::time::Instant;

use clap::Parser;
use igdm_cli::{
	cli::Cli,
	commands,
	error::CliError,
	logging,
	output::{self, OutputFormat, ResultBuilder},
};

#[tokio::main]
async fn main() {
	let started = Instant::now();
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli, started).await {
		handle_error(&err, command, format, started);
		std::process::exit(err.exit_code());
	}
}

fn handle_error(err: &CliError, command: &str, format: OutputFormat, started: Instant) {
	let cmd_error = err.to_command_error();

	// Humans read stderr; the envelope on stdout is for scripts.
	output::print_error_stderr(&cmd_error);

	if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new(command)
			.started_at(started)
			.error(cmd_error)
			.build();
		output::print_result(&result, format);
	}
}
