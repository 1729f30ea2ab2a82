#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::output::OutputFormat;

/// Cargo-like help colors.
fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(name = "igdm")]
#[command(about = "Send Instagram direct messages through a WebDriver-controlled browser")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default) or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	/// JSON config file (default: $XDG_CONFIG_HOME/igdm/config.json when present)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub overrides: OverrideArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Flags layered over the config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
	/// Account to log in with (password comes from IG_PASSWORD or the config file)
	#[arg(long, global = true, value_name = "NAME")]
	pub username: Option<String>,

	/// Thread directory location (sqlite://PATH, sqlite::memory:, or a path)
	#[arg(long, global = true, value_name = "URL")]
	pub database_url: Option<String>,

	/// WebDriver endpoint to connect to
	#[arg(long, global = true, value_name = "URL")]
	pub webdriver_url: Option<String>,

	/// Chrome binary the driver should start
	#[arg(long, global = true, value_name = "PATH")]
	pub chrome_binary: Option<String>,

	/// Spawn a private chromedriver instead of connecting to --webdriver-url
	#[arg(long, global = true)]
	pub launch_driver: bool,

	/// chromedriver executable, implies --launch-driver
	#[arg(long, global = true, value_name = "PATH")]
	pub chromedriver: Option<PathBuf>,

	/// Run Chrome without a window
	#[arg(long, global = true)]
	pub headless: bool,
}

impl OverrideArgs {
	pub fn to_overrides(&self) -> ConfigOverrides {
		ConfigOverrides {
			username: self.username.clone(),
			database_url: self.database_url.clone(),
			webdriver_url: self.webdriver_url.clone(),
			chrome_binary: self.chrome_binary.clone(),
			launch_driver: self.launch_driver || self.chromedriver.is_some(),
			chromedriver_path: self.chromedriver.clone(),
			headless: self.headless,
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Log in and deliver texts and attachments to each recipient in order.
	Send(SendArgs),
	/// Log in and resolve recipients to thread ids without sending anything.
	Resolve(ResolveArgs),
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Send(_) => "send",
			Commands::Resolve(_) => "resolve",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
	/// Recipient handle (@name or name) or numeric thread id. Repeatable.
	#[arg(long = "to", short = 't', value_name = "RECIPIENT", num_args = 1.., required_unless_present = "request")]
	pub recipients: Vec<String>,

	/// Text to send. Repeatable; sent in order.
	#[arg(long = "message", short = 'm', value_name = "TEXT", num_args = 1.., required_unless_present = "request")]
	pub messages: Vec<String>,

	/// Local file to upload after the texts. Repeatable.
	#[arg(long = "attach", short = 'a', value_name = "PATH", num_args = 1..)]
	pub attachments: Vec<PathBuf>,

	/// Read the whole request from a JSON file ({"recipients", "messages", "attachments"}).
	#[arg(long, value_name = "FILE", conflicts_with_all = ["recipients", "messages", "attachments"])]
	pub request: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
	/// Recipient handles or numeric thread ids.
	#[arg(value_name = "RECIPIENT", required = true)]
	pub recipients: Vec<String>,
}
