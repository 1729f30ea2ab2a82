use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parse_send_with_repeated_flags() {
	let args = vec![
		"igdm", "send", "--to", "@alice", "--to", "101396794596347", "-m", "hola", "-m", "adios", "--attach",
		"/tmp/a.png",
	];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::Send(args) => {
			assert_eq!(args.recipients, vec!["@alice", "101396794596347"]);
			assert_eq!(args.messages, vec!["hola", "adios"]);
			assert_eq!(args.attachments, vec![PathBuf::from("/tmp/a.png")]);
			assert!(args.request.is_none());
		}
		_ => panic!("Expected Send command"),
	}
}

#[test]
fn parse_send_with_multiple_values_per_flag() {
	let cli = Cli::try_parse_from(["igdm", "send", "--to", "a", "b", "--message", "x"]).unwrap();
	match cli.command {
		Commands::Send(args) => assert_eq!(args.recipients, vec!["a", "b"]),
		_ => panic!("Expected Send command"),
	}
}

#[test]
fn parse_send_from_request_file() {
	let cli = Cli::try_parse_from(["igdm", "send", "--request", "batch.json"]).unwrap();
	match cli.command {
		Commands::Send(args) => {
			assert_eq!(args.request, Some(PathBuf::from("batch.json")));
			assert!(args.recipients.is_empty());
		}
		_ => panic!("Expected Send command"),
	}
}

#[test]
fn request_file_conflicts_with_inline_flags() {
	let result = Cli::try_parse_from(["igdm", "send", "--request", "batch.json", "--to", "alice"]);
	assert!(result.is_err());
}

#[test]
fn send_requires_recipients_and_messages() {
	assert!(Cli::try_parse_from(["igdm", "send", "--to", "alice"]).is_err());
	assert!(Cli::try_parse_from(["igdm", "send", "-m", "hi"]).is_err());
}

#[test]
fn parse_resolve_command() {
	let cli = Cli::try_parse_from(["igdm", "resolve", "@Bob", "77"]).unwrap();
	assert_eq!(cli.command.name(), "resolve");
	match cli.command {
		Commands::Resolve(args) => assert_eq!(args.recipients, vec!["@Bob", "77"]),
		_ => panic!("Expected Resolve command"),
	}
}

#[test]
fn resolve_requires_a_recipient() {
	assert!(Cli::try_parse_from(["igdm", "resolve"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
	let cli = Cli::try_parse_from([
		"igdm", "resolve", "bob", "-vv", "-f", "text", "-c", "/etc/igdm.json", "--headless",
	])
	.unwrap();

	assert_eq!(cli.verbose, 2);
	assert_eq!(cli.format, OutputFormat::Text);
	assert_eq!(cli.config, Some(PathBuf::from("/etc/igdm.json")));
	assert!(cli.overrides.headless);
}

#[test]
fn format_defaults_to_json() {
	let cli = Cli::try_parse_from(["igdm", "resolve", "bob"]).unwrap();
	assert_eq!(cli.format, OutputFormat::Json);
	assert_eq!(cli.verbose, 0);
}

#[test]
fn chromedriver_path_implies_launch() {
	let cli = Cli::try_parse_from(["igdm", "--chromedriver", "/opt/chromedriver", "resolve", "bob"]).unwrap();
	let overrides = cli.overrides.to_overrides();
	assert!(overrides.launch_driver);
	assert_eq!(overrides.chromedriver_path, Some(PathBuf::from("/opt/chromedriver")));
}
