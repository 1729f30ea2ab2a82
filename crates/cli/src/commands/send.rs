use std::fs;

use igdm::{BotConfig, DispatchReport, DispatchRequest};

use super::open_directory;
use crate::cli::SendArgs;
use crate::error::{CliError, Result};

pub async fn execute(args: SendArgs, config: &BotConfig) -> Result<DispatchReport> {
	let request = build_request(args)?;
	let directory = open_directory(config)?;
	Ok(igdm::send(config, &directory, &request).await?)
}

/// The request from `--request`, or from the inline flags.
fn build_request(args: SendArgs) -> Result<DispatchRequest> {
	match args.request {
		Some(path) => {
			let contents = fs::read_to_string(&path).map_err(|source| CliError::Read { path, source })?;
			Ok(serde_json::from_str(&contents)?)
		}
		None => Ok(DispatchRequest::new(args.recipients, args.messages).with_attachments(args.attachments)),
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use tempfile::TempDir;

	use super::*;

	fn inline(recipients: &[&str], messages: &[&str]) -> SendArgs {
		SendArgs {
			recipients: recipients.iter().map(|s| s.to_string()).collect(),
			messages: messages.iter().map(|s| s.to_string()).collect(),
			attachments: vec![PathBuf::from("photo.jpg")],
			request: None,
		}
	}

	#[test]
	fn inline_flags_become_a_request() {
		let request = build_request(inline(&["@alice", "42"], &["hi"])).unwrap();
		assert_eq!(request.recipients, vec!["@alice", "42"]);
		assert_eq!(request.messages, vec!["hi"]);
		assert_eq!(request.attachments, vec![PathBuf::from("photo.jpg")]);
	}

	#[test]
	fn request_file_is_parsed() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("batch.json");
		fs::write(
			&path,
			r#"{ "recipients": ["bob"], "messages": ["one", "two"], "attachments": ["/tmp/a.pdf"] }"#,
		)
		.unwrap();

		let args = SendArgs {
			recipients: vec![],
			messages: vec![],
			attachments: vec![],
			request: Some(path),
		};
		let request = build_request(args).unwrap();

		assert_eq!(request.recipients, vec!["bob"]);
		assert_eq!(request.messages.len(), 2);
		assert_eq!(request.attachments, vec![PathBuf::from("/tmp/a.pdf")]);
	}

	#[test]
	fn malformed_request_file_is_a_json_error() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("batch.json");
		fs::write(&path, r#"{ "recipients": "bob" }"#).unwrap();

		let args = SendArgs {
			recipients: vec![],
			messages: vec![],
			attachments: vec![],
			request: Some(path),
		};
		assert!(matches!(build_request(args), Err(CliError::Json(_))));
	}

	#[tokio::test]
	async fn empty_request_fails_validation_before_any_io() {
		let config = BotConfig {
			database_url: Some("sqlite::memory:".into()),
			..BotConfig::default()
		};
		let err = execute(inline(&[], &["hi"]), &config).await.unwrap_err();

		assert!(matches!(err, CliError::Bot(igdm::BotError::Validation(_))));
		assert_eq!(err.exit_code(), 1);
	}
}
