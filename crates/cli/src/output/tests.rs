use std::time::Duration;

use serde::Serialize;

use super::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved {
	thread_id: String,
}

fn bot_error(message: &str) -> CommandError {
	CommandError {
		code: ErrorCode::BotError,
		message: message.into(),
		details: None,
	}
}

#[test]
fn result_builder_success() {
	let result = ResultBuilder::new("resolve")
		.data(Resolved {
			thread_id: "101396794596347".into(),
		})
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "resolve");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error() {
	let result: CommandResult<Resolved> = ResultBuilder::new("send")
		.error(bot_error("login failed: missing credentials"))
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::BotError);
}

#[test]
fn builder_without_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("send").build();
	assert!(!result.ok);
}

#[test]
fn error_code_display_matches_serde() {
	for code in [ErrorCode::BotError, ErrorCode::ConfigError, ErrorCode::InternalError] {
		let serialized = serde_json::to_value(code).unwrap();
		assert_eq!(serialized, code.to_string());
	}
	assert_eq!(ErrorCode::ConfigError.to_string(), "CONFIG_ERROR");
}

#[test]
fn output_format_parse() {
	assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
	assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
	assert!("toml".parse::<OutputFormat>().is_err());
	assert_eq!(OutputFormat::default().to_string(), "json");
}

#[test]
fn success_envelope_shape() {
	let result = ResultBuilder::new("resolve")
		.data(vec![Resolved { thread_id: "7".into() }])
		.build();

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["ok"], true);
	assert_eq!(json["schemaVersion"], 1);
	assert_eq!(json["data"][0]["threadId"], "7");
	assert!(json.get("error").is_none());
	assert!(json["timings"]["durationMs"].is_u64());
}

#[test]
fn failure_envelope_shape() {
	let mut error = bot_error("invalid input: no recipients given");
	error.details = Some(serde_json::json!({ "kind": "validation" }));
	let result: CommandResult<()> = ResultBuilder::new("send").error(error).build();

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["ok"], false);
	assert_eq!(json["command"], "send");
	assert_eq!(json["error"]["code"], "BOT_ERROR");
	assert_eq!(json["error"]["details"]["kind"], "validation");
	assert!(json.get("data").is_none());
}

#[test]
fn timings_from_duration() {
	let timings = Timings::from(Duration::from_millis(1500));
	assert_eq!(timings.duration_ms, 1500);
}
