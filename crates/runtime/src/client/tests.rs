use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use igdm_protocol::{ErrorCode, Locator};
use serde_json::{Value, json};

use super::*;

/// Serves `app` on an ephemeral port and returns its base URL.
async fn serve(app: Router) -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	format!("http://{addr}")
}

fn error_body(code: &str, message: &str) -> Json<Value> {
	Json(json!({ "value": { "error": code, "message": message, "stacktrace": "" } }))
}

fn fake_driver(navigations: Arc<Mutex<Vec<String>>>) -> Router {
	let nav_log = navigations.clone();
	Router::new()
		.route("/status", get(|| async { Json(json!({ "value": { "ready": true, "message": "ok" } })) }))
		.route(
			"/session",
			post(|Json(body): Json<Value>| async move {
				let binary = body["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["binary"].clone();
				Json(json!({ "value": { "sessionId": "s1", "capabilities": { "binary": binary } } }))
			}),
		)
		.route(
			"/session/{id}/url",
			post(move |Json(body): Json<Value>| {
				let nav_log = nav_log.clone();
				async move {
					nav_log.lock().unwrap().push(body["url"].as_str().unwrap_or_default().to_string());
					Json(json!({ "value": null }))
				}
			})
			.get(|| async { Json(json!({ "value": "https://www.instagram.com/direct/t/42/" })) }),
		)
		.route(
			"/session/{id}/element",
			post(|Json(body): Json<Value>| async move {
				if body["value"] == "//div[@role='textbox']" {
					(StatusCode::OK, Json(json!({ "value": { "element-6066-11e4-a6ae-4d4e5a5e4f5a": "e1" } })))
				} else {
					(StatusCode::NOT_FOUND, error_body("no such element", "Unable to locate element"))
				}
			}),
		)
		.route(
			"/session/{id}/element/{element}/click",
			post(|| async {
				(
					StatusCode::BAD_REQUEST,
					error_body("element click intercepted", "Other element would receive the click"),
				)
			}),
		)
		.route(
			"/session/{id}/element/{element}/displayed",
			get(|| async { Json(json!({ "value": true })) }),
		)
		.route("/session/{id}", delete(|| async { Json(json!({ "value": null })) }))
}

#[tokio::test]
async fn new_session_returns_session_id() {
	let base = serve(fake_driver(Arc::default())).await;
	let client = WebDriverClient::new(&base).unwrap();

	let request = NewSessionRequest::chrome(Some("/opt/chrome".into()), vec!["--incognito".into()]);
	let session = client.new_session(&request).await.unwrap();

	assert_eq!(session.id(), "s1");
}

#[tokio::test]
async fn navigate_and_read_url() {
	let navigations = Arc::new(Mutex::new(Vec::new()));
	let base = serve(fake_driver(navigations.clone())).await;
	let session = WebDriverClient::new(&base)
		.unwrap()
		.new_session(&NewSessionRequest::default())
		.await
		.unwrap();

	session.navigate("https://ig.me/m/someone").await.unwrap();
	assert_eq!(*navigations.lock().unwrap(), vec!["https://ig.me/m/someone".to_string()]);
	assert_eq!(session.current_url().await.unwrap(), "https://www.instagram.com/direct/t/42/");
}

#[tokio::test]
async fn missing_element_is_typed() {
	let base = serve(fake_driver(Arc::default())).await;
	let session = WebDriverClient::new(&base)
		.unwrap()
		.new_session(&NewSessionRequest::default())
		.await
		.unwrap();

	let found = session.find_element(&Locator::xpath("//div[@role='textbox']")).await.unwrap();
	assert_eq!(found.id, "e1");
	assert!(session.is_displayed(&found).await.unwrap());

	let err = session.find_element(&Locator::xpath("//input[@type='file']")).await.unwrap_err();
	assert!(err.is_no_such_element(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn intercepted_click_is_typed() {
	let base = serve(fake_driver(Arc::default())).await;
	let session = WebDriverClient::new(&base)
		.unwrap()
		.new_session(&NewSessionRequest::default())
		.await
		.unwrap();

	let element = session.find_element(&Locator::xpath("//div[@role='textbox']")).await.unwrap();
	let err = session.click(&element).await.unwrap_err();
	assert_eq!(err.code(), Some(ErrorCode::ElementClickIntercepted));
}

#[tokio::test]
async fn deleted_session_rejects_commands() {
	let base = serve(fake_driver(Arc::default())).await;
	let session = WebDriverClient::new(&base)
		.unwrap()
		.new_session(&NewSessionRequest::default())
		.await
		.unwrap();

	session.delete().await.unwrap();
	// Second delete is a no-op.
	session.delete().await.unwrap();

	let err = session.navigate("https://example.com").await.unwrap_err();
	assert!(matches!(err, Error::SessionClosed));
}

#[tokio::test]
async fn wait_until_ready_reads_status() {
	let base = serve(fake_driver(Arc::default())).await;
	let client = WebDriverClient::new(&base).unwrap();
	client.wait_until_ready(Duration::from_secs(2)).await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_reports_connection_failure() {
	// Bind then drop to get a port nothing listens on.
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let client = WebDriverClient::new(&format!("http://{addr}")).unwrap();
	let err = client.new_session(&NewSessionRequest::default()).await.unwrap_err();
	assert!(matches!(err, Error::ConnectionFailed { .. }), "unexpected error: {err:?}");
}

#[test]
fn endpoint_gets_trailing_slash() {
	let client = WebDriverClient::new("http://127.0.0.1:9515/wd/hub").unwrap();
	assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9515/wd/hub/");
}

#[test]
fn non_json_error_body_is_protocol_error() {
	let err = decode_error(502, "Bad Gateway");
	assert!(matches!(err, Error::ProtocolError(msg) if msg.contains("502")));
}
