//! chromedriver discovery and process lifecycle.
//!
//! Most deployments run chromedriver as a separate service and point the
//! client at it. When asked to, [`ChromeDriver::launch`] spawns a private
//! instance instead and tears it down with the rest of the session.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::client::WebDriverClient;
use crate::error::{Error, Result};

/// How long a freshly spawned driver gets to answer `GET /status`.
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Locates the chromedriver executable.
///
/// Search order:
/// 1. `explicit` (configured path)
/// 2. `CHROMEDRIVER_PATH` environment variable
/// 3. `chromedriver` on `PATH`
///
/// # Errors
///
/// Returns [`Error::DriverNotFound`] if no candidate exists.
pub fn find_chromedriver(explicit: Option<&Path>) -> Result<PathBuf> {
	find_chromedriver_with(explicit, std::env::var_os("CHROMEDRIVER_PATH"), || {
		which::which("chromedriver").ok()
	})
}

fn find_chromedriver_with<F>(explicit: Option<&Path>, env_path: Option<OsString>, on_path: F) -> Result<PathBuf>
where
	F: FnOnce() -> Option<PathBuf>,
{
	if let Some(path) = explicit {
		if path.is_file() {
			return Ok(path.to_path_buf());
		}
		warn!(target = "igdm", path = %path.display(), "configured chromedriver path does not exist; searching elsewhere");
	}

	if let Some(path) = env_path.map(PathBuf::from) {
		if path.is_file() {
			return Ok(path);
		}
		warn!(target = "igdm", path = %path.display(), "CHROMEDRIVER_PATH does not point at a file");
	}

	on_path().ok_or(Error::DriverNotFound)
}

/// A chromedriver process owned by this program.
///
/// The child is spawned with `kill_on_drop`, so dropping the handle without
/// calling [`ChromeDriver::shutdown`] still terminates it.
#[derive(Debug)]
pub struct ChromeDriver {
	process: Child,
	endpoint: String,
}

impl ChromeDriver {
	/// Spawns `executable --port=<port>` and waits until it reports ready.
	///
	/// # Errors
	///
	/// Returns [`Error::LaunchFailed`] if the process cannot be spawned or
	/// exits immediately, and [`Error::ConnectionFailed`] if it never becomes
	/// ready.
	pub async fn launch(executable: &Path, port: u16) -> Result<Self> {
		let mut child = Command::new(executable)
			.arg(format!("--port={port}"))
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::inherit())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("failed to spawn {}: {e}", executable.display())))?;

		tokio::time::sleep(Duration::from_millis(100)).await;

		match child.try_wait() {
			Ok(Some(status)) => {
				return Err(Error::LaunchFailed(format!(
					"chromedriver exited immediately with status: {status}"
				)));
			}
			Ok(None) => {}
			Err(e) => {
				return Err(Error::LaunchFailed(format!("failed to check process status: {e}")));
			}
		}

		let endpoint = format!("http://127.0.0.1:{port}");
		let driver = Self { process: child, endpoint };

		WebDriverClient::new(&driver.endpoint)?
			.wait_until_ready(READY_TIMEOUT)
			.await?;

		debug!(target = "igdm", executable = %executable.display(), port, "chromedriver ready");
		Ok(driver)
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Kills the process and reaps it.
	pub async fn shutdown(mut self) -> Result<()> {
		self.process
			.kill()
			.await
			.map_err(|e| Error::LaunchFailed(format!("failed to kill chromedriver: {e}")))?;
		let _ = self.process.wait().await;
		Ok(())
	}
}
