//! Running the package-manager command.
//!
//! The child gets the user's terminal for stdin and stdout so password
//! prompts and progress bars behave normally. Stderr is piped through a
//! forwarding thread that echoes it live and hands chunks back for the error
//! report. There is no timeout on the install itself: installs can take
//! minutes and the session waits for them. Once the child exits, leftover
//! stderr is collected for at most [`STDERR_GRACE`], since a daemon spawned
//! by the package manager may keep the pipe open indefinitely.

use serde::Serialize;
use std::io::{self, Read, Write};
use std::process::{ChildStderr, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::channel::ReleaseChannel;
use super::command::{build_update_command, UpdateCommand};
use super::install::{InstallMethod, BINARY_NAME};
use super::version::{extract_version, VERSION};

/// Shown instead of running anything for source checkouts.
pub const LOCAL_DEV_MESSAGE: &str = "milaidy is running from a local development checkout; \
update it with `git pull` and rebuild instead.";

/// How long to keep reading stderr after the package manager has exited.
pub const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Outcome of an update attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Whether the package manager exited with status 0.
    pub success: bool,
    /// Install method the command was chosen for.
    pub method: InstallMethod,
    /// The command line that was run.
    pub command: String,
    /// Version before the update.
    pub previous_version: String,
    /// Version reported after the update, when it could be read.
    pub new_version: Option<String>,
    /// Failure description; always `None` on success.
    pub error: Option<String>,
}

/// Spawns update commands and verifies the installed version afterwards.
#[derive(Debug, Clone)]
pub struct UpdateExecutor {
    verify_command: Option<UpdateCommand>,
    elevated: bool,
}

impl Default for UpdateExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateExecutor {
    /// Executor that verifies with `milaidy --version`.
    pub fn new() -> Self {
        Self {
            verify_command: Some(UpdateCommand::new(BINARY_NAME, &["--version"])),
            elevated: false,
        }
    }

    /// Use a different command to read the installed version.
    pub fn with_verify_command(mut self, command: UpdateCommand) -> Self {
        self.verify_command = Some(command);
        self
    }

    /// Skip post-update verification.
    pub fn without_verification(mut self) -> Self {
        self.verify_command = None;
        self
    }

    /// Already running as root: drop `sudo` from commands.
    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Run `command` for an installation made with `method`.
    pub fn run(
        &self,
        method: InstallMethod,
        command: UpdateCommand,
        previous_version: &str,
    ) -> UpdateResult {
        let command = if self.elevated {
            command.without_sudo()
        } else {
            command
        };
        let command_line = command.to_string();
        tracing::info!("Running update command: {}", command_line);

        let failure = |error: String| UpdateResult {
            success: false,
            method,
            command: command_line.clone(),
            previous_version: previous_version.to_string(),
            new_version: None,
            error: Some(error),
        };

        let mut child = match Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return failure(format!("Failed to run {}: {}", command.program, e)),
        };

        let chunks = child.stderr.take().map(|stderr| {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || forward_stderr(stderr, tx));
            rx
        });

        let status = child.wait();
        let captured = chunks
            .map(|rx| drain_stderr(&rx, Instant::now() + STDERR_GRACE))
            .unwrap_or_default();

        let code = match status {
            Ok(status) => status.code().unwrap_or(1),
            Err(e) => return failure(format!("Failed to wait for {}: {}", command.program, e)),
        };

        if code != 0 {
            let stderr = String::from_utf8_lossy(&captured).trim().to_string();
            tracing::debug!("Update command exited with code {}", code);
            return failure(if stderr.is_empty() {
                format!("Update command exited with code {}", code)
            } else {
                stderr
            });
        }

        UpdateResult {
            success: true,
            method,
            command: command_line.clone(),
            previous_version: previous_version.to_string(),
            new_version: self.installed_version(),
            error: None,
        }
    }

    /// Ask the freshly installed binary for its version. Best effort.
    pub fn installed_version(&self) -> Option<String> {
        let verify = self.verify_command.as_ref()?;
        let output = Command::new(&verify.program)
            .args(&verify.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| tracing::debug!("Version check failed to start: {}", e))
            .ok()?;

        let version = extract_version(&String::from_utf8_lossy(&output.stdout))
            .or_else(|| extract_version(&String::from_utf8_lossy(&output.stderr)));
        if version.is_none() {
            tracing::debug!("No version found in `{}` output", verify);
        }
        version
    }
}

/// Echo the child's stderr as it arrives and send each chunk to the runner.
fn forward_stderr(mut stderr: ChildStderr, tx: Sender<Vec<u8>>) {
    let mut buf = [0u8; 4096];
    let mut out = io::stderr();

    loop {
        match stderr.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let _ = out.write_all(&buf[..n]);
                let _ = out.flush();
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}

/// Collect forwarded chunks until the pipe closes or `deadline` passes.
///
/// The forwarding thread is left detached when the deadline wins.
fn drain_stderr(rx: &Receiver<Vec<u8>>, deadline: Instant) -> Vec<u8> {
    let mut captured = Vec::new();

    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(chunk) => captured.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("Stopped waiting for stderr from a lingering process");
                break;
            }
        }
    }

    captured
}

/// Build and run the upgrade for a detected install method.
///
/// Local development checkouts are refused without running anything.
pub fn perform_update(
    method: InstallMethod,
    channel: ReleaseChannel,
    executor: &UpdateExecutor,
) -> UpdateResult {
    match build_update_command(method, channel) {
        Some(command) => executor.run(method, command, VERSION),
        None => UpdateResult {
            success: false,
            method,
            command: String::new(),
            previous_version: VERSION.to_string(),
            new_version: None,
            error: Some(LOCAL_DEV_MESSAGE.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> UpdateCommand {
        UpdateCommand::new("sh", &["-c", script])
    }

    fn executor() -> UpdateExecutor {
        UpdateExecutor::new().with_verify_command(sh("echo milaidy 9.8.7"))
    }

    #[cfg(unix)]
    #[test]
    fn success_reads_new_version() {
        let result = executor().run(InstallMethod::NpmGlobal, sh("exit 0"), "2.0.0");

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.new_version.as_deref(), Some("9.8.7"));
        assert_eq!(result.previous_version, "2.0.0");
        assert_eq!(result.method, InstallMethod::NpmGlobal);
        assert_eq!(result.command, "sh -c \"exit 0\"");
    }

    #[cfg(unix)]
    #[test]
    fn failure_reports_captured_stderr() {
        let result = executor().run(
            InstallMethod::NpmGlobal,
            sh("echo 'EACCES: permission denied' >&2; exit 243"),
            "2.0.0",
        );

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("EACCES: permission denied"));
        assert!(result.new_version.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn failure_without_stderr_reports_exit_code() {
        let result = executor().run(InstallMethod::Homebrew, sh("exit 4"), "2.0.0");

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Update command exited with code 4")
        );
    }

    #[cfg(unix)]
    #[test]
    fn killed_process_counts_as_code_one() {
        let result = executor().run(InstallMethod::Apt, sh("kill -9 $$"), "2.0.0");

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Update command exited with code 1")
        );
    }

    #[test]
    fn missing_executable_is_a_failure_not_a_panic() {
        let result = executor().run(
            InstallMethod::PnpmGlobal,
            UpdateCommand::new("milaidy-no-such-package-manager", &["add", "-g"]),
            "2.0.0",
        );

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("milaidy-no-such-package-manager"));
    }

    #[cfg(unix)]
    #[test]
    fn verification_failure_keeps_success() {
        let result = UpdateExecutor::new()
            .with_verify_command(UpdateCommand::new("milaidy-no-such-binary", &["--version"]))
            .run(InstallMethod::NpmGlobal, sh("true"), "2.0.0");

        assert!(result.success);
        assert!(result.error.is_none());
        assert!(result.new_version.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn verification_without_version_in_output() {
        let result = UpdateExecutor::new()
            .with_verify_command(sh("echo unknown build"))
            .run(InstallMethod::NpmGlobal, sh("true"), "2.0.0");

        assert!(result.success);
        assert!(result.new_version.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn without_verification_skips_version_check() {
        let result = UpdateExecutor::new()
            .without_verification()
            .run(InstallMethod::NpmGlobal, sh("true"), "2.0.0");

        assert!(result.success);
        assert!(result.new_version.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn elevated_executor_drops_sudo() {
        let result = executor()
            .with_elevated(true)
            .run(
                InstallMethod::Snap,
                UpdateCommand::new("sudo", &["sh", "-c", "exit 0"]),
                "2.0.0",
            );

        assert!(result.success);
        assert_eq!(result.command, "sh -c \"exit 0\"");
    }

    #[cfg(unix)]
    #[test]
    fn lingering_background_process_does_not_block() {
        let started = Instant::now();
        let result = UpdateExecutor::new()
            .without_verification()
            .run(InstallMethod::NpmGlobal, sh("sleep 4 & exit 0"), "2.0.0");

        assert!(result.success);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn stderr_written_just_before_exit_is_kept() {
        let result = executor().run(
            InstallMethod::Homebrew,
            sh("echo 'Error: No available formula' >&2; sleep 3 & exit 1"),
            "2.0.0",
        );

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Error: No available formula"));
    }

    #[test]
    fn drain_stops_when_sender_is_dropped() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"npm ERR! ".to_vec()).unwrap();
        tx.send(b"code E404".to_vec()).unwrap();
        drop(tx);

        let captured = drain_stderr(&rx, Instant::now() + Duration::from_secs(5));
        assert_eq!(captured, b"npm ERR! code E404");
    }

    #[test]
    fn drain_gives_up_at_deadline() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let started = Instant::now();

        let captured = drain_stderr(&rx, Instant::now() + Duration::from_millis(100));

        assert!(captured.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(tx);
    }

    #[test]
    fn local_dev_is_refused() {
        let result = perform_update(
            InstallMethod::LocalDev,
            ReleaseChannel::Stable,
            &UpdateExecutor::new(),
        );

        assert!(!result.success);
        assert!(result.command.is_empty());
        assert!(result.error.unwrap().contains("git pull"));
    }
}
