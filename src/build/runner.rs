//! Blocking execution of external tools with a timeout

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::BuildError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a tool to completion, killing it once the timeout expires
#[derive(Debug, Clone)]
pub struct ToolRunner {
    timeout: Duration,
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

impl ToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `program` with `args` and waits for it.
    ///
    /// A non-zero exit is not an error here; callers inspect
    /// [`ToolOutput::success`].
    pub fn run<I, S>(&self, program: &str, args: I, cwd: Option<&Path>) -> Result<ToolOutput, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        debug!("Running {:?}", command);
        let mut child = command.spawn().map_err(|e| BuildError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(BuildError::Timeout {
                            program: program.to_string(),
                            timeout: self.timeout,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(BuildError::io(Path::new(program), e)),
            }
        };

        let output = ToolOutput {
            code: status.code(),
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        };
        debug!("{} finished with {:?}", program, output.code);
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_output_streams() {
        let runner = ToolRunner::new(Duration::from_secs(10));
        let output = runner
            .run("sh", ["-c", "echo out; echo err >&2"], None)
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn reports_exit_code() {
        let runner = ToolRunner::new(Duration::from_secs(10));
        let output = runner.run("sh", ["-c", "exit 3"], None).unwrap();

        assert!(!output.success());
        assert_eq!(output.code, Some(3));
    }

    #[test]
    fn kills_on_timeout() {
        let runner = ToolRunner::new(Duration::from_millis(200));
        let started = Instant::now();
        let result = runner.run("sleep", ["5"], None);

        assert!(matches!(result, Err(BuildError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let runner = ToolRunner::new(Duration::from_secs(1));
        let result = runner.run("crossdocs-no-such-tool", Vec::<&str>::new(), None);
        assert!(matches!(result, Err(BuildError::Spawn { .. })));
    }

    #[test]
    fn runs_in_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = ToolRunner::new(Duration::from_secs(10));
        let output = runner.run("pwd", Vec::<&str>::new(), Some(dir.path())).unwrap();

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
