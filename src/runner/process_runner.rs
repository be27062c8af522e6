use crate::error::{DllDocError, Result};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_TOOL: &str = "dumpbin";
pub const EXPORTS_SWITCH: &str = "/EXPORTS";

const READ_CHUNK_SIZE: usize = 1024;
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Everything the inspection tool wrote to stdout and stderr, in pipe order.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub status: ExitStatus,
    pub bytes_read: usize,
}

/// Runs the inspection tool against one library and captures its output.
pub struct ToolRunner {
    program: String,
    timeout: Duration,
}

impl ToolRunner {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_TOOL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Quoted command line, as it would be typed into a shell.
    pub fn command_line(&self, library_path: &str) -> String {
        format!("\"{}\" {} \"{}\"", self.program, EXPORTS_SWITCH, library_path)
    }

    /// Launch the tool, drain the shared stdout/stderr pipe until end-of-stream,
    /// then wait for the child to exit.
    ///
    /// The child's exit status is reported but never treated as a failure:
    /// dumpbin signals most problems through its text output.
    pub fn run(&self, library_path: &str) -> Result<ToolOutput> {
        let (mut reader, writer) = io::pipe().map_err(|e| pipe_error("pipe creation failed", e))?;
        let error_writer = writer
            .try_clone()
            .map_err(|e| pipe_error("pipe handle duplication failed", e))?;

        let mut command = Command::new(&self.program);
        command
            .arg(EXPORTS_SWITCH)
            .arg(library_path)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(error_writer);

        log::debug!("Running {}", self.command_line(library_path));

        let child = command
            .spawn()
            .map_err(|e| self.handle_spawn_error(e, library_path))?;

        // The command still owns our copies of the write end; the pipe only
        // reports end-of-stream once every write handle is closed.
        drop(command);

        let mut guard = ChildGuard::new(child);
        let bytes = drain(&mut reader)?;
        drop(reader);

        let status = guard.wait_timeout(self.timeout)?;
        log::debug!(
            "{} exited with {} after writing {} bytes",
            self.program,
            status,
            bytes.len()
        );

        Ok(ToolOutput {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            status,
            bytes_read: bytes.len(),
        })
    }

    fn handle_spawn_error(&self, error: io::Error, library_path: &str) -> DllDocError {
        DllDocError::Launch {
            command: self.command_line(library_path),
            code: error.raw_os_error().unwrap_or(-1),
            source: error,
        }
    }
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn pipe_error(message: &str, source: io::Error) -> DllDocError {
    DllDocError::Resource {
        message: message.to_string(),
        source,
    }
}

fn capture_error(source: io::Error) -> DllDocError {
    DllDocError::Capture { source }
}

/// Read fixed-size chunks until a zero-byte read.
pub(crate) fn drain<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut buffer = [0u8; READ_CHUNK_SIZE];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => output.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(capture_error(e)),
        }
    }

    Ok(output)
}

/// Owns a spawned child; kills and reaps it on drop unless it was waited on.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Result<ExitStatus> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(status) = self.child.try_wait().map_err(capture_error)? {
                self.reaped = true;
                return Ok(status);
            }

            if Instant::now() >= deadline {
                log::warn!("Child process {} timed out, killing it", self.child.id());
                return Err(DllDocError::Timeout {
                    seconds: timeout.as_secs(),
                });
            }

            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
