//! Access to the local Python interpreter.
//!
//! The runtime check and the dependency resolver both drive an interpreter as
//! a child process. Child output is drained on helper threads so a chatty
//! script cannot fill a pipe and stall the wait. Once the child is gone the
//! drains get a short grace period; a grandchild still holding the pipes open
//! does not hold up the caller.

pub mod parser;

use crate::config::PythonConfig;
use crate::core::{Error, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wait_timeout::ChildExt;

const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Captured result of one interpreter invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Exit code, `None` when killed by a signal or by the timeout
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// A Python interpreter on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonInterpreter {
    path: PathBuf,
}

impl PythonInterpreter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the configured interpreter, or search PATH for `python3` then `python`.
    pub fn locate(config: &PythonConfig) -> Option<Self> {
        if let Some(path) = &config.interpreter {
            return Some(Self::new(path));
        }
        which::which("python3")
            .or_else(|_| which::which("python"))
            .map(Self::new)
            .map_err(|e| log::debug!("No Python interpreter on PATH: {}", e))
            .ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the interpreter with `args`, optionally feeding `stdin`, and wait for it.
    ///
    /// With a timeout the child is killed once the deadline passes and the
    /// output is flagged `timed_out`.
    pub fn run(
        &self,
        args: &[&str],
        stdin: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<ScriptOutput> {
        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::dependency(format!("failed to start {}: {}", self.path.display(), e))
            })?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                let input = input.to_owned();
                // A script that never reads stdin closes the pipe; the write error is irrelevant.
                std::thread::spawn(move || {
                    let _ = pipe.write_all(input.as_bytes());
                });
            }
        }
        let stdout = Drain::spawn(child.stdout.take());
        let stderr = Drain::spawn(child.stderr.take());

        let (status, timed_out) = wait_with_deadline(&mut child, timeout)?;

        Ok(ScriptOutput {
            status,
            stdout: stdout.collect(),
            stderr: stderr.collect(),
            timed_out,
        })
    }
}

/// Output pipe read on a helper thread into a shared buffer.
struct Drain {
    buffer: Arc<Mutex<Vec<u8>>>,
    finished: Option<Receiver<()>>,
}

impl Drain {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let finished = pipe.map(|mut pipe| {
            let (done, finished) = mpsc::channel();
            let sink = Arc::clone(&buffer);
            std::thread::spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => match sink.lock() {
                            Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                            Err(_) => break,
                        },
                    }
                }
                let _ = done.send(());
            });
            finished
        });
        Self { buffer, finished }
    }

    /// Wait up to the grace period for end of output, then take what was read.
    fn collect(self) -> String {
        if let Some(finished) = &self.finished {
            if finished.recv_timeout(DRAIN_GRACE).is_err() {
                log::debug!("Child output still open after exit; keeping what was read");
            }
        }
        self.buffer
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Result<(Option<i32>, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait()?;
        return Ok((status.code(), false));
    };

    match child.wait_timeout(timeout)? {
        Some(status) => Ok((status.code(), false)),
        None => {
            // The child may exit between the deadline and the kill
            let _ = child.kill();
            let _ = child.wait();
            Ok((None, true))
        }
    }
}
