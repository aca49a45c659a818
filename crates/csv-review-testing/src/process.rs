//! Interactive process handling for sessions that stay open.
//!
//! Provides utilities for:
//! - Starting the CLI with a stdin that is never closed
//! - Reading its output up to a prompt
//! - Interrupting and reaping it

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// A running CLI process with piped stdio.
pub struct BackgroundProcess {
    child: Child,
}

impl BackgroundProcess {
    /// Spawn `command` with stdin, stdout and stderr piped.
    ///
    /// Stdin stays open for the life of the handle, so the review loop waits
    /// for input instead of seeing end of input.
    pub fn spawn_interactive(mut command: Command) -> io::Result<Self> {
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let child = command.spawn()?;
        Ok(Self { child })
    }

    /// Read stdout until the text read so far contains `marker`.
    ///
    /// Returns what was read, which may lack `marker` if stdout closed first.
    pub fn read_until(&mut self, marker: &str) -> io::Result<String> {
        let stdout = self
            .child
            .stdout
            .as_mut()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;

        let mut output = Vec::new();
        let mut buf = [0u8; 1024];
        while !String::from_utf8_lossy(&output).contains(marker) {
            let n = stdout.read(&mut buf)?;
            if n == 0 {
                break;
            }
            output.extend_from_slice(&buf[..n]);
        }

        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Read the rest of stdout until it closes.
    pub fn read_to_end(&mut self) -> io::Result<String> {
        let mut output = String::new();
        if let Some(stdout) = self.child.stdout.as_mut() {
            stdout.read_to_string(&mut output)?;
        }
        Ok(output)
    }

    /// Send SIGINT, as a terminal does on Ctrl+C.
    #[cfg(unix)]
    pub fn interrupt(&self) -> io::Result<()> {
        // SAFETY: kill(2) only signals the child pid
        let rc = unsafe { libc::kill(self.child.id() as libc::pid_t, libc::SIGINT) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Wait for the process to exit with a timeout.
    pub fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<ExitStatus>> {
        let start = Instant::now();
        loop {
            match self.child.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() > timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }
}

impl Drop for BackgroundProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
