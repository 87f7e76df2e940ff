use crate::error::DumperError;
use crate::pattern::Pattern;
use nix::unistd::Pid;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Last line the fixture prints before it blocks on stdin.
const READY_PREFIX: &str = "Press Enter";

/// A `target_program` we spawned and are holding at its stdin read.
pub struct LaunchedTarget {
    child: Child,
    stdout: BufReader<ChildStdout>,
    pattern: Option<Pattern>,
}

impl LaunchedTarget {
    /// Spawns the fixture and echoes its output until it is parked on stdin.
    pub fn spawn(path: &Path) -> Result<Self, DumperError> {
        let launch_err = |source| DumperError::Launch {
            path: path.display().to_string(),
            source,
        };
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(launch_err)?;
        let stdout = child.stdout.take().map(BufReader::new);
        let mut target = match stdout {
            Some(stdout) => Self { child, stdout, pattern: None },
            None => {
                let _ = child.kill();
                return Err(DumperError::TargetOutput);
            }
        };

        let mut line = String::new();
        loop {
            line.clear();
            if target.stdout.read_line(&mut line)? == 0 {
                let _ = target.child.wait();
                return Err(DumperError::TargetOutput);
            }
            print!("{}", line);
            if let Some(pattern) = Pattern::from_target_line(&line) {
                target.pattern = Some(pattern);
            }
            if line.starts_with(READY_PREFIX) {
                break;
            }
        }
        Ok(target)
    }

    pub fn pid(&self) -> Pid {
        Pid::from_raw(self.child.id() as i32)
    }

    pub fn pattern(&self) -> Option<Pattern> {
        self.pattern
    }

    /// Sends the newline the fixture is waiting for and reaps it.
    pub fn release(mut self) -> Result<i32, DumperError> {
        if let Some(mut stdin) = self.child.stdin.take() {
            stdin.write_all(b"\n")?;
        }
        let mut rest = String::new();
        self.stdout.read_to_string(&mut rest)?;
        print!("{}", rest);
        let status = self.child.wait()?;
        Ok(status.code().unwrap_or(-1))
    }
}

impl Drop for LaunchedTarget {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
