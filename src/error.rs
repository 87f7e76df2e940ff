use crate::pattern::PatternError;
use nix::unistd::Pid;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumperError {
    #[error("{0}")]
    Usage(String),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] PatternError),
    #[error("failed to launch target {path}: {source}")]
    Launch { path: String, source: io::Error },
    #[error("target output did not contain its bytes")]
    TargetOutput,
    #[error("ptrace attach to {pid} failed: {source}")]
    Attach { pid: Pid, source: nix::Error },
    #[error("failed to read /proc/{pid}/maps: {source}")]
    Maps { pid: Pid, source: io::Error },
    #[error(transparent)]
    Ptrace(#[from] nix::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DumperError {
    pub fn is_usage(&self) -> bool {
        matches!(self, DumperError::Usage(_))
    }
}
