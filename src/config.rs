use crate::error::DumperError;
use crate::pattern::Pattern;
use nix::unistd::Pid;
use std::path::PathBuf;

pub const DEFAULT_TARGET: &str = "./target_program";

#[derive(Debug, PartialEq, Eq)]
pub enum Target {
    Pid(Pid),
    Launch(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub target: Target,
    pub pattern: Option<Pattern>,
    pub dump_dir: Option<PathBuf>,
    pub verbose: bool,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {0} [--verbose] [--pattern \"<16 hex bytes>\"] [--dump-dir <dir>] <target_pid>\n\
         Or use: {0} [options] --launch-target [path]",
        program
    )
}

impl Options {
    /// Parses everything after the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, DumperError> {
        let mut args = args.into_iter().peekable();
        let mut target = None;
        let mut pattern = None;
        let mut dump_dir = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => verbose = true,
                "--pattern" => {
                    let value = args
                        .next()
                        .ok_or_else(|| DumperError::Usage("--pattern needs a value".into()))?;
                    pattern = Some(value.parse()?);
                }
                "--dump-dir" => {
                    let value = args
                        .next()
                        .ok_or_else(|| DumperError::Usage("--dump-dir needs a value".into()))?;
                    dump_dir = Some(PathBuf::from(value));
                }
                "--launch-target" => {
                    let path = args
                        .next_if(|next| !next.starts_with("--"))
                        .unwrap_or_else(|| DEFAULT_TARGET.to_string());
                    target = Some(Target::Launch(PathBuf::from(path)));
                }
                other if other.starts_with("--") => {
                    return Err(DumperError::Usage(format!("unknown option {}", other)));
                }
                other => {
                    let pid: i32 = other
                        .parse()
                        .map_err(|_| DumperError::Usage(format!("'{}' is not a pid", other)))?;
                    if pid <= 0 {
                        return Err(DumperError::Usage(format!("'{}' is not a pid", other)));
                    }
                    target = Some(Target::Pid(Pid::from_raw(pid)));
                }
            }
        }

        let target = target.ok_or_else(|| DumperError::Usage("no target given".into()))?;
        Ok(Self {
            target,
            pattern,
            dump_dir,
            verbose,
        })
    }
}
