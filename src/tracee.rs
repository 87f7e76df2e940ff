use nix::sys::ptrace;
use nix::sys::wait::waitpid;
use nix::unistd::Pid;
use nix::Result;

const WORD: usize = std::mem::size_of::<libc::c_long>();

/// Anything the scanner can pull bytes out of.
pub trait MemorySource {
    /// Reads `count` bytes at `addr`. Words that cannot be read come back as zeros.
    fn read_memory(&self, addr: u64, count: usize) -> Vec<u8>;
}

/// A process stopped under `PTRACE_ATTACH`. Detaches on drop.
pub struct Tracee {
    pid: Pid,
    attached: bool,
}

impl Tracee {
    pub fn attach(pid: Pid) -> Result<Self> {
        ptrace::attach(pid)?;
        let tracee = Self { pid, attached: true };
        waitpid(pid, None)?;
        Ok(tracee)
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn detach(mut self) -> Result<()> {
        self.attached = false;
        ptrace::detach(self.pid, None)
    }
}

impl MemorySource for Tracee {
    fn read_memory(&self, addr: u64, count: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(count);
        let mut read = 0;
        while read < count {
            let word = ptrace::read(self.pid, (addr as usize + read) as *mut _).unwrap_or(0);
            let to_copy = std::cmp::min(count - read, WORD);
            data.extend_from_slice(&word.to_ne_bytes()[..to_copy]);
            read += to_copy;
        }
        data
    }
}

impl Drop for Tracee {
    fn drop(&mut self) {
        if self.attached {
            let _ = ptrace::detach(self.pid, None);
        }
    }
}
