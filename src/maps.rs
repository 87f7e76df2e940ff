use crate::error::DumperError;
use nix::unistd::Pid;
use std::fs;
use std::str::FromStr;

pub const MAX_REGIONS: usize = 1000;

/// One line of `/proc/<pid>/maps`. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: u64,
    pub end: u64,
    pub permissions: String,
    pub pathname: Option<String>,
}

impl MemoryRegion {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_readable(&self) -> bool {
        self.permissions.starts_with('r')
    }

    pub fn label(&self) -> &str {
        self.pathname.as_deref().unwrap_or("[anonymous]")
    }

    /// Heap, stack and anonymous mappings: where a process keeps its own data.
    pub fn is_dump_candidate(&self) -> bool {
        match &self.pathname {
            None => true,
            Some(p) => p.contains("heap") || p.contains("stack"),
        }
    }
}

impl FromStr for MemoryRegion {
    type Err = ();

    // 7f12a000-7f12b000 rw-p 00000000 00:00 0          [heap]
    fn from_str(line: &str) -> Result<Self, ()> {
        // range, perms, offset, dev, inode; the rest (spaces included) is the path.
        let mut fields = [""; 5];
        let mut rest = line;
        for field in fields.iter_mut() {
            rest = rest.trim_start();
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            *field = &rest[..end];
            rest = &rest[end..];
        }
        let [range, permissions, ..] = fields;

        let (start, end) = range.split_once('-').ok_or(())?;
        let start = u64::from_str_radix(start, 16).map_err(|_| ())?;
        let end = u64::from_str_radix(end, 16).map_err(|_| ())?;
        if end < start || permissions.len() < 4 {
            return Err(());
        }

        let rest = rest.trim();
        Ok(Self {
            start,
            end,
            permissions: permissions.to_string(),
            pathname: (!rest.is_empty()).then(|| rest.to_string()),
        })
    }
}

pub fn parse_maps(text: &str) -> Vec<MemoryRegion> {
    text.lines()
        .filter_map(|line| line.parse().ok())
        .take(MAX_REGIONS)
        .collect()
}

pub fn read_regions(pid: Pid) -> Result<Vec<MemoryRegion>, DumperError> {
    let text = fs::read_to_string(format!("/proc/{}/maps", pid))
        .map_err(|source| DumperError::Maps { pid, source })?;
    Ok(parse_maps(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
55d0c3a00000-55d0c3a08000 r--p 00000000 fd:01 1311   /usr/bin/target program
55d0c4b6f000-55d0c4b90000 rw-p 00000000 00:00 0      [heap]
7f3b2c000000-7f3b2c021000 rw-p 00000000 00:00 0
7f3b2d1e5000-7f3b2d1e7000 ---p 001e5000 fd:01 2222   /usr/lib/libc.so.6
not a maps line
7ffd5c6f0000-7ffd5c711000 rw-p 00000000 00:00 0      [stack]
";

    #[test]
    fn test_parse_maps() {
        let regions = parse_maps(MAPS);
        assert_eq!(regions.len(), 5);

        assert_eq!(regions[0].start, 0x55d0c3a00000);
        assert_eq!(regions[0].len(), 0x8000);
        assert_eq!(regions[0].pathname.as_deref(), Some("/usr/bin/target program"));

        assert_eq!(regions[1].label(), "[heap]");
        assert!(regions[1].is_dump_candidate());

        assert_eq!(regions[2].pathname, None);
        assert_eq!(regions[2].label(), "[anonymous]");
        assert!(regions[2].is_dump_candidate());

        assert!(!regions[3].is_readable());
        assert!(!regions[3].is_dump_candidate());

        assert_eq!(regions[4].label(), "[stack]");
        assert_eq!(regions[4].permissions, "rw-p");
    }

    #[test]
    fn test_rejects_reversed_range() {
        assert!("2000-1000 rw-p 00000000 00:00 0".parse::<MemoryRegion>().is_err());
    }

    #[test]
    fn test_region_cap() {
        let text = "1000-2000 r--p 00000000 00:00 0\n".repeat(MAX_REGIONS + 5);
        assert_eq!(parse_maps(&text).len(), MAX_REGIONS);
    }

    #[test]
    fn test_read_own_maps() {
        let regions = read_regions(nix::unistd::getpid()).unwrap();
        assert!(regions.iter().any(|r| r.label() == "[stack]"));
    }
}
