use crate::maps::MemoryRegion;
use crate::tracee::MemorySource;

pub const CHUNK_SIZE: usize = 4096;
pub const MAX_SEARCH_REGION: u64 = 100 * 1024 * 1024;
const CONTEXT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub address: u64,
    /// Bytes around the hit; the pattern starts at `offset`.
    pub context: Vec<u8>,
    pub offset: usize,
}

impl Match {
    /// Context bytes as ` xx `, pattern bytes as `[xx]`.
    pub fn render(&self, pattern_len: usize) -> String {
        self.context
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if i >= self.offset && i < self.offset + pattern_len {
                    format!("[{:02x}]", b)
                } else {
                    format!(" {:02x} ", b)
                }
            })
            .collect()
    }
}

pub fn find_all(haystack: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || haystack.len() < pattern.len() {
        return Vec::new();
    }
    haystack
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, w)| *w == pattern)
        .map(|(i, _)| i)
        .collect()
}

pub struct Scanner {
    pub verbose: bool,
}

impl Scanner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn search_region<M: MemorySource>(&self, mem: &M, region: &MemoryRegion, pattern: &[u8]) -> Vec<Match> {
        if !region.is_readable() {
            if self.verbose {
                println!("Skipping unreadable region: {:x}-{:x} {}", region.start, region.end, region.label());
            }
            return Vec::new();
        }
        if region.len() > MAX_SEARCH_REGION {
            if self.verbose {
                println!("Skipping oversized region: {:x}-{:x} ({} bytes)", region.start, region.end, region.len());
            }
            return Vec::new();
        }

        println!(
            "Searching region: {:x}-{:x} {} {}",
            region.start,
            region.end,
            region.permissions,
            region.label()
        );

        let size = region.len() as usize;
        // Chunks overlap by pattern.len() - 1 so hits straddling a boundary are seen once.
        let overlap = pattern.len().saturating_sub(1);
        let mut matches = Vec::new();
        let mut offset = 0;
        while offset < size {
            let read_size = std::cmp::min(CHUNK_SIZE + overlap, size - offset);
            let chunk = mem.read_memory(region.start + offset as u64, read_size);
            for i in find_all(&chunk, pattern) {
                if i >= CHUNK_SIZE {
                    continue;
                }
                let ctx_start = i.saturating_sub(CONTEXT);
                let ctx_end = std::cmp::min(i + pattern.len() + CONTEXT, chunk.len());
                matches.push(Match {
                    address: region.start + (offset + i) as u64,
                    context: chunk[ctx_start..ctx_end].to_vec(),
                    offset: i - ctx_start,
                });
            }
            offset += CHUNK_SIZE;
        }

        if self.verbose {
            println!("  {} bytes scanned, {} hits", size, matches.len());
        }
        matches
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Flat memory image starting at `base`.
    pub struct FakeMemory {
        pub base: u64,
        pub bytes: Vec<u8>,
    }

    impl MemorySource for FakeMemory {
        fn read_memory(&self, addr: u64, count: usize) -> Vec<u8> {
            (0..count)
                .map(|i| {
                    let at = (addr - self.base) as usize + i;
                    self.bytes.get(at).copied().unwrap_or(0)
                })
                .collect()
        }
    }

    pub fn region(start: u64, len: u64, perms: &str) -> MemoryRegion {
        MemoryRegion {
            start,
            end: start + len,
            permissions: perms.to_string(),
            pathname: None,
        }
    }

    const PATTERN: &[u8] = b"ABCDEFGHIJKLMNOP";

    #[test]
    fn test_find_all() {
        assert_eq!(find_all(b"xxabxab", b"ab"), vec![2, 5]);
        assert_eq!(find_all(b"aaa", b"aa"), vec![0, 1]);
        assert!(find_all(b"a", b"ab").is_empty());
        assert!(find_all(b"abc", b"").is_empty());
    }

    #[test]
    fn test_search_reports_absolute_addresses() {
        let mut bytes = vec![0u8; 3 * CHUNK_SIZE];
        bytes[100..116].copy_from_slice(PATTERN);
        bytes[2 * CHUNK_SIZE + 7..2 * CHUNK_SIZE + 23].copy_from_slice(PATTERN);
        let mem = FakeMemory { base: 0x10000, bytes };

        let hits = Scanner::new(false).search_region(&mem, &region(0x10000, 3 * CHUNK_SIZE as u64, "rw-p"), PATTERN);
        let addrs: Vec<u64> = hits.iter().map(|m| m.address).collect();
        assert_eq!(addrs, vec![0x10000 + 100, 0x10000 + 2 * CHUNK_SIZE as u64 + 7]);
    }

    #[test]
    fn test_search_across_chunk_boundary() {
        let mut bytes = vec![0u8; 2 * CHUNK_SIZE];
        let at = CHUNK_SIZE - 5;
        bytes[at..at + 16].copy_from_slice(PATTERN);
        let mem = FakeMemory { base: 0, bytes };

        let hits = Scanner::new(false).search_region(&mem, &region(0, 2 * CHUNK_SIZE as u64, "r--p"), PATTERN);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].address, at as u64);
    }

    #[test]
    fn test_search_at_region_edges() {
        let mut bytes = vec![0u8; CHUNK_SIZE];
        bytes[..16].copy_from_slice(PATTERN);
        bytes[CHUNK_SIZE - 16..].copy_from_slice(PATTERN);
        let mem = FakeMemory { base: 0, bytes };

        let hits = Scanner::new(false).search_region(&mem, &region(0, CHUNK_SIZE as u64, "rw-p"), PATTERN);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].offset, 0);
        assert_eq!(hits[0].context.len(), 24);
        assert_eq!(hits[1].address, (CHUNK_SIZE - 16) as u64);
        assert_eq!(hits[1].offset, 8);
    }

    #[test]
    fn test_skips_unreadable_and_oversized() {
        let mem = FakeMemory { base: 0, bytes: PATTERN.to_vec() };
        let scanner = Scanner::new(true);
        assert!(scanner.search_region(&mem, &region(0, 16, "---p"), PATTERN).is_empty());
        assert!(scanner.search_region(&mem, &region(0, MAX_SEARCH_REGION + 1, "r--p"), PATTERN).is_empty());
    }

    #[test]
    fn test_render_context() {
        let m = Match {
            address: 0,
            context: vec![0x01, 0xaa, 0xbb, 0x02],
            offset: 1,
        };
        assert_eq!(m.render(2), " 01 [aa][bb] 02 ");
    }
}
