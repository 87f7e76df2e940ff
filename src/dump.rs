use crate::maps::MemoryRegion;
use crate::scan::CHUNK_SIZE;
use crate::tracee::MemorySource;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const MAX_DUMP_REGION: u64 = 10 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum DumpOutcome {
    Written(u64),
    Unreadable,
    TooLarge(u64),
}

pub fn dump_region<M: MemorySource>(mem: &M, region: &MemoryRegion, path: &Path) -> io::Result<DumpOutcome> {
    if !region.is_readable() {
        return Ok(DumpOutcome::Unreadable);
    }
    let size = region.len();
    if size > MAX_DUMP_REGION {
        return Ok(DumpOutcome::TooLarge(size));
    }

    let mut out = BufWriter::new(File::create(path)?);
    let mut offset = 0u64;
    while offset < size {
        let read_size = std::cmp::min(CHUNK_SIZE as u64, size - offset) as usize;
        out.write_all(&mem.read_memory(region.start + offset, read_size))?;
        offset += read_size as u64;
    }
    out.flush()?;
    Ok(DumpOutcome::Written(size))
}
