mod config;
mod dump;
mod error;
mod launch;
mod maps;
mod pattern;
mod scan;
mod tracee;

use config::{Options, Target};
use dump::DumpOutcome;
use error::DumperError;
use launch::LaunchedTarget;
use pattern::Pattern;
use scan::Scanner;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracee::Tracee;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("memdump");

    let result = Options::parse(args.iter().skip(1).cloned()).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is_usage() {
            eprintln!("{}", config::usage(program));
        }
        std::process::exit(1);
    }
}

fn run(opts: Options) -> Result<(), DumperError> {
    match &opts.target {
        Target::Pid(pid) => {
            let pattern = match opts.pattern {
                Some(p) => p,
                None => prompt_pattern()?,
            };
            inspect(*pid, &pattern, &opts)
        }
        Target::Launch(path) => {
            println!("Launching target program...");
            let target = LaunchedTarget::spawn(path)?;
            let pattern = opts
                .pattern
                .or_else(|| target.pattern())
                .ok_or(DumperError::TargetOutput)?;
            inspect(target.pid(), &pattern, &opts)?;
            let status = target.release()?;
            if opts.verbose {
                println!("Target exited with status {}", status);
            }
            Ok(())
        }
    }
}

fn prompt_pattern() -> Result<Pattern, DumperError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    print!("Do you want to manually enter the 16-byte pattern? (y/n): ");
    io::stdout().flush()?;
    input.read_line(&mut line)?;
    if !line.trim().eq_ignore_ascii_case("y") {
        println!("Auto-mode: using test pattern A-Z");
        return Ok(Pattern::auto());
    }

    print!("Enter 16 bytes to search for (hex format, space separated): ");
    io::stdout().flush()?;
    line.clear();
    input.read_line(&mut line)?;
    Ok(line.parse()?)
}

fn inspect(pid: nix::unistd::Pid, pattern: &Pattern, opts: &Options) -> Result<(), DumperError> {
    println!("Attaching to PID: {}", pid);
    let tracee = Tracee::attach(pid).map_err(|source| DumperError::Attach { pid, source })?;
    println!("Successfully attached to target process");

    let regions = maps::read_regions(tracee.pid())?;
    println!("Found {} memory regions", regions.len());
    println!("Searching for pattern: {}", pattern);

    let scanner = Scanner::new(opts.verbose);
    let needle = pattern.as_bytes();
    let mut total = 0;
    for region in &regions {
        for m in scanner.search_region(&tracee, region, needle) {
            println!("*** FOUND PATTERN at address: 0x{:x}", m.address);
            println!("    Memory region: {}", region.label());
            println!("    Surrounding memory (hex): {}", m.render(needle.len()));
            total += 1;
        }
    }
    println!();
    println!("Total occurrences found: {}", total);

    if total > 0 {
        if let Some(dir) = &opts.dump_dir {
            println!();
            println!("Dumping memory regions where pattern was found...");
            for (i, region) in regions.iter().enumerate().filter(|(_, r)| r.is_dump_candidate()) {
                dump_one(&tracee, region, &dir.join(format!("dump_region_{}.bin", i)));
            }
        }
    }

    tracee.detach()?;
    println!("Detached from target process");
    Ok(())
}

fn dump_one(tracee: &Tracee, region: &maps::MemoryRegion, path: &Path) {
    match dump::dump_region(tracee, region, path) {
        Ok(DumpOutcome::Written(bytes)) => {
            println!(
                "Dumped region {:x}-{:x} to {} ({} bytes)",
                region.start,
                region.end,
                path.display(),
                bytes
            );
        }
        Ok(DumpOutcome::Unreadable) => println!("Region {:x}-{:x} not readable, skipping dump", region.start, region.end),
        Ok(DumpOutcome::TooLarge(bytes)) => println!("Region too large ({} bytes), skipping dump", bytes),
        Err(e) => eprintln!("Failed to dump {}: {}", path.display(), e),
    }
}
