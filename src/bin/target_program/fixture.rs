use crate::entropy::{EntropySource, RandomBuffer, BUFFER_LEN};
use std::hint::black_box;
use std::io::{self, BufRead, Write};

pub fn hex_line(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

pub fn decimal_line(bytes: &[u8]) -> String {
    bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(" ")
}

/// Generates the buffer, prints it, parks copies in memory and waits for one
/// line on `input`. Returns the process exit status.
pub fn run<S, R, W, E>(source: &mut S, pid: u32, input: R, mut out: W, mut err: E) -> i32
where
    S: EntropySource,
    R: BufRead,
    W: Write,
    E: Write,
{
    let buffer = match RandomBuffer::generate(source) {
        Ok(buffer) => buffer,
        Err(e) => {
            let _ = writeln!(err, "Error generating random bytes: {}", e);
            return 1;
        }
    };

    if let Err(e) = display_and_wait(&buffer, pid, input, &mut out) {
        let _ = writeln!(err, "Error writing output: {}", e);
        return 1;
    }
    0
}

fn display_and_wait<R: BufRead, W: Write>(buffer: &RandomBuffer, pid: u32, mut input: R, out: &mut W) -> io::Result<()> {
    let bytes = buffer.as_bytes();
    writeln!(out, "=== TARGET PROGRAM ===")?;
    writeln!(out, "PID: {}", pid)?;
    writeln!(out, "Target {} bytes (hex): {}", BUFFER_LEN, hex_line(bytes))?;
    writeln!(out, "Target {} bytes (decimal): {}", BUFFER_LEN, decimal_line(bytes))?;

    let heap_box: Box<[u8; BUFFER_LEN]> = Box::new(*bytes);
    let heap_vec: Vec<u8> = bytes.to_vec();
    let stack_array: [u8; BUFFER_LEN] = *bytes;

    writeln!(out, "Bytes stored in:")?;
    writeln!(out, "  Heap (box):     {:p}", heap_box.as_ptr())?;
    writeln!(out, "  Heap (vec):     {:p}", heap_vec.as_ptr())?;
    writeln!(out, "  Stack (array):  {:p}", &stack_array)?;
    writeln!(out)?;
    writeln!(out, "Program waiting for memory dump...")?;
    writeln!(out, "Press Enter to exit or let memory dumper attach...")?;
    out.flush()?;

    // EOF and read errors end the wait just like a newline.
    let mut line = String::new();
    let _ = input.read_line(&mut line);

    black_box(buffer);
    black_box(&heap_box);
    black_box(&heap_vec);
    black_box(&stack_array);
    Ok(())
}
