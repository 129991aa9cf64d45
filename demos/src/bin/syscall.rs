//! Writes a test image exercising the console-output syscalls to the path
//! given as the first argument, or to stdout if none is given.

use std::env;
use std::io::{self, Write};

use vimg::Image;

fn main() -> io::Result<()> {
    let bytes = demos::words_to_bytes(&demos::syscall_demo_program("Extended Syscall Test Program"));
    let image = Image::new(bytes);

    match env::args().nth(1) {
        Some(path) => vimg::write_file(&path, &image),
        None => io::stdout().write_all(image.bytes()),
    }
}
