#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use vimg::Image;

#[derive(Debug)]
enum IoContext {
    ReadInput,
    WriteOutput,
    WriteListing,
}

#[derive(Debug)]
enum Error {
    Diagnostics(Vec<vasm::Diagnostic>),
    Io(std::io::Error, IoContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IoContext::ReadInput => "Reading input",
                    IoContext::WriteOutput => "Writing output",
                    IoContext::WriteListing => "Writing listing",
                },
                path.display(),
                err
            ),
            Error::Diagnostics(diagnostics) => {
                for diagnostic in diagnostics {
                    writeln!(f, "{}", diagnostic)?;
                }
                Ok(())
            }
        }
    }
}

impl From<vasm::Error> for Error {
    fn from(err: vasm::Error) -> Error {
        Error::Diagnostics(err.diagnostics().to_vec())
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(Arg::with_name("INPUT").help("Assembly source file to assemble").required(true).index(1))
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Path to write the assembled image to (default: INPUT with a .img extension)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Dump the symbol table, sorted by name, in hex"),
        )
        .arg(
            Arg::with_name("disassemble")
                .short("d")
                .long("disassemble")
                .help("Round-trip the emitted image through the disassembler and print it"),
        )
        .arg(
            Arg::with_name("listing")
                .short("l")
                .long("listing")
                .takes_value(true)
                .value_name("LISTING")
                .help("Write a listing file: source text concatenated with the disassembly"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");
    let verbose = matches.is_present("verbose");
    let disassemble = matches.is_present("disassemble");
    let listing = matches.value_of("listing");

    if let Err(err) = run(input, output, verbose, disassemble, listing) {
        eprint!("{}", err);
        process::exit(1);
    }
}

fn run(
    input: &str,
    output: Option<&str>,
    verbose: bool,
    disassemble: bool,
    listing: Option<&str>,
) -> Result<(), Error> {
    let input_path = Path::new(input);

    let source = {
        let file = File::open(input_path).map_err(|err| Error::Io(err, IoContext::ReadInput, input_path.to_owned()))?;
        let mut reader = BufReader::new(file);
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|err| Error::Io(err, IoContext::ReadInput, input_path.to_owned()))?;
        source
    };

    let (bytes, symbols) = vasm::assemble_addressed(&source, input)?;
    let image = Image::new(bytes);

    let output_path: PathBuf = output.map(PathBuf::from).unwrap_or_else(|| input_path.with_extension("img"));
    vimg::write_file(&output_path, &image).map_err(|err| Error::Io(err, IoContext::WriteOutput, output_path))?;

    if verbose {
        for (name, value) in symbols.sorted() {
            println!("{:<32} {:#010x}", name, value);
        }
    }

    let disassembly = vasm::disassemble(image.code());
    if disassemble {
        for line in &disassembly {
            println!("{}", line);
        }
    }

    if let Some(listing_path_str) = listing {
        let listing_path = PathBuf::from(listing_path_str);
        let mut writer = BufWriter::new(
            File::create(&listing_path).map_err(|err| Error::Io(err, IoContext::WriteListing, listing_path.clone()))?,
        );
        writeln!(writer, "; source: {}", input)
            .map_err(|err| Error::Io(err, IoContext::WriteListing, listing_path.clone()))?;
        write!(writer, "{}", source).map_err(|err| Error::Io(err, IoContext::WriteListing, listing_path.clone()))?;
        writeln!(writer, "\n; disassembly").map_err(|err| Error::Io(err, IoContext::WriteListing, listing_path.clone()))?;
        for line in &disassembly {
            writeln!(writer, "{}", line).map_err(|err| Error::Io(err, IoContext::WriteListing, listing_path.clone()))?;
        }
    }

    Ok(())
}
