//! The assembler's output container: a flat, header-less binary image with
//! code at offset `0x0000` and (if any was emitted) data at the fixed
//! offset `isa::constants::DATA_SEGMENT_BASE`. Unlike the teacher's `vex`
//! executable format, there is no length-prefixed header here — the
//! segment boundary is a constant both the assembler and any downstream
//! reader already know, so nothing needs to be recorded on disk.

use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use isa::constants::DATA_SEGMENT_BASE;

/// The bytes of an assembled image, as produced by `vasm::assemble`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image(Vec<u8>);

impl Image {
    pub fn new(bytes: Vec<u8>) -> Image {
        Image(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The code segment: everything before the data segment base, or the
    /// whole image if it's shorter than that (no data was emitted).
    pub fn code(&self) -> &[u8] {
        let end = (DATA_SEGMENT_BASE as usize).min(self.0.len());
        &self.0[..end]
    }

    /// The data segment, if the image is long enough to carry one.
    pub fn data(&self) -> &[u8] {
        let start = DATA_SEGMENT_BASE as usize;
        if self.0.len() > start {
            &self.0[start..]
        } else {
            &[]
        }
    }

    pub fn has_data(&self) -> bool {
        self.0.len() > DATA_SEGMENT_BASE as usize
    }
}

pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Image> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(Image::new(bytes))
}

pub fn write<W: Write>(writer: &mut W, image: &Image) -> std::io::Result<()> {
    writer.write_all(&image.0)
}

pub trait ReadImgExt: Read + Sized {
    fn read_img(&mut self) -> std::io::Result<Image> {
        read(self)
    }
}

impl<R: Read + Sized> ReadImgExt for R {}

pub trait WriteImgExt: Write + Sized {
    fn write_img(&mut self, image: &Image) -> std::io::Result<()> {
        write(self, image)
    }
}

impl<W: Write + Sized> WriteImgExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> std::io::Result<Image> {
    BufReader::new(File::open(path)?).read_img()
}

pub fn write_file<P: AsRef<Path>>(path: P, image: &Image) -> std::io::Result<()> {
    BufWriter::new(File::create(path)?).write_img(image)
}
