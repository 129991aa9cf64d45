use std::fmt;
use std::io;
use thiserror::Error;

/// A single `file:line: message` diagnostic, accumulated rather than
/// raised immediately so a run can report every problem it finds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: u32, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("assembly failed with {} diagnostic(s)", .0.len())]
    Diagnostics(Vec<Diagnostic>),
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Diagnostics(list) => list,
            Error::Io(_) => &[],
        }
    }
}
