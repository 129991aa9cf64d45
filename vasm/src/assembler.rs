use std::path::PathBuf;

use isa::{encode_word, AddressingMode, Opcode};
use log::debug;

use crate::error::Diagnostic;
use crate::line::{self, Line};
use crate::symbol::SymbolTable;

/// Which segment the current line affects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Text,
    Data,
}

/// The kind of late fixup a pending reference needs. Only `Imm` exists
/// today; kept as an enum rather than a unit struct because MEM-mode
/// fixups are expected to need the same machinery later.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FixupKind {
    Imm,
}

/// A deferred rewrite: word `index` in the code vector needs its immediate
/// field replaced with the value `symbol` resolves to, once it's known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixup {
    pub index: usize,
    pub symbol: String,
    pub kind: FixupKind,
}

/// All per-run state for a single assembly. Constructed fresh by
/// [`crate::assemble`] and discarded at the end of that call; nothing here
/// is shared across concurrent assemblies.
pub struct Assembler {
    pub(crate) code: Vec<u32>,
    pub(crate) data: Vec<u8>,
    pub(crate) symtab: SymbolTable,
    pub(crate) section: Section,
    pub(crate) fixups: Vec<Fixup>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) current_file: String,
    pub(crate) current_line: u32,
    pub(crate) include_stack: Vec<PathBuf>,
    pub(crate) data_address: u32,
}

impl Assembler {
    pub fn new() -> Assembler {
        Assembler {
            code: Vec::new(),
            data: Vec::new(),
            symtab: SymbolTable::new(),
            section: Section::Text,
            fixups: Vec::new(),
            diagnostics: Vec::new(),
            current_file: String::new(),
            current_line: 0,
            include_stack: Vec::new(),
            data_address: isa::constants::DATA_SEGMENT_BASE,
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(self.current_file.clone(), self.current_line, message));
    }

    pub fn code_address(&self) -> u32 {
        (self.code.len() as u32) * 4
    }

    pub fn current_address(&self) -> u32 {
        match self.section {
            Section::Text => self.code_address(),
            Section::Data => self.data_address,
        }
    }

    /// Appends `count` NOP words to the code vector, used by `.space`,
    /// `.align`, and `.org` padding in `.text`.
    pub(crate) fn pad_code_words(&mut self, count: u32) {
        for _ in 0..count {
            self.code.push(encode_word(Opcode::NOP, AddressingMode::Imm, 0, 0, 0));
        }
    }

    pub(crate) fn pad_data_bytes(&mut self, count: u32) {
        for _ in 0..count {
            self.data.push(0);
        }
        self.data_address += count;
    }

    /// Binds `name` at the current section's cursor, rounding data labels
    /// up to a 4-byte boundary first.
    pub(crate) fn define_label(&mut self, name: &str) {
        if self.section == Section::Data {
            let padding = (4 - (self.data_address % 4)) % 4;
            self.pad_data_bytes(padding);
        }
        let value = self.current_address();
        if let Err(message) = self.symtab.define(name, value) {
            self.error(message);
        }
    }

    /// Runs the full line stream for one already-read source file. `path`
    /// is only used for diagnostics and `.include` resolution.
    pub fn process_source(&mut self, filename: &str, source: &str) {
        let previous_file = self.current_file.clone();
        let previous_line = self.current_line;
        self.current_file = filename.to_string();

        for (line_number, raw_line) in source.lines().enumerate() {
            self.current_line = line_number as u32 + 1;
            self.process_line(raw_line);
        }

        self.current_file = previous_file;
        self.current_line = previous_line;
    }

    fn process_line(&mut self, raw_line: &str) {
        let stripped = line::strip_comment(raw_line);
        if stripped.is_empty() {
            return;
        }

        let labeled = line::peel_label(stripped);
        if let Some(label) = labeled.label {
            self.define_label(label);
        }

        match line::classify_rest(labeled.rest) {
            Line::Empty => {}
            Line::Directive { name, args } => self.process_directive(name, args),
            Line::Instruction { mnemonic, operands } => self.process_instruction(&mnemonic, operands),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn into_symbol_table(self) -> SymbolTable {
        self.symtab
    }

    /// Serializes the final image: code words little-endian, then (if any
    /// data was emitted) zero padding up to the data segment base followed
    /// by the data bytes.
    pub fn emit(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.code.len() * 4 + self.data.len());
        for word in &self.code {
            bytes.extend_from_slice(&word.to_le_bytes());
        }

        if !self.data.is_empty() {
            let target = isa::constants::DATA_SEGMENT_BASE as usize;
            if bytes.len() < target {
                bytes.resize(target, 0);
            }
            bytes.extend_from_slice(&self.data);
        }

        debug!("emitted image: {} code word(s), {} data byte(s)", self.code.len(), self.data.len());
        bytes
    }
}

impl Default for Assembler {
    fn default() -> Assembler {
        Assembler::new()
    }
}
