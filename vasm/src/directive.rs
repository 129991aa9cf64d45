use crate::assembler::{Assembler, Section};
use crate::operand::{parse_numeric, value_of};

impl Assembler {
    pub(crate) fn process_directive(&mut self, name: &str, args: &str) {
        match name.to_ascii_lowercase().as_str() {
            "text" => self.enter_text(),
            "data" => self.section = Section::Data,
            "byte" => self.emit_ints(args, 1),
            "word" => self.emit_ints(args, 2),
            "dword" => self.emit_ints(args, 4),
            "ascii" => self.emit_ascii(args, false),
            "asciiz" => self.emit_ascii(args, true),
            "space" | "skip" => self.directive_space(args),
            "align" => self.directive_align(args),
            "equ" | "set" => self.directive_equ(args),
            "org" => self.directive_org(args),
            "include" => self.directive_include(args),
            other => self.error(format!("Unknown directive: .{}", other)),
        }
    }

    fn enter_text(&mut self) {
        self.section = Section::Text;
        let misaligned = self.code_address() % 4;
        if misaligned != 0 {
            self.pad_code_words(1);
        }
    }

    fn require_data_section(&mut self, directive: &str) -> bool {
        if self.section != Section::Data {
            self.error(format!("Directive .{} is only valid in .data", directive));
            false
        } else {
            true
        }
    }

    fn emit_ints(&mut self, args: &str, width: u32) {
        if !self.require_data_section(match width {
            1 => "byte",
            2 => "word",
            _ => "dword",
        }) {
            return;
        }
        if args.trim().is_empty() {
            self.error("Directive requires at least one value");
            return;
        }

        let alignment = width.min(4);
        let padding = (alignment - (self.data_address % alignment)) % alignment;
        self.pad_data_bytes(padding);

        for token in args.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (value, symbol) = value_of(token, &self.symtab);
            if symbol.is_some() {
                self.error(format!("Undefined symbol: {}", token));
            }
            match width {
                1 => self.data.push((value & 0xFF) as u8),
                2 => self.data.extend_from_slice(&(value as u16).to_le_bytes()),
                _ => self.data.extend_from_slice(&value.to_le_bytes()),
            }
            self.data_address += width;
        }
    }

    fn emit_ascii(&mut self, args: &str, zero_terminate: bool) {
        if !self.require_data_section("ascii") {
            return;
        }
        let literal = args.trim();
        let inner = match literal.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            Some(inner) => inner,
            None => {
                self.error(format!("Malformed string literal: {}", literal));
                return;
            }
        };

        let mut bytes = Vec::new();
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => bytes.push(b'\n'),
                    Some('t') => bytes.push(b'\t'),
                    Some('r') => bytes.push(b'\r'),
                    Some('0') => bytes.push(0),
                    Some('\\') => bytes.push(b'\\'),
                    Some('"') => bytes.push(b'"'),
                    Some(other) => bytes.push(other as u8),
                    None => {}
                }
            } else {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }

        if zero_terminate {
            bytes.push(0);
        }

        self.data_address += bytes.len() as u32;
        self.data.extend(bytes);
    }

    fn directive_space(&mut self, args: &str) {
        let size = match parse_numeric(args.trim()) {
            Ok(value) => value,
            Err(_) => {
                self.error(format!("Invalid size: {}", args));
                return;
            }
        };
        if size == 0 {
            self.error("Size must be positive");
            return;
        }
        self.pad_current_section(size);
    }

    fn directive_align(&mut self, args: &str) {
        let alignment = match parse_numeric(args.trim()) {
            Ok(value) => value,
            Err(_) => {
                self.error(format!("Invalid alignment: {}", args));
                return;
            }
        };
        if alignment == 0 || (alignment & (alignment - 1)) != 0 {
            self.error(format!("Alignment must be a positive power of two, got {}", alignment));
            return;
        }
        let current = self.current_address();
        let padding = (alignment - (current % alignment)) % alignment;
        self.pad_current_section(padding);
    }

    fn pad_current_section(&mut self, byte_count: u32) {
        match self.section {
            Section::Text => {
                let words = (byte_count + 3) / 4;
                self.pad_code_words(words);
            }
            Section::Data => self.pad_data_bytes(byte_count),
        }
    }

    fn directive_equ(&mut self, args: &str) {
        let mut parts = args.splitn(2, ',');
        let name = match parts.next() {
            Some(n) => n.trim(),
            None => {
                self.error("Missing symbol name");
                return;
            }
        };
        let expr = match parts.next() {
            Some(e) => e.trim(),
            None => {
                self.error(format!(".equ requires a value: {}", args));
                return;
            }
        };

        if !crate::symbol::is_valid_symbol_name(name) {
            self.error(format!("Invalid symbol name: {}", name));
            return;
        }

        let (value, symbol) = value_of(expr, &self.symtab);
        if symbol.is_some() {
            self.error(format!("Undefined symbol in .equ: {}", expr));
            return;
        }
        if let Err(message) = self.symtab.define(name, value) {
            self.error(message);
        }
    }

    fn directive_org(&mut self, args: &str) {
        let target = match parse_numeric(args.trim()) {
            Ok(value) => value,
            Err(_) => {
                self.error(format!("Invalid address: {}", args));
                return;
            }
        };
        let current = self.current_address();
        if target < current {
            self.error(format!(".org cannot move backward (current {:#x}, target {:#x})", current, target));
            return;
        }
        self.pad_current_section(target - current);
    }

    fn directive_include(&mut self, args: &str) {
        let path = match args.trim().strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            Some(path) => path,
            None => {
                self.error(format!("Malformed .include argument: {}", args));
                return;
            }
        };
        self.include_file(path);
    }
}
