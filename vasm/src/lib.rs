//! Two-pass assembler for the VM's fixed instruction set: translates
//! assembly source into a flat, segmented binary image.

mod assembler;
mod directive;
mod disasm;
mod error;
mod fixup;
mod include;
mod instruction;
mod line;
mod operand;
mod symbol;

pub use assembler::{Assembler, Fixup, FixupKind, Section};
pub use disasm::{disassemble, disassemble_word};
pub use error::{Diagnostic, Error};
pub use symbol::SymbolTable;

use log::debug;

pub type Result<T> = std::result::Result<T, Error>;

/// Assembles `source` (whose display name is `filename`) into a flat
/// binary image. Resets all assembler state, runs the full pipeline —
/// line processing, the late fixup pass, then emission — and returns
/// either the image or the accumulated diagnostics.
pub fn assemble(source: &str, filename: &str) -> Result<Vec<u8>> {
    let (bytes, _symtab) = assemble_addressed(source, filename)?;
    Ok(bytes)
}

/// Like [`assemble`] but also returns the final symbol table, for callers
/// that want the `-v` style dump.
pub fn assemble_addressed(source: &str, filename: &str) -> Result<(Vec<u8>, SymbolTable)> {
    debug!("assembling {}", filename);
    let mut assembler = Assembler::new();
    assembler.seed_include_stack(filename);
    assembler.process_source(filename, source);
    assembler.apply_fixups();

    if assembler.has_errors() {
        return Err(Error::Diagnostics(assembler.into_diagnostics()));
    }

    let bytes = assembler.emit();
    let symtab = assembler.into_symbol_table();
    Ok((bytes, symtab))
}

/// Assembles the file at `path` and returns the image.
pub fn assemble_file(path: &std::path::Path) -> Result<Vec<u8>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.to_string_lossy().into_owned();
    assemble(&source, &filename)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nop_alone_is_one_zero_word() {
        let bytes = assemble("NOP", "<test>").unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn halt_alone_encodes_its_opcode_byte() {
        let bytes = assemble("HALT", "<test>").unwrap();
        assert_eq!(bytes, 0xA000_0000u32.to_le_bytes());
    }

    #[test]
    fn data_segment_is_placed_at_its_fixed_base_with_zero_padding() {
        let source = ".data\nmsg: .asciiz \"Hi\"\n.text\nLOAD R0, #msg\nHALT";
        let bytes = assemble(source, "<test>").unwrap();

        assert_eq!(bytes.len(), 0x4000 + 3);
        assert!(bytes[8..0x4000].iter().all(|&b| b == 0));
        assert_eq!(&bytes[0x4000..], b"Hi\0");

        let load_word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(load_word & 0xFFFF, 0x4000);
    }

    #[test]
    fn forward_jump_fixup_lands_on_the_label_byte_offset() {
        let source = "JZ target\nNOP\nNOP\ntarget: NOP";
        let bytes = assemble(source, "<test>").unwrap();
        let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(word & 0xFFFF, 12);
    }

    #[test]
    fn space_padding_in_text_emits_literal_zero_words() {
        let bytes = assemble(".text\nNOP\n.space 8\nHALT", "<test>").unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..12], &[0u8; 8]);
    }

    #[test]
    fn move_word_matches_the_reference_encoding() {
        let bytes = assemble("MOVE R5, R6", "<test>").unwrap();
        assert_eq!(bytes, 0x0315_6000u32.to_le_bytes());
    }

    #[test]
    fn assembling_twice_is_idempotent() {
        let source = ".data\nbuf: .word 1, 2, 3\n.text\nLOAD R0, #buf\nADD R0, #1\nHALT";
        let first = assemble(source, "<test>").unwrap();
        let second = assemble(source, "<test>").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn redefined_symbol_is_a_diagnostic_and_suppresses_emission() {
        let err = assemble("foo: NOP\nfoo: NOP", "<test>").unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
    }

    #[test]
    fn label_addresses_always_land_on_a_four_byte_boundary() {
        let source = ".data\n.byte 1\nsecond: .byte 2\n.text\nLOAD R0, #second\nHALT";
        let (_, symbols) = assemble_addressed(source, "<test>").unwrap();
        let second = symbols.get("second").unwrap();
        assert_eq!(second % 4, 0);
    }

    #[test]
    fn self_including_file_is_a_single_circular_inclusion_diagnostic() {
        let dir = std::env::temp_dir().join(format!("vasm-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("self_include.s");
        std::fs::write(&path, ".include \"self_include.s\"\nNOP").unwrap();

        let source = std::fs::read_to_string(&path).unwrap();
        let err = assemble(&source, path.to_str().unwrap()).unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Circular inclusion"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn mutually_including_files_that_never_cycle_are_fine() {
        let dir = std::env::temp_dir().join(format!("vasm-test-pair-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let a_path = dir.join("a.s");
        let b_path = dir.join("b.s");
        std::fs::write(&b_path, "shared: NOP").unwrap();
        std::fs::write(&a_path, ".include \"b.s\"\nJZ shared").unwrap();

        let source = std::fs::read_to_string(&a_path).unwrap();
        let result = assemble(&source, a_path.to_str().unwrap());
        assert!(result.is_ok(), "unexpected diagnostics: {:?}", result.err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
