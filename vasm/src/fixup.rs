use isa::{decode_word, encode_word_raw};

use crate::assembler::{Assembler, Fixup, FixupKind};

impl Assembler {
    /// Rewrites every pending reference now that all input has been
    /// consumed and every symbol that will ever be defined, is. Per
    /// `FixupKind::Imm`, this unconditionally zeroes `reg2`: the design
    /// only ever queues a fixup from an IMM- or MEM-mode operand, both of
    /// which already had `reg2 == 0` at first encoding.
    pub fn apply_fixups(&mut self) {
        for i in 0..self.fixups.len() {
            let Fixup { index, symbol, kind } = self.fixups[i].clone();
            let FixupKind::Imm = kind;

            match self.symtab.get(&symbol) {
                Some(value) => {
                    let decoded = decode_word(self.code[index]).expect("previously encoded word must decode");
                    self.code[index] = encode_word_raw(decoded.opcode_byte, decoded.mode, decoded.reg1, 0, value);
                }
                None => self.error(format!("Unresolved symbol: {}", symbol)),
            }
        }
    }
}
