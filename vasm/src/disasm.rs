use isa::{decode_word, format, AddressingMode, Arity, Opcode};

/// Disassembles a flat image, one line per 4-byte code word. A trailing
/// partial word (from an image that carries a data segment after the
/// code) is silently dropped, mirroring the encoder's own word alignment.
pub fn disassemble(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(4)
        .take_while(|chunk| chunk.len() == 4)
        .enumerate()
        .map(|(i, chunk)| {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let address = (i as u32) * 4;
            format!("{:#06x}: {}", address, disassemble_word(word))
        })
        .collect()
}

/// Disassembles a single already-decoded word. Shares the format table
/// with the assembler's validator so the two never drift on arity.
pub fn disassemble_word(word: u32) -> String {
    let decoded = match decode_word(word) {
        Some(decoded) => decoded,
        None => return format!("??? ({:#010x})", word),
    };

    let opcode = match Opcode::from_byte(decoded.opcode_byte) {
        Some(opcode) => opcode,
        None => return format!("??? ({:#010x})", word),
    };
    let mnemonic = opcode.to_string();

    if opcode == Opcode::MOVE {
        return format!("MOVE R{}, R{}", decoded.reg1, decoded.reg2);
    }

    if opcode == Opcode::RET {
        return if decoded.reg1 == 0 && decoded.immediate == 0 {
            "RET".to_string()
        } else {
            format!("RET {}", render_operand(decoded.mode, decoded.reg2, decoded.immediate))
        };
    }

    let arity = format::lookup(&mnemonic).map(|fmt| fmt.arity).unwrap_or(Arity::Exact(0));

    match arity {
        Arity::Exact(0) => mnemonic,
        Arity::Exact(1) | Arity::AtMost(1) => {
            format!("{} {}", mnemonic, render_operand(decoded.mode, decoded.reg1, decoded.immediate))
        }
        _ => format!(
            "{} R{}, {}",
            mnemonic,
            decoded.reg1,
            render_operand(decoded.mode, decoded.reg2, decoded.immediate)
        ),
    }
}

fn render_operand(mode: AddressingMode, reg: u8, immediate: u32) -> String {
    match mode {
        AddressingMode::Imm => format!("#{:#x}", immediate),
        AddressingMode::Reg => format!("R{}", reg),
        AddressingMode::Mem => format!("[{:#x}]", immediate),
        AddressingMode::RegIndirect => format!("[R{}]", reg),
        AddressingMode::Indexed => format!("[R{}{}]", reg, signed_offset(immediate, 12)),
        AddressingMode::Stack => format!("[SP{}]", signed_offset(immediate, 16)),
        AddressingMode::Base => format!("[BP{}]", signed_offset(immediate, 16)),
    }
}

/// Renders a `width`-bit two's-complement field as a signed `+k`/`-k` suffix.
fn signed_offset(value: u32, width: u32) -> String {
    let sign_bit = 1u32 << (width - 1);
    if value & sign_bit != 0 {
        let magnitude = (!value).wrapping_add(1) & ((1u32 << width) - 1);
        format!("-{:#x}", magnitude)
    } else {
        format!("+{:#x}", value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nop_word_disassembles_to_bare_mnemonic() {
        assert_eq!(disassemble_word(0x0000_0000), "NOP");
    }

    #[test]
    fn load_immediate_round_trips_textually() {
        assert_eq!(disassemble_word(0x0105_1234), "LOAD R5, #0x1234");
    }

    #[test]
    fn move_uses_its_special_case_rendering() {
        assert_eq!(disassemble_word(0x0315_6000), "MOVE R5, R6");
    }

    #[test]
    fn unknown_opcode_byte_prints_placeholder() {
        assert!(disassemble_word(0xFF00_0000).starts_with("???"));
    }

    #[test]
    fn negative_indexed_offset_renders_with_a_minus_sign() {
        let word = isa::encode_word(Opcode::ADD, AddressingMode::Indexed, 1, 2, 1u32.wrapping_neg());
        assert_eq!(disassemble_word(word), "ADD R1, [R2-0x1]");
    }

    #[test]
    fn drops_a_trailing_partial_word() {
        let bytes = [0u8, 0, 0, 0, 1, 2];
        assert_eq!(disassemble(&bytes).len(), 1);
    }
}
