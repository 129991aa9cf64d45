use crate::constants::*;
use crate::mode::AddressingMode;
use crate::opcode::Opcode;

/// A decoded instruction word: the opcode and addressing mode plus the
/// operand fields, already reassembled according to [`AddressingMode::has_wide_immediate`].
///
/// For the four wide-immediate modes, `reg2` is always `0` and `immediate`
/// holds the full 16-bit value; for the others, `reg2` is a register index
/// and `immediate` holds the 12-bit displacement or literal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecodedWord {
    pub opcode_byte: u8,
    pub mode: AddressingMode,
    pub reg1: u8,
    pub reg2: u8,
    pub immediate: u32,
}

/// Packs `opcode | mode | reg1 | reg2 | immediate` into a 32-bit word,
/// reinterpreting `reg2`/`immediate` as a single 16-bit field for the modes
/// where that applies.
pub fn encode_word(opcode: Opcode, mode: AddressingMode, reg1: u8, reg2: u8, immediate: u32) -> u32 {
    encode_word_raw(opcode as u8, mode, reg1, reg2, immediate)
}

/// Like [`encode_word`] but takes the raw opcode byte, for the fixup pass
/// which re-encodes a word whose opcode it never decoded back to an
/// [`Opcode`] in the first place.
pub fn encode_word_raw(opcode_byte: u8, mode: AddressingMode, reg1: u8, reg2: u8, immediate: u32) -> u32 {
    let reg1 = (reg1 as u32) & REG_MASK;

    let (reg2_field, immediate_field) = if mode.has_wide_immediate() {
        let wide = immediate & WIDE_IMMEDIATE_MASK;
        ((wide >> IMMEDIATE_WIDTH) & REG_MASK, wide & IMMEDIATE_MASK)
    } else {
        ((reg2 as u32) & REG_MASK, immediate & IMMEDIATE_MASK)
    };

    ((opcode_byte as u32) << OPCODE_OFFSET)
        | ((mode as u32) << MODE_OFFSET)
        | (reg1 << REG1_OFFSET)
        | (reg2_field << REG2_OFFSET)
        | immediate_field
}

/// Unpacks a 32-bit word into its fields, combining `reg2`/`immediate` back
/// into a single 16-bit immediate for the modes that use one.
pub fn decode_word(word: u32) -> Option<DecodedWord> {
    let opcode_byte = ((word >> OPCODE_OFFSET) & OPCODE_MASK) as u8;
    let mode_value = ((word >> MODE_OFFSET) & MODE_MASK) as u8;
    let mode = AddressingMode::from_u8(mode_value)?;
    let reg1 = ((word >> REG1_OFFSET) & REG_MASK) as u8;
    let reg2_field = (word >> REG2_OFFSET) & REG_MASK;
    let immediate_field = word & IMMEDIATE_MASK;

    let (reg2, immediate) = if mode.has_wide_immediate() {
        (0, (reg2_field << IMMEDIATE_WIDTH) | immediate_field)
    } else {
        (reg2_field as u8, immediate_field)
    };

    Some(DecodedWord {
        opcode_byte,
        mode,
        reg1,
        reg2,
        immediate,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wide_immediate_round_trips_through_reg2_and_immediate() {
        let word = encode_word(Opcode::LOAD, AddressingMode::Mem, 3, 0, 0xBEEF);
        let decoded = decode_word(word).unwrap();
        assert_eq!(decoded.opcode_byte, Opcode::LOAD as u8);
        assert_eq!(decoded.mode, AddressingMode::Mem);
        assert_eq!(decoded.reg1, 3);
        assert_eq!(decoded.reg2, 0);
        assert_eq!(decoded.immediate, 0xBEEF);
    }

    #[test]
    fn register_mode_keeps_reg2_and_immediate_distinct() {
        let word = encode_word(Opcode::ADD, AddressingMode::Reg, 1, 2, 0xABC);
        let decoded = decode_word(word).unwrap();
        assert_eq!(decoded.reg1, 1);
        assert_eq!(decoded.reg2, 2);
        assert_eq!(decoded.immediate, 0xABC);
    }

    #[test]
    fn fields_are_masked_to_their_widths() {
        let word = encode_word(Opcode::NOP, AddressingMode::Reg, 0xFF, 0xFF, 0xFFFFF);
        let decoded = decode_word(word).unwrap();
        assert_eq!(decoded.reg1, 0xF);
        assert_eq!(decoded.reg2, 0xF);
        assert_eq!(decoded.immediate, 0xFFF);
    }

    #[test]
    fn unknown_mode_bits_fail_to_decode() {
        let word = (Opcode::NOP as u32) << OPCODE_OFFSET | (0x7 << MODE_OFFSET);
        assert!(decode_word(word).is_none());
    }
}
