use std::fmt;
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The 8-bit opcode. Discriminant values match the reference instruction set
/// layout (data transfer 0x00-0x1F, arithmetic 0x20-0x3F, logic 0x40-0x5F,
/// control flow 0x60-0x7F, stack 0x80-0x9F, system 0xA0-0xBF, memory control
/// 0xC0-0xDF) so a disassembly that only has the raw byte can still bisect
/// by range before falling back to the lookup table.
///
/// Variants are spelled in the mnemonic's own case; the line splitter
/// upper-cases the mnemonic token before it ever reaches [`EnumFromStr`],
/// so matching is effectively case-insensitive end to end.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Opcode {
    NOP = 0x00,
    LOAD = 0x01,
    STORE = 0x02,
    MOVE = 0x03,
    LOADB = 0x04,
    STOREB = 0x05,
    LOADW = 0x06,
    STOREW = 0x07,
    LEA = 0x08,

    ADD = 0x20,
    SUB = 0x21,
    MUL = 0x22,
    DIV = 0x23,
    MOD = 0x24,
    INC = 0x25,
    DEC = 0x26,
    NEG = 0x27,
    CMP = 0x28,
    ADDC = 0x2A,
    SUBC = 0x2B,

    AND = 0x40,
    OR = 0x41,
    XOR = 0x42,
    NOT = 0x43,
    SHL = 0x44,
    SHR = 0x45,
    SAR = 0x46,
    ROL = 0x47,
    ROR = 0x48,
    TEST = 0x49,

    JMP = 0x60,
    JZ = 0x61,
    JNZ = 0x62,
    JN = 0x63,
    JP = 0x64,
    JO = 0x65,
    JC = 0x66,
    JBE = 0x67,
    JA = 0x68,
    CALL = 0x6A,
    RET = 0x6B,
    SYSCALL = 0x6C,
    LOOP = 0x6F,

    PUSH = 0x80,
    POP = 0x81,
    PUSHF = 0x82,
    POPF = 0x83,
    PUSHA = 0x84,
    POPA = 0x85,
    ENTER = 0x86,
    LEAVE = 0x87,

    HALT = 0xA0,
    INT = 0xA1,
    CLI = 0xA2,
    STI = 0xA3,
    IRET = 0xA4,
    IN = 0xA5,
    OUT = 0xA6,
    CPUID = 0xA7,
    RESET = 0xA8,
    DEBUG = 0xA9,

    ALLOC = 0xC0,
    FREE = 0xC1,
    MEMCPY = 0xC2,
    MEMSET = 0xC3,
    PROTECT = 0xC4,
}

/// Every [`Opcode`] variant, used to drive the disassembler's opcode-byte
/// lookup without a second, hand-kept list.
pub const ALL_OPCODES: &[Opcode] = &[
    Opcode::NOP,
    Opcode::LOAD,
    Opcode::STORE,
    Opcode::MOVE,
    Opcode::LOADB,
    Opcode::STOREB,
    Opcode::LOADW,
    Opcode::STOREW,
    Opcode::LEA,
    Opcode::ADD,
    Opcode::SUB,
    Opcode::MUL,
    Opcode::DIV,
    Opcode::MOD,
    Opcode::INC,
    Opcode::DEC,
    Opcode::NEG,
    Opcode::CMP,
    Opcode::ADDC,
    Opcode::SUBC,
    Opcode::AND,
    Opcode::OR,
    Opcode::XOR,
    Opcode::NOT,
    Opcode::SHL,
    Opcode::SHR,
    Opcode::SAR,
    Opcode::ROL,
    Opcode::ROR,
    Opcode::TEST,
    Opcode::JMP,
    Opcode::JZ,
    Opcode::JNZ,
    Opcode::JN,
    Opcode::JP,
    Opcode::JO,
    Opcode::JC,
    Opcode::JBE,
    Opcode::JA,
    Opcode::CALL,
    Opcode::RET,
    Opcode::SYSCALL,
    Opcode::LOOP,
    Opcode::PUSH,
    Opcode::POP,
    Opcode::PUSHF,
    Opcode::POPF,
    Opcode::PUSHA,
    Opcode::POPA,
    Opcode::ENTER,
    Opcode::LEAVE,
    Opcode::HALT,
    Opcode::INT,
    Opcode::CLI,
    Opcode::STI,
    Opcode::IRET,
    Opcode::IN,
    Opcode::OUT,
    Opcode::CPUID,
    Opcode::RESET,
    Opcode::DEBUG,
    Opcode::ALLOC,
    Opcode::FREE,
    Opcode::MEMCPY,
    Opcode::MEMSET,
    Opcode::PROTECT,
];

impl Opcode {
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        ALL_OPCODES.iter().copied().find(|op| *op as u8 == byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_opcode_round_trips_through_its_byte() {
        for op in ALL_OPCODES {
            assert_eq!(Opcode::from_byte(*op as u8), Some(*op));
        }
    }

    #[test]
    fn parses_the_upper_cased_mnemonic() {
        assert_eq!(Opcode::from_str("LOAD").unwrap(), Opcode::LOAD);
        assert_eq!(Opcode::from_str("MEMSET").unwrap(), Opcode::MEMSET);
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        assert!(Opcode::from_str("FROBNICATE").is_err());
    }

    #[test]
    fn byte_values_match_the_reference_layout() {
        assert_eq!(Opcode::NOP as u8, 0x00);
        assert_eq!(Opcode::HALT as u8, 0xA0);
        assert_eq!(Opcode::MEMSET as u8, 0xC3);
    }
}
