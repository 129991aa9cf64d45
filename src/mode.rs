use std::fmt;

/// The 4-bit addressing mode code that selects how `reg1`/`reg2`/`immediate`
/// are interpreted (see [`crate::word`]).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AddressingMode {
    /// `#expr` — immediate value in the instruction.
    Imm = 0,
    /// A bare register — value taken from the register.
    Reg = 1,
    /// `[expr]` — direct memory address.
    Mem = 2,
    /// `[Rn]` — register indirect.
    RegIndirect = 3,
    /// `[Rn+k]` / `[Rn-k]` — indexed.
    Indexed = 4,
    /// `[SP+k]` / `[SP-k]` — stack relative.
    Stack = 5,
    /// `[BP+k]` / `[BP-k]` — base relative.
    Base = 6,
}

impl AddressingMode {
    /// `true` for the four modes whose `reg2`/`immediate` fields are
    /// reinterpreted as a single 16-bit immediate.
    pub fn has_wide_immediate(self) -> bool {
        matches!(
            self,
            AddressingMode::Imm | AddressingMode::Mem | AddressingMode::Stack | AddressingMode::Base
        )
    }

    pub fn from_u8(value: u8) -> Option<AddressingMode> {
        Some(match value {
            0 => AddressingMode::Imm,
            1 => AddressingMode::Reg,
            2 => AddressingMode::Mem,
            3 => AddressingMode::RegIndirect,
            4 => AddressingMode::Indexed,
            5 => AddressingMode::Stack,
            6 => AddressingMode::Base,
            _ => return None,
        })
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
