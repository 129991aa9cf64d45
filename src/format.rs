use crate::mode::AddressingMode;
use crate::opcode::Opcode;
use std::fmt;

use AddressingMode::{Base, Imm, Indexed, Mem, Reg, RegIndirect, Stack};

/// How many operands a mnemonic takes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
    /// Exactly `n` operands.
    Exact(u8),
    /// `RET`'s special case: zero or one.
    AtMost(u8),
}

impl Arity {
    pub fn accepts(self, given: usize) -> bool {
        match self {
            Arity::Exact(n) => given == n as usize,
            Arity::AtMost(n) => given <= n as usize,
        }
    }
}

/// The addressing-mode shape of an instruction: zero operands, or a fixed
/// list of per-position allowed-mode sets. Position 0 is the destination
/// for the two- and three-operand instructions.
#[derive(Clone, Copy, Debug)]
pub struct InstrFormat {
    pub arity: Arity,
    /// One slice of allowed modes per operand position. Empty for
    /// zero-operand instructions.
    pub operand_modes: &'static [&'static [AddressingMode]],
    pub description: &'static str,
}

impl InstrFormat {
    /// Checks operand count and per-position addressing modes, mirroring
    /// the reference validator's two error classes (arity, then mode).
    pub fn validate(&self, mnemonic: &str, modes: &[AddressingMode]) -> Result<(), String> {
        if !self.arity.accepts(modes.len()) {
            return Err(format!(
                "{} expects {} operand(s), got {}",
                mnemonic,
                arity_description(self.arity),
                modes.len()
            ));
        }

        if modes.is_empty() || self.operand_modes.is_empty() {
            return Ok(());
        }

        for (position, (allowed, actual)) in self.operand_modes.iter().zip(modes.iter()).enumerate() {
            if !allowed.contains(actual) {
                let ordinal = match position {
                    0 => "first",
                    1 => "second",
                    _ => "third",
                };
                let allowed_str = allowed
                    .iter()
                    .map(|m| format!("{:?}", m))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(format!(
                    "{} expects {} operand with addressing mode(s): {}, got {:?}",
                    mnemonic, ordinal, allowed_str, actual
                ));
            }
        }

        Ok(())
    }
}

fn arity_description(arity: Arity) -> String {
    match arity {
        Arity::Exact(n) => n.to_string(),
        Arity::AtMost(n) => format!("at most {}", n),
    }
}

const NONE: &[AddressingMode] = &[];
const REG_ONLY: &[AddressingMode] = &[Reg];
const IMM_ONLY: &[AddressingMode] = &[Imm];
const REG_OR_IMM: &[AddressingMode] = &[Reg, Imm];
const JUMP_TARGET: &[AddressingMode] = &[Imm, Reg, RegIndirect, Indexed];
const LOAD_SRC: &[AddressingMode] = &[Imm, Mem, RegIndirect, Indexed, Stack, Base];
const LEA_SRC: &[AddressingMode] = &[Mem, RegIndirect, Indexed, Stack, Base];
const STORE_DST: &[AddressingMode] = &[Mem, RegIndirect, Indexed, Stack, Base];
const ALU_SRC: &[AddressingMode] = &[Reg, Imm, Mem, RegIndirect, Indexed, Stack, Base];
const SHIFT_SRC: &[AddressingMode] = &[Reg, Imm];

fn format_of(opcode: Opcode) -> InstrFormat {
    use Opcode::*;
    match opcode {
        NOP | PUSHF | POPF | PUSHA | POPA | LEAVE | HALT | CLI | STI | IRET | CPUID | RESET | DEBUG => {
            InstrFormat { arity: Arity::Exact(0), operand_modes: &[], description: "no operands" }
        }

        INC | DEC | NEG | NOT | POP => InstrFormat {
            arity: Arity::Exact(1),
            operand_modes: &[REG_ONLY],
            description: "register operand",
        },
        FREE => InstrFormat {
            arity: Arity::Exact(1),
            operand_modes: &[REG_ONLY],
            description: "register operand",
        },

        RET => InstrFormat {
            arity: Arity::AtMost(1),
            operand_modes: &[IMM_ONLY],
            description: "optional immediate",
        },

        PUSH => InstrFormat {
            arity: Arity::Exact(1),
            operand_modes: &[REG_OR_IMM],
            description: "register or immediate",
        },

        JMP | JZ | JNZ | JN | JP | JO | JC | JBE | JA | CALL => InstrFormat {
            arity: Arity::Exact(1),
            operand_modes: &[JUMP_TARGET],
            description: "jump target",
        },

        ENTER | INT | SYSCALL => InstrFormat {
            arity: Arity::Exact(1),
            operand_modes: &[IMM_ONLY],
            description: "immediate operand",
        },

        IN => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, IMM_ONLY],
            description: "register, immediate",
        },
        OUT => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[IMM_ONLY, REG_OR_IMM],
            description: "immediate, register-or-immediate",
        },
        LOOP => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, IMM_ONLY],
            description: "register, target",
        },

        MOVE => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, REG_ONLY],
            description: "register, register",
        },

        LOAD | LOADB | LOADW => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, LOAD_SRC],
            description: "register, addressable source",
        },
        LEA => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, LEA_SRC],
            description: "register, addressable source",
        },

        ADD | SUB | MUL | DIV | MOD | AND | OR | XOR | TEST | CMP | ADDC | SUBC => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, ALU_SRC],
            description: "register, addressable source",
        },

        SHL | SHR | SAR | ROL | ROR => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, SHIFT_SRC],
            description: "register, register-or-immediate",
        },

        STORE | STOREB | STOREW => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, STORE_DST],
            description: "register, addressable destination",
        },

        ALLOC | PROTECT => InstrFormat {
            arity: Arity::Exact(2),
            operand_modes: &[REG_ONLY, REG_OR_IMM],
            description: "register, register-or-immediate",
        },

        // MEMCPY/MEMSET are accepted at this shape check but rejected later:
        // the word format has no room to encode a third register operand.
        MEMCPY | MEMSET => InstrFormat {
            arity: Arity::Exact(3),
            operand_modes: &[REG_ONLY, REG_ONLY, IMM_ONLY],
            description: "register, register, immediate (unencodable)",
        },
    }
}

/// Looks up the format for a mnemonic, accepting any spelling `Opcode`
/// accepts (already upper-cased by the caller).
pub fn lookup(mnemonic: &str) -> Option<InstrFormat> {
    let opcode: Opcode = mnemonic.parse().ok()?;
    Some(format_of(opcode))
}

/// Mnemonics whose format is accepted by [`lookup`] but cannot actually be
/// encoded into a single instruction word, because they need three operand
/// fields and the word only carries two register slots plus an immediate.
pub fn is_unencodable(opcode: Opcode) -> bool {
    matches!(opcode, Opcode::MEMCPY | Opcode::MEMSET)
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", arity_description(*self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_operand_instruction_rejects_any_operand() {
        let fmt = lookup("NOP").unwrap();
        assert!(fmt.validate("NOP", &[]).is_ok());
        assert!(fmt.validate("NOP", &[AddressingMode::Reg]).is_err());
    }

    #[test]
    fn ret_accepts_zero_or_one_immediate_operand() {
        let fmt = lookup("RET").unwrap();
        assert!(fmt.validate("RET", &[]).is_ok());
        assert!(fmt.validate("RET", &[AddressingMode::Imm]).is_ok());
        assert!(fmt.validate("RET", &[AddressingMode::Reg]).is_err());
        assert!(fmt.validate("RET", &[AddressingMode::Imm, AddressingMode::Imm]).is_err());
    }

    #[test]
    fn load_requires_register_destination() {
        let fmt = lookup("LOAD").unwrap();
        assert!(fmt.validate("LOAD", &[AddressingMode::Reg, AddressingMode::Mem]).is_ok());
        assert!(fmt.validate("LOAD", &[AddressingMode::Mem, AddressingMode::Reg]).is_err());
    }

    #[test]
    fn shift_rejects_memory_source() {
        let fmt = lookup("SHL").unwrap();
        assert!(fmt.validate("SHL", &[AddressingMode::Reg, AddressingMode::Reg]).is_ok());
        assert!(fmt.validate("SHL", &[AddressingMode::Reg, AddressingMode::Mem]).is_err());
    }

    #[test]
    fn memcpy_shape_is_accepted_but_flagged_unencodable() {
        let fmt = lookup("MEMCPY").unwrap();
        assert!(fmt
            .validate("MEMCPY", &[AddressingMode::Reg, AddressingMode::Reg, AddressingMode::Imm])
            .is_ok());
        assert!(is_unencodable(Opcode::MEMCPY));
        assert!(!is_unencodable(Opcode::LOAD));
    }

    #[test]
    fn unknown_mnemonic_has_no_format() {
        assert!(lookup("NOTANOPCODE").is_none());
    }
}
