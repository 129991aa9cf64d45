use std::fmt;
use std::str::FromStr;
use util::ParseEnumError;

/// One of the 16 general-purpose register indices.
///
/// Several indices carry a conventional alias (`R1` is also `BP`, the base
/// pointer) that the parser accepts in addition to the bare `Rn` form;
/// [`RegisterId::fmt`] always prints the bare form, since that's what the
/// disassembler needs to round-trip.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct RegisterId(u8);

impl RegisterId {
    pub const ACC: RegisterId = RegisterId(0);
    pub const BP: RegisterId = RegisterId(1);
    pub const SP: RegisterId = RegisterId(2);
    pub const PC: RegisterId = RegisterId(3);
    pub const SR: RegisterId = RegisterId(4);
    pub const LR: RegisterId = RegisterId(15);

    /// Builds a register id from a 0..=15 index, masking to 4 bits.
    pub fn from_index(index: u8) -> RegisterId {
        RegisterId(index & 0xF)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl FromStr for RegisterId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<RegisterId, ParseEnumError> {
        let upper = s.to_uppercase();
        let err = || ParseEnumError {
            value: s.to_owned(),
            enum_name: "RegisterId",
        };

        let index = match upper.as_str() {
            "ACC" => 0,
            "BP" => 1,
            "SP" => 2,
            "PC" => 3,
            "SR" => 4,
            "LR" => 15,
            _ => {
                let digits = upper.strip_prefix('R').ok_or_else(err)?;
                let n: u8 = digits.parse().map_err(|_| err())?;
                if n > 15 {
                    return Err(err());
                }
                n
            }
        };

        Ok(RegisterId(index))
    }
}
