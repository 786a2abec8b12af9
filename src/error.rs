use std::error::Error as StdError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The fetched byte resolved to no real instruction.
    IllegalOpcode { opcode: u8, pc: u16 },
    /// A memory-bus access faulted. Policy belongs to the bus; the CPU core
    /// only propagates it.
    Addressing { address: u16 },
    /// Two opcode-table installers claimed the same slot.
    OpcodeConflict {
        opcode: u8,
        installed: &'static str,
        new: &'static str,
    },
    Rom(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::IllegalOpcode { opcode, pc } => {
                write!(f, "illegal opcode {:#04x} at {:#06x}", opcode, pc)
            }
            Error::Addressing { address } => {
                write!(f, "addressing error at {:#06x}", address)
            }
            Error::OpcodeConflict {
                opcode,
                installed,
                new,
            } => {
                write!(
                    f,
                    "opcode table conflict at {:#04x}: {} already installed, {} rejected",
                    opcode, installed, new
                )
            }
            Error::Rom(msg) => write!(f, "rom error: {}", msg),
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn from_address(address: u16) -> Self {
        Error::Addressing { address }
    }
}
