use strum_macros::EnumIter;

/// The CPU register file: eight 8-bit registers plus the 16-bit program
/// counter and stack pointer. Adjacent 8-bit registers pair up into the
/// 16-bit views AF, BC, DE and HL.
#[derive(Debug)]
pub struct Registers {
    pub a: u8,
    pub f: FlagRegister,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
}

/// Macro to generate a getter for a register pair. The first-named
/// register holds the high byte.
macro_rules! get_register_pair {
    ($name:ident, $hi:ident, $lo:ident) => {
        #[doc = concat!("Gets the register pair ", stringify!($hi), stringify!($lo), ".")]
        pub fn $name(&self) -> u16 {
            (u8::from(self.$hi) as u16) << 8 | (u8::from(self.$lo) as u16)
        }
    };
}

/// Macro to generate a setter for a register pair.
macro_rules! set_register_pair {
    ($name:ident, $hi:ident, $lo:ident) => {
        #[doc = concat!("Sets the register pair ", stringify!($hi), stringify!($lo), ".")]
        pub fn $name(&mut self, value: u16) {
            self.$hi = (((value >> 8) & 0xff) as u8).into();
            self.$lo = ((value & 0xff) as u8).into();
        }
    };
}

impl Registers {
    /// Power-on state of the DMG register file.
    pub fn new() -> Registers {
        Registers {
            a: 0x01,
            f: 0xB0.into(),
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            pc: 0x0100,
            sp: 0xFFFE,
        }
    }

    get_register_pair!(get_af, a, f);
    set_register_pair!(set_af, a, f);

    get_register_pair!(get_bc, b, c);
    set_register_pair!(set_bc, b, c);

    get_register_pair!(get_de, d, e);
    set_register_pair!(set_de, d, e);

    get_register_pair!(get_hl, h, l);
    set_register_pair!(set_hl, h, l);
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the 8-bit registers an instruction can address. F is reachable
/// only through the AF pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Reg {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg {
    pub fn get(self, registers: &Registers) -> u8 {
        match self {
            Self::A => registers.a,
            Self::B => registers.b,
            Self::C => registers.c,
            Self::D => registers.d,
            Self::E => registers.e,
            Self::H => registers.h,
            Self::L => registers.l,
        }
    }

    pub fn set(self, registers: &mut Registers, value: u8) {
        match self {
            Self::A => registers.a = value,
            Self::B => registers.b = value,
            Self::C => registers.c = value,
            Self::D => registers.d = value,
            Self::E => registers.e = value,
            Self::H => registers.h = value,
            Self::L => registers.l = value,
        }
    }
}

/// Names of the 16-bit registers and pair views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum WReg {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl WReg {
    pub fn get(self, registers: &Registers) -> u16 {
        match self {
            Self::AF => registers.get_af(),
            Self::BC => registers.get_bc(),
            Self::DE => registers.get_de(),
            Self::HL => registers.get_hl(),
            Self::SP => registers.sp,
            Self::PC => registers.pc,
        }
    }

    pub fn set(self, registers: &mut Registers, value: u16) {
        match self {
            Self::AF => registers.set_af(value),
            Self::BC => registers.set_bc(value),
            Self::DE => registers.set_de(value),
            Self::HL => registers.set_hl(value),
            Self::SP => registers.sp = value,
            Self::PC => registers.pc = value,
        }
    }
}

/// The flag register. Bits 4-7 hold the carry, half-carry, subtract and
/// zero flags; bits 0-3 always read as zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlagRegister {
    /// Set when the result of an operation is zero.
    pub zero: bool,

    /// Set if the last operation was a subtraction.
    pub subtract: bool,

    /// Set if a carry occurred from the lower nibble.
    pub half_carry: bool,

    /// Set if the last operation carried or a rotate shifted a one out.
    pub carry: bool,
}

const ZERO_FLAG_BYTE_POSITION: u8 = 7;
const SUBTRACT_FLAG_BYTE_POSITION: u8 = 6;
const HALF_CARRY_FLAG_BYTE_POSITION: u8 = 5;
const CARRY_FLAG_BYTE_POSITION: u8 = 4;

impl std::convert::From<FlagRegister> for u8 {
    fn from(flag: FlagRegister) -> u8 {
        u8::from(flag.zero) << ZERO_FLAG_BYTE_POSITION
            | u8::from(flag.subtract) << SUBTRACT_FLAG_BYTE_POSITION
            | u8::from(flag.half_carry) << HALF_CARRY_FLAG_BYTE_POSITION
            | u8::from(flag.carry) << CARRY_FLAG_BYTE_POSITION
    }
}

impl std::convert::From<u8> for FlagRegister {
    fn from(byte: u8) -> Self {
        let zero = ((byte >> ZERO_FLAG_BYTE_POSITION) & 0b1) == 1;
        let subtract = ((byte >> SUBTRACT_FLAG_BYTE_POSITION) & 0b1) == 1;
        let half_carry = ((byte >> HALF_CARRY_FLAG_BYTE_POSITION) & 0b1) == 1;
        let carry = ((byte >> CARRY_FLAG_BYTE_POSITION) & 0b1) == 1;

        Self {
            zero,
            subtract,
            half_carry,
            carry,
        }
    }
}
