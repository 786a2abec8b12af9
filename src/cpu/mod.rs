mod cpu;
pub mod opcode;
pub mod register;

pub use cpu::{Cpu, CpuDebugInfo};
pub use opcode::{Op, OpcodeTable};
pub use register::{FlagRegister, Reg, Registers, WReg};
