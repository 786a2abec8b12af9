use core::fmt;

use log::{debug, trace};

use crate::component::{Addressable, ElapsedCycles};
use crate::cpu::opcode::{ByteTarget, Entry, Op, OpcodeTable, RotateKind};
use crate::cpu::register::{Reg, Registers};
use crate::error::{Error, Result};

/// The CPU core. Owns the register file and the opcode table; the memory
/// bus is borrowed per step, there is exactly one core per session.
pub struct Cpu {
    pub registers: Registers,
    table: OpcodeTable,
    interrupt_enabled: bool,
    // EI takes effect one instruction late; this carries the delay.
    interrupt_enable_pending: bool,
    halted: bool,
}

impl Cpu {
    pub fn new() -> Result<Cpu> {
        Ok(Cpu {
            registers: Registers::new(),
            table: OpcodeTable::build()?,
            interrupt_enabled: false,
            interrupt_enable_pending: false,
            halted: false,
        })
    }

    /// One fetch-decode-execute step. Returns the machine cycles consumed;
    /// a halted core idles for one cycle per step without touching PC.
    pub fn step(&mut self, bus: &mut impl Addressable) -> Result<ElapsedCycles> {
        if self.halted {
            return Ok(1);
        }

        let enable_after = self.interrupt_enable_pending;
        let opcode = bus.read_u8(self.registers.pc)?;
        let elapsed = self.execute(bus, opcode)?;

        // Commit a pending EI once the instruction after it has run,
        // unless that instruction cancelled it again.
        if enable_after && self.interrupt_enable_pending {
            self.interrupt_enabled = true;
            self.interrupt_enable_pending = false;
        }

        Ok(elapsed)
    }

    /// Executes `opcode` as if it had just been fetched at PC. The direct
    /// entry point for harnesses; `step` is the normal driver.
    pub fn execute(&mut self, bus: &mut impl Addressable, opcode: u8) -> Result<ElapsedCycles> {
        let entry = self.table.entry(opcode);
        self.run_entry(bus, opcode, entry)
    }

    fn run_entry(
        &mut self,
        bus: &mut impl Addressable,
        opcode: u8,
        entry: Entry,
    ) -> Result<ElapsedCycles> {
        // PC at fetch time still points at the opcode byte. Operands live
        // at pc+1 and the call return address is pc + length.
        let pc = self.registers.pc;
        let mut redirected = false;

        match entry.op {
            Op::Illegal => return Err(Error::IllegalOpcode { opcode, pc }),
            Op::Prefix => {
                let cb_opcode = bus.read_u8(pc.wrapping_add(1))?;
                let cb_entry = self.table.cb_entry(cb_opcode);
                return self.run_entry(bus, cb_opcode, cb_entry);
            }
            Op::Nop => {}
            Op::Halt => {
                debug!("halt at {:#06x}", pc);
                self.halted = true;
            }
            Op::LoadReg { dst, src } => {
                let value = src.get(&self.registers);
                dst.set(&mut self.registers, value);
            }
            Op::LoadFromHl { dst } => {
                let value = bus.read_u8(self.registers.get_hl())?;
                dst.set(&mut self.registers, value);
            }
            Op::LoadToHl { src } => {
                let value = src.get(&self.registers);
                bus.write_u8(self.registers.get_hl(), value)?;
            }
            Op::Jump => {
                self.registers.pc = bus.read_u16(pc.wrapping_add(1))?;
                redirected = true;
            }
            Op::Call => {
                let target = bus.read_u16(pc.wrapping_add(1))?;
                let return_address = pc.wrapping_add(entry.length.into());
                self.registers.sp = self.registers.sp.wrapping_sub(2);
                bus.write_u16(self.registers.sp, return_address)?;
                self.registers.pc = target;
                redirected = true;
            }
            Op::Push(pair) => {
                let value = pair.get(&self.registers);
                self.registers.sp = self.registers.sp.wrapping_sub(2);
                bus.write_u16(self.registers.sp, value)?;
            }
            Op::RotateA(kind) => {
                let value = Reg::A.get(&self.registers);
                let result = self.rotate(kind, value);
                Reg::A.set(&mut self.registers, result);
                // The one-byte accumulator rotates never set Z.
                self.registers.f.zero = false;
            }
            Op::Rotate { kind, target } => match target {
                ByteTarget::Register(reg) => {
                    let value = reg.get(&self.registers);
                    let result = self.rotate(kind, value);
                    reg.set(&mut self.registers, result);
                }
                ByteTarget::AtHl => {
                    let address = self.registers.get_hl();
                    let value = bus.read_u8(address)?;
                    let result = self.rotate(kind, value);
                    bus.write_u8(address, result)?;
                }
            },
            Op::DisableInterrupts => {
                self.interrupt_enabled = false;
                self.interrupt_enable_pending = false;
            }
            Op::EnableInterrupts => {
                self.interrupt_enable_pending = true;
            }
        }

        trace!(
            "{:#06x}: {:#04x} {} ({} cycles)",
            pc,
            opcode,
            entry.op.as_ref(),
            entry.cycles
        );

        if !redirected {
            self.registers.pc = pc.wrapping_add(entry.length.into());
        }

        Ok(entry.cycles)
    }

    /// Rotate/shift a byte one position and set all four flags. Z comes
    /// from the result here; `RotateA` overrides it afterwards.
    fn rotate(&mut self, kind: RotateKind, value: u8) -> u8 {
        let carry_in: u8 = self.registers.f.carry.into();
        let (result, carry_out) = match kind {
            RotateKind::Rlc => ((value << 1) | (value >> 7), value >> 7),
            RotateKind::Rrc => ((value >> 1) | (value << 7), value & 1),
            RotateKind::Rl => ((value << 1) | carry_in, value >> 7),
            RotateKind::Rr => ((value >> 1) | (carry_in << 7), value & 1),
            RotateKind::Sla => (value << 1, value >> 7),
            RotateKind::Sra => ((value >> 1) | (value & 0x80), value & 1),
            RotateKind::Swap => (value.rotate_left(4), 0),
            RotateKind::Srl => (value >> 1, value & 1),
        };

        self.registers.f.zero = result == 0;
        self.registers.f.subtract = false;
        self.registers.f.half_carry = false;
        self.registers.f.carry = carry_out == 1;

        result
    }

    /// Master interrupt-enable flag, for collaborators gating delivery.
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Host-level stop request; equivalent to executing HALT.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn resume(&mut self) {
        self.halted = false;
    }

    pub fn debug_info(&self) -> CpuDebugInfo {
        CpuDebugInfo {
            pc: self.registers.pc,
            sp: self.registers.sp,
            register_a: self.registers.a,
            register_f: [
                self.registers.f.zero,
                self.registers.f.subtract,
                self.registers.f.half_carry,
                self.registers.f.carry,
            ],
            register_bc: self.registers.get_bc(),
            register_de: self.registers.get_de(),
            register_hl: self.registers.get_hl(),
            interrupt_enabled: self.interrupt_enabled,
            halted: self.halted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CpuDebugInfo {
    pub pc: u16,
    pub sp: u16,
    pub register_a: u8,
    pub register_f: [bool; 4],
    pub register_bc: u16,
    pub register_de: u16,
    pub register_hl: u16,
    pub interrupt_enabled: bool,
    pub halted: bool,
}

impl fmt::Display for CpuDebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pc: {:04x}, sp: {:04x}, A: {:02x}, F: {}{}{}{}, BC: {:04x}, DE: {:04x}, HL: {:04x}, ime: {}, halted: {}",
            self.pc,
            self.sp,
            self.register_a,
            if self.register_f[0] { 'Z' } else { '-' },
            if self.register_f[1] { 'N' } else { '-' },
            if self.register_f[2] { 'H' } else { '-' },
            if self.register_f[3] { 'C' } else { '-' },
            self.register_bc,
            self.register_de,
            self.register_hl,
            self.interrupt_enabled,
            self.halted,
        )
    }
}
