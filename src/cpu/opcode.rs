/*!
 * The opcode table: a fixed 256-entry map from opcode byte to a typed
 * instruction shape, plus a second table for the 0xCB-prefixed space.
 * Each instruction family is installed by its own routine; installing
 * into an already-claimed slot is a construction-time error.
 */

use strum_macros::{AsRefStr, IntoStaticStr};

use crate::cpu::register::{Reg, WReg};
use crate::error::{Error, Result};

/// Direction and carry behaviour of the rotate/shift family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateKind {
    /// Rotate left, bit 7 into both carry and bit 0.
    Rlc,
    /// Rotate right, bit 0 into both carry and bit 7.
    Rrc,
    /// Rotate left through carry.
    Rl,
    /// Rotate right through carry.
    Rr,
    /// Shift left, bit 0 cleared.
    Sla,
    /// Arithmetic shift right, bit 7 kept.
    Sra,
    /// Exchange the nibbles.
    Swap,
    /// Logical shift right, bit 7 cleared.
    Srl,
}

/// An 8-bit operand location: a named register or the byte at (HL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteTarget {
    Register(Reg),
    AtHl,
}

/// Typed instruction shapes. One `Op` plus its operands fully determines a
/// handler's effect on the register file, the bus and the interrupt flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
pub enum Op {
    Nop,
    Halt,
    /// Copy one 8-bit register into another.
    LoadReg { dst: Reg, src: Reg },
    /// Load a register from the byte at the address in HL.
    LoadFromHl { dst: Reg },
    /// Store a register to the byte at the address in HL.
    LoadToHl { src: Reg },
    /// Unconditional jump to the immediate 16-bit address.
    Jump,
    /// Push the return address and jump to the immediate 16-bit address.
    Call,
    /// Push a register pair onto the stack.
    Push(WReg),
    /// Rotate the accumulator; zero flag forced clear.
    RotateA(RotateKind),
    /// Rotate or shift a register or (HL) byte, from the 0xCB space.
    Rotate { kind: RotateKind, target: ByteTarget },
    DisableInterrupts,
    EnableInterrupts,
    /// The 0xCB prefix byte; dispatches into the second table.
    Prefix,
    /// Unpopulated slot. Executing it is a reported fault, never a no-op.
    Illegal,
}

/// One table slot: the shape, the encoded length in bytes and the cost in
/// machine cycles. For 0xCB-space entries the length and cycles cover the
/// whole two-byte instruction.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub op: Op,
    pub length: u8,
    pub cycles: u8,
}

const ILLEGAL: Entry = Entry {
    op: Op::Illegal,
    length: 1,
    cycles: 0,
};

pub struct OpcodeTable {
    base: [Entry; 256],
    cb: [Entry; 256],
}

impl OpcodeTable {
    /// Populates both tables family by family. Every slot left unclaimed
    /// stays `Illegal`, so lookup is total.
    pub fn build() -> Result<OpcodeTable> {
        let mut table = OpcodeTable {
            base: [ILLEGAL; 256],
            cb: [ILLEGAL; 256],
        };
        table.install_control_ops()?;
        table.install_load_ops()?;
        table.install_jump_ops()?;
        table.install_call_ops()?;
        table.install_stack_ops()?;
        table.install_rotate_ops()?;
        table.install_interrupt_ops()?;
        Ok(table)
    }

    pub fn entry(&self, opcode: u8) -> Entry {
        self.base[usize::from(opcode)]
    }

    pub fn cb_entry(&self, opcode: u8) -> Entry {
        self.cb[usize::from(opcode)]
    }

    /// Claims a slot. Fails if another family already holds it.
    fn install(&mut self, opcode: u8, entry: Entry) -> Result<()> {
        Self::claim(&mut self.base, opcode, entry)
    }

    fn install_cb(&mut self, opcode: u8, entry: Entry) -> Result<()> {
        Self::claim(&mut self.cb, opcode, entry)
    }

    fn claim(slots: &mut [Entry; 256], opcode: u8, entry: Entry) -> Result<()> {
        let slot = &mut slots[usize::from(opcode)];
        if slot.op != Op::Illegal {
            return Err(Error::OpcodeConflict {
                opcode,
                installed: slot.op.into(),
                new: entry.op.into(),
            });
        }
        *slot = entry;
        Ok(())
    }

    /// Overwrites a slot unconditionally. The intentional-override escape
    /// hatch; `install` is what family installers use.
    pub fn replace(&mut self, opcode: u8, entry: Entry) {
        self.base[usize::from(opcode)] = entry;
    }

    fn install_control_ops(&mut self) -> Result<()> {
        self.install(
            0x00,
            Entry {
                op: Op::Nop,
                length: 1,
                cycles: 1,
            },
        )?;
        self.install(
            0x76,
            Entry {
                op: Op::Halt,
                length: 1,
                cycles: 1,
            },
        )
    }

    /// The 0x40-0x7F load block: LD r,r', LD r,(HL) and LD (HL),r laid out
    /// on an 8x8 grid of operands. The (HL),(HL) cell is HALT and belongs
    /// to the control family.
    fn install_load_ops(&mut self) -> Result<()> {
        const OPERANDS: [Option<Reg>; 8] = [
            Some(Reg::B),
            Some(Reg::C),
            Some(Reg::D),
            Some(Reg::E),
            Some(Reg::H),
            Some(Reg::L),
            None, // (HL)
            Some(Reg::A),
        ];

        for (row, dst) in OPERANDS.iter().enumerate() {
            for (col, src) in OPERANDS.iter().enumerate() {
                let opcode = 0x40 + (row * 8 + col) as u8;
                let entry = match (dst, src) {
                    (Some(dst), Some(src)) => Entry {
                        op: Op::LoadReg {
                            dst: *dst,
                            src: *src,
                        },
                        length: 1,
                        cycles: 1,
                    },
                    (Some(dst), None) => Entry {
                        op: Op::LoadFromHl { dst: *dst },
                        length: 1,
                        cycles: 2,
                    },
                    (None, Some(src)) => Entry {
                        op: Op::LoadToHl { src: *src },
                        length: 1,
                        cycles: 2,
                    },
                    (None, None) => continue,
                };
                self.install(opcode, entry)?;
            }
        }
        Ok(())
    }

    fn install_jump_ops(&mut self) -> Result<()> {
        self.install(
            0xC3,
            Entry {
                op: Op::Jump,
                length: 3,
                cycles: 4,
            },
        )
    }

    fn install_call_ops(&mut self) -> Result<()> {
        self.install(
            0xCD,
            Entry {
                op: Op::Call,
                length: 3,
                cycles: 6,
            },
        )
    }

    fn install_stack_ops(&mut self) -> Result<()> {
        for (opcode, pair) in [
            (0xC5, WReg::BC),
            (0xD5, WReg::DE),
            (0xE5, WReg::HL),
            (0xF5, WReg::AF),
        ] {
            self.install(
                opcode,
                Entry {
                    op: Op::Push(pair),
                    length: 1,
                    cycles: 4,
                },
            )?;
        }
        Ok(())
    }

    fn install_rotate_ops(&mut self) -> Result<()> {
        for (opcode, kind) in [
            (0x07, RotateKind::Rlc),
            (0x0F, RotateKind::Rrc),
            (0x17, RotateKind::Rl),
            (0x1F, RotateKind::Rr),
        ] {
            self.install(
                opcode,
                Entry {
                    op: Op::RotateA(kind),
                    length: 1,
                    cycles: 1,
                },
            )?;
        }

        self.install(
            0xCB,
            Entry {
                op: Op::Prefix,
                length: 1,
                cycles: 1,
            },
        )?;

        // CB 0x00-0x3F: eight rows of eight operand columns.
        const KINDS: [RotateKind; 8] = [
            RotateKind::Rlc,
            RotateKind::Rrc,
            RotateKind::Rl,
            RotateKind::Rr,
            RotateKind::Sla,
            RotateKind::Sra,
            RotateKind::Swap,
            RotateKind::Srl,
        ];
        const TARGETS: [ByteTarget; 8] = [
            ByteTarget::Register(Reg::B),
            ByteTarget::Register(Reg::C),
            ByteTarget::Register(Reg::D),
            ByteTarget::Register(Reg::E),
            ByteTarget::Register(Reg::H),
            ByteTarget::Register(Reg::L),
            ByteTarget::AtHl,
            ByteTarget::Register(Reg::A),
        ];

        for (row, kind) in KINDS.iter().enumerate() {
            for (col, target) in TARGETS.iter().enumerate() {
                let opcode = (row * 8 + col) as u8;
                let cycles = match target {
                    ByteTarget::AtHl => 4,
                    ByteTarget::Register(_) => 2,
                };
                self.install_cb(
                    opcode,
                    Entry {
                        op: Op::Rotate {
                            kind: *kind,
                            target: *target,
                        },
                        length: 2,
                        cycles,
                    },
                )?;
            }
        }
        Ok(())
    }

    fn install_interrupt_ops(&mut self) -> Result<()> {
        self.install(
            0xF3,
            Entry {
                op: Op::DisableInterrupts,
                length: 1,
                cycles: 1,
            },
        )?;
        self.install(
            0xFB,
            Entry {
                op: Op::EnableInterrupts,
                length: 1,
                cycles: 1,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_succeeds_without_conflicts() {
        OpcodeTable::build().unwrap();
    }

    #[test]
    fn load_block_is_fully_populated() {
        let table = OpcodeTable::build().unwrap();
        for opcode in 0x40..=0x7F {
            let entry = table.entry(opcode);
            if opcode == 0x76 {
                assert_eq!(entry.op, Op::Halt);
            } else {
                assert!(
                    matches!(
                        entry.op,
                        Op::LoadReg { .. } | Op::LoadFromHl { .. } | Op::LoadToHl { .. }
                    ),
                    "opcode {:#04x} resolved to {:?}",
                    opcode,
                    entry.op
                );
            }
        }
    }

    #[test]
    fn memory_indirect_load_sits_next_to_its_register_variant() {
        let table = OpcodeTable::build().unwrap();
        assert_eq!(table.entry(0x46).op, Op::LoadFromHl { dst: Reg::B });
        assert_eq!(
            table.entry(0x47).op,
            Op::LoadReg {
                dst: Reg::B,
                src: Reg::A
            }
        );
    }

    #[test]
    fn push_variants_occupy_distinct_slots() {
        let table = OpcodeTable::build().unwrap();
        assert_eq!(table.entry(0xC5).op, Op::Push(WReg::BC));
        assert_eq!(table.entry(0xD5).op, Op::Push(WReg::DE));
        assert_eq!(table.entry(0xE5).op, Op::Push(WReg::HL));
        assert_eq!(table.entry(0xF5).op, Op::Push(WReg::AF));
    }

    #[test]
    fn every_slot_resolves_to_a_defined_action() {
        let table = OpcodeTable::build().unwrap();
        for opcode in 0..=0xFF {
            // Illegal is itself a defined action; no slot may carry a zero
            // cycle count unless it is Illegal.
            let entry = table.entry(opcode);
            assert!(entry.op == Op::Illegal || entry.cycles > 0);
            let cb = table.cb_entry(opcode);
            assert!(cb.op == Op::Illegal || cb.cycles > 0);
        }
    }

    #[test]
    fn duplicate_install_is_rejected() {
        let mut table = OpcodeTable::build().unwrap();
        let result = table.install(
            0xC3,
            Entry {
                op: Op::Nop,
                length: 1,
                cycles: 1,
            },
        );
        assert_eq!(
            result,
            Err(Error::OpcodeConflict {
                opcode: 0xC3,
                installed: "Jump",
                new: "Nop",
            })
        );
    }

    #[test]
    fn replace_overrides_deliberately() {
        let mut table = OpcodeTable::build().unwrap();
        table.replace(
            0xC3,
            Entry {
                op: Op::Nop,
                length: 1,
                cycles: 1,
            },
        );
        assert_eq!(table.entry(0xC3).op, Op::Nop);
    }

    #[test]
    fn cb_space_covers_rotates_only() {
        let table = OpcodeTable::build().unwrap();
        for opcode in 0x00..=0x3F {
            assert!(matches!(table.cb_entry(opcode).op, Op::Rotate { .. }));
        }
        for opcode in 0x40..=0xFF {
            assert_eq!(table.cb_entry(opcode).op, Op::Illegal);
        }
    }
}
