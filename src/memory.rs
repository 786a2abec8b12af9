/*!
 * Flat memory bus: the whole 16-bit address space backed by one byte array.
 * Banking and memory-mapped components are a concern for richer bus
 * implementations; the CPU core only sees the `Addressable` trait.
 */

use crate::component::Addressable;
use crate::error::Result;

pub struct FlatMemory {
    data: Box<[u8; 0x10000]>,
}

impl FlatMemory {
    pub fn new() -> Self {
        FlatMemory {
            data: Box::new([0; 0x10000]),
        }
    }

    /// Copies `bytes` into the address space starting at `offset`,
    /// truncating anything that runs past 0xFFFF.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) {
        let start = usize::from(offset);
        let len = bytes.len().min(self.data.len() - start);
        self.data[start..start + len].copy_from_slice(&bytes[..len]);
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Addressable for FlatMemory {
    fn read_u8(&mut self, address: u16) -> Result<u8> {
        Ok(self.data[usize::from(address)])
    }

    fn write_u8(&mut self, address: u16, data: u8) -> Result<()> {
        self.data[usize::from(address)] = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trip_is_little_endian() {
        let mut memory = FlatMemory::new();
        memory.write_u16(0xC000, 0x1234).unwrap();
        assert_eq!(memory.read_u8(0xC000).unwrap(), 0x34);
        assert_eq!(memory.read_u8(0xC001).unwrap(), 0x12);
        assert_eq!(memory.read_u16(0xC000).unwrap(), 0x1234);
    }

    #[test]
    fn load_truncates_at_end_of_address_space() {
        let mut memory = FlatMemory::new();
        memory.load(0xFFFE, &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(memory.read_u8(0xFFFE).unwrap(), 0xAA);
        assert_eq!(memory.read_u8(0xFFFF).unwrap(), 0xBB);
        assert_eq!(memory.read_u8(0x0000).unwrap(), 0x00);
    }
}
