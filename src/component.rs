use crate::error::Result;

/// Number of machine cycles consumed by one instruction step.
pub type ElapsedCycles = u8;

/// Byte-addressable memory capability over the 16-bit address space.
///
/// The CPU core holds no bus of its own; one is passed in at each step.
/// Word accesses are little-endian: low byte at `address`, high byte at
/// `address + 1`.
pub trait Addressable {
    fn read_u8(&mut self, address: u16) -> Result<u8>;

    fn write_u8(&mut self, address: u16, data: u8) -> Result<()>;

    fn read_u16(&mut self, address: u16) -> Result<u16> {
        let bytes = [
            self.read_u8(address)?,
            self.read_u8(address.wrapping_add(1))?,
        ];
        Ok(u16::from_le_bytes(bytes))
    }

    fn write_u16(&mut self, address: u16, data: u16) -> Result<()> {
        let bytes = data.to_le_bytes();
        self.write_u8(address, bytes[0])?;
        self.write_u8(address.wrapping_add(1), bytes[1])
    }
}
