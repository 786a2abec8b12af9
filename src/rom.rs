use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::memory::FlatMemory;

const TITLE_RANGE: std::ops::Range<usize> = 0x134..0x144;

/// A raw ROM image. Produces the initial memory image for the CPU core;
/// cartridge headers and banking schemes are not interpreted here beyond
/// the title bytes.
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    pub fn from_bytes(data: &[u8]) -> Result<Rom> {
        if data.is_empty() {
            return Err(Error::Rom("empty rom image".to_string()));
        }
        Ok(Rom {
            data: data.to_vec(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Rom> {
        let data = fs::read(path).map_err(|e| Error::Rom(e.to_string()))?;
        Rom::from_bytes(&data)
    }

    /// Title from the header, for display only. Empty for images too short
    /// to carry a header.
    pub fn title(&self) -> String {
        match self.data.get(TITLE_RANGE) {
            Some(bytes) => bytes
                .iter()
                .take_while(|&&b| b != 0)
                .map(|&b| char::from(b))
                .collect(),
            None => String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maps the image into the bottom of the address space.
    pub fn map_into(&self, memory: &mut FlatMemory) {
        memory.load(0, &self.data);
        info!("mapped {} byte rom image", self.data.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Addressable;

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(Rom::from_bytes(&[]), Err(Error::Rom(_))));
    }

    #[test]
    fn title_is_read_from_header() {
        let mut data = vec![0; 0x150];
        data[0x134..0x134 + 4].copy_from_slice(b"ZETA");
        let rom = Rom::from_bytes(&data).unwrap();
        assert_eq!(rom.title(), "ZETA");
    }

    #[test]
    fn map_into_places_image_at_zero() {
        let rom = Rom::from_bytes(&[0x01, 0x02, 0x03]).unwrap();
        let mut memory = FlatMemory::new();
        rom.map_into(&mut memory);
        assert_eq!(memory.read_u8(0x0000).unwrap(), 0x01);
        assert_eq!(memory.read_u8(0x0002).unwrap(), 0x03);
    }
}
