mod component;
mod error;

pub mod cpu;
pub mod memory;
pub mod rom;

pub use component::{Addressable, ElapsedCycles};
pub use error::{Error, Result};
pub use memory::FlatMemory;
pub use rom::Rom;
