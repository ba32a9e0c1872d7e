use crate::error::Error;

/// Number of addressable bytes
pub const MEMORY_SIZE: usize = 256;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Interrupt mask (reserved)
pub const IM: usize = 5;
/// Interrupt status (reserved)
pub const IS: usize = 6;
/// Stack pointer (reserved)
pub const SP: usize = 7;

/// Byte addressable main memory.
///
/// Every access is bounds checked, anything outside `0..MEMORY_SIZE`
/// fails with [`Error::AddressOutOfRange`] rather than wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
  cells: [u8; MEMORY_SIZE],
}

impl Memory {
  pub fn new() -> Self {
    Self {
      cells: [0; MEMORY_SIZE],
    }
  }

  pub fn read(&self, address: usize) -> Result<u8, Error> {
    self
      .cells
      .get(address)
      .copied()
      .ok_or(Error::AddressOutOfRange { address })
  }

  pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
    self
      .cells
      .get_mut(address)
      .map(|prev| {
        *prev = value;
      })
      .ok_or(Error::AddressOutOfRange { address })
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.cells
  }
}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}

/// The register file, `R0` through `R7`.
///
/// `R5`, `R6` and `R7` are reserved by convention ([`IM`], [`IS`], [`SP`])
/// but nothing in the instruction set treats them specially.
#[derive(Debug, Clone, PartialEq)]
pub struct Registers {
  cells: [u8; REGISTER_COUNT],
}

impl Registers {
  pub fn new() -> Self {
    Self {
      cells: [0; REGISTER_COUNT],
    }
  }

  pub fn read(&self, index: usize) -> Result<u8, Error> {
    self
      .cells
      .get(index)
      .copied()
      .ok_or(Error::RegisterOutOfRange { index })
  }

  pub fn write(&mut self, index: usize, value: u8) -> Result<(), Error> {
    self
      .cells
      .get_mut(index)
      .map(|prev| {
        *prev = value;
      })
      .ok_or(Error::RegisterOutOfRange { index })
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.cells
  }
}

impl Default for Registers {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod memory {
    use super::*;

    #[test]
    fn new() {
      let memory = Memory::new();
      assert_eq!(memory.as_slice().len(), MEMORY_SIZE);
      assert!(memory.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn write_then_read() {
      let mut memory = Memory::new();
      memory.write(0xFF, 0x2A).unwrap();
      assert_eq!(memory.read(0xFF).unwrap(), 0x2A);
      assert_eq!(memory.read(0xFE).unwrap(), 0);
    }

    #[test]
    fn read_out_of_range() {
      let memory = Memory::new();
      assert!(matches!(
        memory.read(MEMORY_SIZE),
        Err(Error::AddressOutOfRange { address: 256 })
      ));
    }

    #[test]
    fn write_out_of_range_leaves_memory() {
      let mut memory = Memory::new();
      assert!(memory.write(300, 1).is_err());
      assert_eq!(memory, Memory::new());
    }
  }

  mod registers {
    use super::*;

    #[test]
    fn new() {
      let registers = Registers::new();
      assert_eq!(registers.as_slice(), &[0; REGISTER_COUNT]);
      assert_eq!(registers.read(SP).unwrap(), 0);
    }

    #[test]
    fn write_then_read() {
      let mut registers = Registers::new();
      registers.write(3, 7).unwrap();
      assert_eq!(registers.read(3).unwrap(), 7);
    }

    #[test]
    fn out_of_range() {
      let mut registers = Registers::new();
      assert!(matches!(
        registers.read(8),
        Err(Error::RegisterOutOfRange { index: 8 })
      ));
      assert!(matches!(
        registers.write(9, 1),
        Err(Error::RegisterOutOfRange { index: 9 })
      ));
    }
  }
}
