use std::io;
use std::path::PathBuf;

/// An error that occurred while loading or executing a program
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("{} not found", .path.display())]
  ProgramNotFound {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("unsupported ALU operation `{0}`")]
  UnsupportedOperation(String),

  #[error("unknown instruction {opcode:#04X} at address {address:#04X}")]
  UnknownInstruction { opcode: u8, address: usize },

  #[error("memory address {address:#X} is out of range")]
  AddressOutOfRange { address: usize },

  #[error("register index {index} is out of range")]
  RegisterOutOfRange { index: usize },

  #[error("machine is halted")]
  MachineHalted,

  #[error("failed to write program output")]
  Io(#[from] io::Error),
}
