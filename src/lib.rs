//! An emulator for the LS-8, a tiny 8-bit computer
//!
//! 256 bytes of memory, eight registers, and a handful of instructions
//! loaded from a text file of binary literals.

pub mod error;
pub mod memory;
pub mod opcode;
pub mod program;
pub mod vm;
