use crate::error::Error;

/// The instruction table.
///
/// Operands follow the opcode byte in memory, `a` at `pc + 1` and `b` at
/// `pc + 2`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// Does nothing.
  ///
  /// | Operation | Semantics/RTL  | Assembly |
  /// |-----------|----------------|----------|
  /// | No-op     | `(do nothing)` | `NOP`    |
  Nop = 0b0000_0000,

  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Hlt = 0b0000_0001,

  /// Reserved. Decodes, but the machine has no stack so it never
  /// executes.
  ///
  /// | Operation | Semantics/RTL     | Assembly  |
  /// |-----------|-------------------|-----------|
  /// | Push      | `(unimplemented)` | `PUSH ra` |
  Push = 0b0100_0101,

  /// Prints a register as a decimal number on its own line.
  ///
  /// | Operation | Semantics/RTL   | Assembly |
  /// |-----------|-----------------|----------|
  /// | Print     | `out ← r[a]`    | `PRN ra` |
  Prn = 0b0100_0111,

  /// | Operation      | Semantics/RTL | Assembly     |
  /// |----------------|---------------|--------------|
  /// | Load Immediate | `r[a] ← b`    | `LDI ra, $b` |
  Ldi = 0b1000_0010,

  /// Multiplies two registers, truncating the product to 8 bits.
  ///
  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Multiply  | `r[a] ← r[a] × r[b]` | `MUL ra, rb` |
  Mul = 0b1010_0010,
}

impl Opcode {
  pub const ALL: [Opcode; 6] = [
    Self::Nop,
    Self::Hlt,
    Self::Push,
    Self::Prn,
    Self::Ldi,
    Self::Mul,
  ];

  pub fn mnemonic(self) -> &'static str {
    match self {
      Self::Nop => "NOP",
      Self::Hlt => "HLT",
      Self::Push => "PUSH",
      Self::Prn => "PRN",
      Self::Ldi => "LDI",
      Self::Mul => "MUL",
    }
  }
}

impl From<Opcode> for u8 {
  fn from(op: Opcode) -> Self {
    op as u8
  }
}

/// Decoding needs the address the byte was fetched from so failures can
/// report it.
pub fn decode(byte: u8, address: usize) -> Result<Opcode, Error> {
  Opcode::ALL
    .into_iter()
    .find(|&op| u8::from(op) == byte)
    .ok_or(Error::UnknownInstruction {
      opcode: byte,
      address,
    })
}
