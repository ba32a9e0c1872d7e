use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::Error;
use crate::memory::{Memory, Registers, MEMORY_SIZE};
use crate::opcode::{self, Opcode};
use crate::program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Running,
  Halted,
}

/// Operations the ALU knows how to perform, named the way callers ask for
/// them (`"ADD"`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  /// `r[a] ← r[a] + r[b]`, wrapping at 8 bits
  Add,
}

impl FromStr for AluOp {
  type Err = Error;

  fn from_str(name: &str) -> Result<Self, Self::Err> {
    match name {
      "ADD" => Ok(Self::Add),
      other => Err(Error::UnsupportedOperation(other.to_string())),
    }
  }
}

/// An LS-8 virtual machine: 256 bytes of memory, eight 8-bit registers and
/// a program counter.
///
/// Everything the machine does happens through `&mut self`; there is no
/// shared state, so independent machines can run side by side.
#[derive(Debug)]
pub struct Vm {
  // address of the next opcode byte to fetch
  pc: usize,
  memory: Memory,
  registers: Registers,
  state: State,
}

impl Vm {
  /// Create a new, empty virtual machine
  pub fn new() -> Self {
    Self {
      pc: 0,
      memory: Memory::new(),
      registers: Registers::new(),
      state: State::Running,
    }
  }

  /// Copy a program image into memory, starting at address 0
  pub fn load(&mut self, program: &Program) -> Result<(), Error> {
    for (address, &byte) in program.bytes().iter().enumerate() {
      self.memory.write(address, byte)?;
    }
    log::debug!("loaded {} bytes into memory", program.len());
    Ok(())
  }

  /// Parse program text and load it, see [`Program::parse`]
  pub fn load_str(&mut self, text: &str) -> Result<(), Error> {
    self.load(&Program::parse(text))
  }

  /// Run until the machine halts, writing `PRN` output to `out`
  pub fn run<W>(&mut self, out: &mut W) -> Result<(), Error>
  where
    W: Write,
  {
    while self.state == State::Running {
      self.step(out)?;
    }
    Ok(())
  }

  /// Step through a single instruction
  pub fn step<W>(&mut self, out: &mut W) -> Result<(), Error>
  where
    W: Write,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    let mut task = Task::new(self, out);
    task.run()
  }

  /// Perform `op` on registers `reg_a` and `reg_b`, storing into `reg_a`.
  ///
  /// Unknown operations fail before any register is touched.
  pub fn alu(&mut self, op: &str, reg_a: usize, reg_b: usize) -> Result<(), Error> {
    match op.parse::<AluOp>()? {
      AluOp::Add => {
        let a = self.registers.read(reg_a)?;
        let b = self.registers.read(reg_b)?;
        self.registers.write(reg_a, a.wrapping_add(b))
      }
    }
  }

  /// A snapshot of the pc, the next three bytes and every register
  pub fn trace(&self) -> Trace<'_> {
    Trace { vm: self }
  }

  pub fn read_memory(&self, address: usize) -> Result<u8, Error> {
    self.memory.read(address)
  }

  pub fn write_memory(&mut self, address: usize, value: u8) -> Result<(), Error> {
    self.memory.write(address, value)
  }

  pub fn read_register(&self, index: usize) -> Result<u8, Error> {
    self.registers.read(index)
  }

  pub fn write_register(&mut self, index: usize, value: u8) -> Result<(), Error> {
    self.registers.write(index, value)
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn registers(&self) -> &Registers {
    &self.registers
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}

/// Formats as `TRACE: PC | M[PC] M[PC+1] M[PC+2] | R0 .. R7`, every value as
/// two hex digits. Bytes past the end of memory show as `--`.
pub struct Trace<'vm> {
  vm: &'vm Vm,
}

impl fmt::Display for Trace<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TRACE: {:02X} |", self.vm.pc)?;
    for offset in 0..3 {
      match self.vm.memory.as_slice().get(self.vm.pc + offset) {
        Some(byte) => write!(f, " {byte:02X}")?,
        None => write!(f, " --")?,
      }
    }
    write!(f, " |")?;
    for value in self.vm.registers.as_slice() {
      write!(f, " {value:02X}")?;
    }
    Ok(())
  }
}

struct Task<'vm, 'out, W> {
  vm: &'vm mut Vm,
  out: &'out mut W,
}

impl<'vm, 'out, W> Task<'vm, 'out, W>
where
  W: Write,
{
  fn new(vm: &'vm mut Vm, out: &'out mut W) -> Self {
    Self { vm, out }
  }

  /// The byte `offset` past the opcode, as an index
  #[inline]
  fn operand(&self, offset: usize) -> Result<usize, Error> {
    Ok(self.vm.memory.read(self.vm.pc + offset)? as usize)
  }

  // any pc at or past the last address goes back to 0
  fn advance(&mut self) {
    if self.vm.pc >= MEMORY_SIZE - 1 {
      self.vm.pc = 0;
    } else {
      self.vm.pc += 1;
    }
  }

  fn run(&mut self) -> Result<(), Error> {
    let pc = self.vm.pc;
    let byte = self.vm.memory.read(pc)?;
    let op = opcode::decode(byte, pc).inspect_err(|e| log::debug!("{e}"))?;
    log::trace!("{pc:#04X}: {}", op.mnemonic());
    match op {
      Opcode::Nop => nop(self)?,
      Opcode::Hlt => hlt(self)?,
      Opcode::Prn => prn(self)?,
      Opcode::Ldi => ldi(self)?,
      Opcode::Mul => mul(self)?,
      Opcode::Push => {
        log::debug!("{} at {pc:#04X} has no implementation", op.mnemonic());
        return Err(Error::UnknownInstruction {
          opcode: byte,
          address: pc,
        });
      }
    }
    self.advance();
    Ok(())
  }
}

// (do nothing)
fn nop<W>(_task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  Ok(())
}

// (stop execution)
fn hlt<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  task.vm.state = State::Halted;
  Ok(())
}

// out ← r[a]
fn prn<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.operand(1)?;
  let value = task.vm.registers.read(a)?;
  writeln!(task.out, "{value}")?;
  task.vm.pc += 1;
  Ok(())
}

// r[a] ← b
fn ldi<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let a = task.operand(1)?;
  let b = task.vm.memory.read(task.vm.pc + 2)?;
  task.vm.registers.write(a, b)?;
  task.vm.pc += 2;
  Ok(())
}

// r[a] ← r[a] × r[b]
fn mul<W>(task: &mut Task<'_, '_, W>) -> Result<(), Error>
where
  W: Write,
{
  let reg_a = task.vm.registers.read(task.operand(1)?)?;
  let reg_b = task.vm.registers.read(task.operand(2)?)?;
  // destination index is fetched again, not reused
  let d = task.operand(1)?;
  task.vm.registers.write(d, reg_a.wrapping_mul(reg_b))?;
  task.vm.pc += 2;
  Ok(())
}
