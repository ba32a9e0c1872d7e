use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use emulator::error::Error;
use emulator::program::Program;
use emulator::vm::Vm;

#[derive(Parser, Debug)]
#[command(name = "ls8", about = "Run a program on the LS-8 emulator")]
struct Args {
  /// Program image, one binary byte per line.
  program: PathBuf,

  /// Print the machine state to stderr before every instruction.
  #[arg(long, default_value_t = false)]
  trace: bool,

  /// More log output (-v for debug, -vv for every instruction).
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
  let args = Args::parse();
  let level = match args.verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  SimpleLogger::new().with_level(level).env().init()?;

  let stdout = io::stdout();
  let mut out = stdout.lock();
  match execute(&args, &mut out) {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(err) => {
      out.flush()?;
      eprintln!("{}", diagnostic(&err));
      Ok(ExitCode::from(exit_status(&err)))
    }
  }
}

fn execute<W>(args: &Args, out: &mut W) -> Result<(), Error>
where
  W: Write,
{
  let program = Program::from_path(&args.program)?;
  if program.is_empty() {
    log::warn!("{} holds no instructions", args.program.display());
  }
  let mut vm = Vm::new();
  vm.load(&program)?;
  if args.trace {
    while !vm.is_halted() {
      eprintln!("{}", vm.trace());
      vm.step(out)?;
    }
  } else {
    vm.run(out)?;
  }
  out.flush()?;
  Ok(())
}

fn diagnostic(err: &Error) -> String {
  match err {
    Error::UnknownInstruction { opcode, .. } => format!("Unknown instruction: {opcode}"),
    _ => format!("ls8: {err}"),
  }
}

// load failures and bad instructions must stay distinguishable
fn exit_status(err: &Error) -> u8 {
  match err {
    Error::ProgramNotFound { .. } => 2,
    _ => 1,
  }
}
