use std::path::PathBuf;

use emulator::error::Error;
use emulator::program::Program;
use emulator::vm::Vm;

fn demo(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("demos")
    .join(name)
}

fn run(name: &str) -> String {
  let program = Program::from_path(demo(name)).unwrap();
  let mut vm = Vm::new();
  vm.load(&program).unwrap();
  let mut out: Vec<u8> = Vec::new();
  vm.run(&mut out).unwrap();
  assert!(vm.is_halted());
  String::from_utf8(out).unwrap()
}

#[test]
fn mult() {
  assert_eq!(run("mult.ls8"), "72\n");
}

#[test]
fn print8() {
  assert_eq!(run("print8.ls8"), "8\n");
}

#[test]
fn missing_demo() {
  let err = Program::from_path(demo("missing.ls8")).unwrap_err();
  match err {
    Error::ProgramNotFound { path, .. } => assert!(path.ends_with("missing.ls8")),
    other => panic!("unexpected error: {other}"),
  }
}
