use std::fs;
use std::path::Path;

use crate::error::Error;

/// A `Program` is the byte image placed into memory before execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
  bytes: Vec<u8>,
}

impl Program {
  /// Parse a program image, one base-2 literal per line.
  ///
  /// Anything after a `#` is a comment. Lines that don't hold a binary
  /// literal once comments and whitespace are stripped are skipped and take
  /// no address. Literals wider than a byte keep their low 8 bits.
  pub fn parse(text: &str) -> Self {
    let bytes = text
      .lines()
      .filter_map(|line| parse_byte(line.split('#').next().unwrap_or_default().trim()))
      .collect();
    Self { bytes }
  }

  /// Read and parse a program image from disk
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::ProgramNotFound {
      path: path.to_path_buf(),
      source,
    })?;
    let program = Self::parse(&text);
    log::debug!("read {} bytes from {}", program.len(), path.display());
    Ok(program)
  }

  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

/// A base-2 literal: optional `+`, optional `0b`/`0B`, then digits with
/// single `_` separators between them (or right after the prefix).
///
/// Digits are folded into a byte as they come, so any width keeps its low
/// 8 bits.
fn parse_byte(code: &str) -> Option<u8> {
  let code = code.strip_prefix('+').unwrap_or(code);
  let (digits, prefixed) = match code
    .strip_prefix("0b")
    .or_else(|| code.strip_prefix("0B"))
  {
    Some(rest) => (rest, true),
    None => (code, false),
  };
  let mut value: u8 = 0;
  let mut any = false;
  let mut underscore_ok = prefixed;
  for c in digits.chars() {
    match c {
      '0' | '1' => {
        value = value << 1 | u8::from(c == '1');
        any = true;
        underscore_ok = true;
      }
      '_' if underscore_ok => underscore_ok = false,
      _ => return None,
    }
  }
  // a trailing `_` leaves underscore_ok unset
  (any && underscore_ok).then_some(value)
}

impl From<Vec<u8>> for Program {
  fn from(bytes: Vec<u8>) -> Self {
    Self { bytes }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_mult() {
    let text = "\
# mult.ls8
10000010 # LDI R0,8
00000000
00001000
10000010 # LDI R1,9
00000001
00001001
10100010 # MUL R0,R1
00000000
00000001
01000111 # PRN R0
00000000
00000001 # HLT
";
    let program = Program::parse(text);
    assert_eq!(
      program.bytes(),
      &[0x82, 0x00, 0x08, 0x82, 0x01, 0x09, 0xA2, 0x00, 0x01, 0x47, 0x00, 0x01]
    );
  }

  #[test]
  fn parse_comments_and_blanks() {
    let program = Program::parse("# nothing here\n\n   \n#10000010\n\t# 1\n");
    assert!(program.is_empty());
  }

  #[test]
  fn parse_skips_non_binary() {
    let program = Program::parse("00000001\nhello\n12\n  00000010  \n");
    assert_eq!(program.bytes(), &[0x01, 0x02]);
  }

  #[test]
  fn parse_truncates_wide_literals() {
    let program = Program::parse("100000001\n");
    assert_eq!(program.bytes(), &[0x01]);
  }

  #[test]
  fn parse_truncates_literals_wider_than_u64() {
    let text = format!("1{}1\n00000010\n", "0".repeat(64));
    let program = Program::parse(&text);
    assert_eq!(program.bytes(), &[0x01, 0x02]);
  }

  #[test]
  fn parse_prefixed_literals() {
    let program = Program::parse("0b00000001\n0B101\n+0b_11\n00000010\n");
    assert_eq!(program.bytes(), &[0x01, 0x05, 0x03, 0x02]);
  }

  #[test]
  fn parse_underscore_separators() {
    let program = Program::parse("0000_0001 # LDI\n1000_0010\n");
    assert_eq!(program.bytes(), &[0x01, 0x82]);
  }

  #[test]
  fn parse_rejects_malformed_literals() {
    let program = Program::parse("0b\n_1\n1_\n1__0\n-1\n0b2\n00000011\n");
    assert_eq!(program.bytes(), &[0x03]);
  }

  #[test]
  fn from_path_missing() {
    let err = Program::from_path("definitely/not/here.ls8").unwrap_err();
    assert!(matches!(err, Error::ProgramNotFound { .. }));
    assert_eq!(err.to_string(), "definitely/not/here.ls8 not found");
  }

  #[test]
  fn from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("ls8-program-{}.ls8", std::process::id()));
    fs::write(&path, "10000010\n00000000\n00000101\n00000001\n").unwrap();
    let program = Program::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(program.bytes(), &[0x82, 0x00, 0x05, 0x01]);
  }
}
