//! JSON line I/O
//!
//! - Input: one invocation object per line
//! - Output: one response object per line
//! - UTF-8 only; a line that is not UTF-8 is reported, not fatal
//! - stdout carries nothing but responses

use std::io::{BufRead, Write};
use std::str::Utf8Error;

use super::errors::CliResult;
use crate::dispatch::Response;

/// One non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Trimmed line text
    Text(String),
    /// 1-based line number of a line that is not valid UTF-8
    NotUtf8 { line: usize, error: Utf8Error },
}

/// Iterator over the non-blank lines of a reader.
pub struct InputLines<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> Iterator for InputLines<R> {
    type Item = CliResult<InputLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut buf = Vec::new();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(e.into())),
            }

            match String::from_utf8(buf) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => return Some(Ok(InputLine::Text(text.trim().to_string()))),
                Err(e) => {
                    return Some(Ok(InputLine::NotUtf8 {
                        line: self.line,
                        error: e.utf8_error(),
                    }))
                }
            }
        }
    }
}

/// Non-blank input lines. Blank lines are skipped but still counted.
pub fn read_lines<R: BufRead>(reader: R) -> InputLines<R> {
    InputLines { reader, line: 0 }
}

pub fn write_response<W: Write>(out: &mut W, response: &Response) -> CliResult<()> {
    writeln!(out, "{}", response.to_json())?;
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, value: &serde_json::Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
