use crate::core::input::{InputError, InputProvider};
use std::io::{self, BufRead, Write};

/// Reads answers from stdin, echoing the prompt to stdout.
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed").into());
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }
}
