use std::fmt::Display;
use std::io;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("Parse failure: {0}")]
    Parse(String),
}

impl InputError {
    /// True once the input source is exhausted (Ctrl-D, closed pipe).
    pub fn is_eof(&self) -> bool {
        matches!(self, InputError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Abstraction for input sources, so the menu can be driven by a script in tests.
pub trait InputProvider {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// Prompts, trimming and type conversion on top of a raw provider.
pub struct InputHandler<I: InputProvider> {
    provider: I,
}

impl<I: InputProvider> InputHandler<I> {
    pub fn new(provider: I) -> Self {
        Self { provider }
    }

    pub fn get_string_trimmed(&mut self, prompt: &str) -> Result<String, InputError> {
        self.provider.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Blank answers mean "skip this filter".
    pub fn get_optional(&mut self, prompt: &str) -> Result<Option<String>, InputError> {
        let s = self.get_string_trimmed(prompt)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    pub fn parse_trimmed<T>(&mut self, prompt: &str) -> Result<T, InputError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let s = self.get_string_trimmed(prompt)?;
        s.parse::<T>().map_err(|e| InputError::Parse(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers, then reports EOF.
    pub struct ScriptedInput {
        responses: VecDeque<String>,
    }

    impl ScriptedInput {
        pub fn new(lines: &[&str]) -> Self {
            Self {
                responses: lines.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl InputProvider for ScriptedInput {
        fn read_line(&mut self, _prompt: &str) -> Result<String, InputError> {
            self.responses.pop_front().ok_or_else(|| {
                InputError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "No more responses"))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedInput;
    use super::*;

    #[test]
    fn parse_trimmed_success() {
        let mut handler = InputHandler::new(ScriptedInput::new(&[" 42 "]));
        assert_eq!(handler.parse_trimmed::<u32>("page").unwrap(), 42);
    }

    #[test]
    fn parse_trimmed_rejects_garbage() {
        let mut handler = InputHandler::new(ScriptedInput::new(&["forty-two"]));
        let result = handler.parse_trimmed::<u32>("page");
        assert!(matches!(result, Err(InputError::Parse(_))));
    }

    #[test]
    fn blank_optional_is_none() {
        let mut handler = InputHandler::new(ScriptedInput::new(&["   ", " 1999 "]));
        assert_eq!(handler.get_optional("year").unwrap(), None);
        assert_eq!(handler.get_optional("year").unwrap().as_deref(), Some("1999"));
    }

    #[test]
    fn exhausted_script_reports_eof() {
        let mut handler = InputHandler::new(ScriptedInput::new(&[]));
        let err = handler.get_string_trimmed("anything").unwrap_err();
        assert!(err.is_eof());
        assert!(!InputError::Parse("x".into()).is_eof());
    }
}
