//! Destination for `print`.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// In-memory output shared between the interpreter and its owner
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Buffer(OutputBuffer),
}

impl Output {
    pub fn write_line(&self, text: &str) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{text}")?;
                stdout.flush()
            }
            Output::Buffer(buffer) => writeln!(buffer.0.borrow_mut(), "{text}"),
        }
    }
}

impl From<OutputBuffer> for Output {
    fn from(buffer: OutputBuffer) -> Self {
        Output::Buffer(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_lines() {
        let buffer = OutputBuffer::new();
        let output = Output::from(buffer.clone());

        output.write_line("one").ok();
        output.write_line("two").ok();

        assert_eq!(buffer.contents(), "one\ntwo\n");
        assert_eq!(buffer.lines(), vec!["one", "two"]);

        buffer.clear();
        assert_eq!(buffer.contents(), "");
    }
}
