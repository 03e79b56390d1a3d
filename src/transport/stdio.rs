// src/transport/stdio.rs

use crate::common::hal_traits::Transport;
use std::io::{self, BufRead, Stdin, Stdout, Write};
use std::string::String;

/// Line transport over a reader/writer pair, by default the process console.
///
/// End of input is reported like a receive timeout: empty text.
#[derive(Debug)]
pub struct StdioTransport<R = io::BufReader<Stdin>, W = Stdout> {
    input: R,
    output: W,
}

impl StdioTransport {
    /// Transport over stdin/stdout.
    pub fn stdio() -> Self {
        StdioTransport::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioTransport<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdioTransport { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Transport for StdioTransport<R, W> {
    type Error = io::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn send(&mut self, message: &str) -> Result<(), Self::Error> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    fn receive(&mut self) -> Result<String, Self::Error> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::vec::Vec;

    #[test]
    fn test_send_writes_one_line() {
        let mut t = StdioTransport::new(Cursor::new(Vec::new()), Vec::new());
        t.send("?type=TH&id=2").unwrap();
        let (_, out) = t.into_inner();
        assert_eq!(out, b"?type=TH&id=2\n");
    }

    #[test]
    fn test_receive_lines_then_eof() {
        let input = Cursor::new(b"?id=0&value=1\r\n?id=2\n".to_vec());
        let mut t = StdioTransport::new(input, Vec::new());
        assert_eq!(t.receive().unwrap(), "?id=0&value=1");
        assert_eq!(t.receive().unwrap(), "?id=2");
        assert_eq!(t.receive().unwrap(), "");
    }
}
