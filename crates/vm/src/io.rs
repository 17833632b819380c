//! Output and input collaborator contracts.
//!
//! The engine writes through two independent [`OutputSink`]s (normal and
//! diagnostic) and reads through one [`InputSource`]. The stream-backed
//! implementations here serve the CLI; tests substitute their own.

use std::io::{self, BufRead, Write};

/// Per-scalar-type write primitives.
///
/// There is no write-nil: the engine writes nil as the empty string
/// through [`OutputSink::write_str`].
pub trait OutputSink {
    /// Write a string verbatim, with no trailing newline.
    fn write_str(&mut self, s: &str) -> io::Result<()>;
    /// Write an integer in decimal form.
    fn write_int(&mut self, value: i64) -> io::Result<()>;
    /// Write a boolean as `true` or `false`.
    fn write_bool(&mut self, value: bool) -> io::Result<()>;
}

/// Per-scalar-type blocking read primitives.
///
/// `Ok(None)` is the ordinary "absent" signal for exhausted or malformed
/// input; `Err` is reserved for real I/O failures.
pub trait InputSource {
    /// Read an integer, or `None` when input is exhausted or malformed.
    fn read_int(&mut self) -> io::Result<Option<i64>>;
    /// Read a line as a string, or `None` when input is exhausted.
    fn read_str(&mut self) -> io::Result<Option<String>>;
    /// Read a boolean, or `None` when input is exhausted.
    fn read_bool(&mut self) -> io::Result<Option<bool>>;
}

/// An output sink writing to any [`Write`] stream.
#[derive(Debug)]
pub struct StreamOutput<W: Write> {
    inner: W,
}

impl<W: Write> StreamOutput<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer, for inspecting captured output.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> OutputSink for StreamOutput<W> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.inner.write_all(s.as_bytes())?;
        self.inner.flush()
    }

    fn write_int(&mut self, value: i64) -> io::Result<()> {
        write!(self.inner, "{value}")?;
        self.inner.flush()
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_str(if value { "true" } else { "false" })
    }
}

/// An input source reading one line per value from any [`BufRead`] stream.
#[derive(Debug)]
pub struct StreamInput<R: BufRead> {
    inner: R,
}

impl<R: BufRead> StreamInput<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> InputSource for StreamInput<R> {
    fn read_int(&mut self) -> io::Result<Option<i64>> {
        Ok(self.next_line()?.and_then(|line| line.trim().parse().ok()))
    }

    fn read_str(&mut self) -> io::Result<Option<String>> {
        self.next_line()
    }

    fn read_bool(&mut self) -> io::Result<Option<bool>> {
        // Only the word "true" (any case) reads as true; everything else
        // on a present line reads as false.
        Ok(self
            .next_line()?
            .map(|line| line.trim().eq_ignore_ascii_case("true")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stream_output_writes_scalars() {
        let mut out = StreamOutput::new(Vec::new());
        out.write_str("a ").unwrap();
        out.write_int(-3).unwrap();
        out.write_str(" ").unwrap();
        out.write_bool(true).unwrap();
        out.write_bool(false).unwrap();
        assert_eq!(out.into_inner(), b"a -3 truefalse");
    }

    #[test]
    fn stream_input_reads_lines() {
        let mut input = StreamInput::new(Cursor::new("hello\nworld"));
        assert_eq!(input.read_str().unwrap(), Some("hello".into()));
        assert_eq!(input.read_str().unwrap(), Some("world".into()));
        assert_eq!(input.read_str().unwrap(), None);
    }

    #[test]
    fn stream_input_strips_crlf() {
        let mut input = StreamInput::new(Cursor::new("abc\r\n"));
        assert_eq!(input.read_str().unwrap(), Some("abc".into()));
    }

    #[test]
    fn stream_input_parses_ints() {
        let mut input = StreamInput::new(Cursor::new("42\n -7 \nnot a number\n"));
        assert_eq!(input.read_int().unwrap(), Some(42));
        assert_eq!(input.read_int().unwrap(), Some(-7));
        // Malformed input is the ordinary absent signal, not an error.
        assert_eq!(input.read_int().unwrap(), None);
        assert_eq!(input.read_int().unwrap(), None);
    }

    #[test]
    fn stream_input_parses_bools() {
        let mut input = StreamInput::new(Cursor::new("true\nTRUE\nfalse\nyes\n"));
        assert_eq!(input.read_bool().unwrap(), Some(true));
        assert_eq!(input.read_bool().unwrap(), Some(true));
        assert_eq!(input.read_bool().unwrap(), Some(false));
        assert_eq!(input.read_bool().unwrap(), Some(false));
        assert_eq!(input.read_bool().unwrap(), None);
    }
}
