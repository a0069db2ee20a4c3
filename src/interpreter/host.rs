use std::{
    cell::RefCell,
    io::{self, BufRead, Write},
    rc::Rc,
};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Output and input channels used by `print` and `input`.
///
/// The evaluator never touches the process streams directly; a host decides
/// where program output goes and where input lines come from.
pub struct Host {
    output: Box<dyn Write>,
    input:  Box<dyn BufRead>,
}

impl Host {
    /// Builds a host over arbitrary writer and reader.
    pub fn new(output: impl Write + 'static, input: impl BufRead + 'static) -> Self {
        Self { output: Box::new(output),
               input:  Box::new(input), }
    }

    /// Host bound to the process standard output and standard input.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::BufReader::new(io::stdin()))
    }

    /// Host that records output in `buffer` and reads no input.
    #[must_use]
    pub fn buffered(buffer: OutputBuffer) -> Self {
        Self::new(buffer, io::empty())
    }

    /// Writes `text` followed by a newline and flushes.
    pub fn write_line(&mut self, text: &str, line: usize) -> EvalResult<()> {
        writeln!(self.output, "{text}").and_then(|()| self.output.flush())
                                       .map_err(|e| io_error(&e, line))
    }

    /// Writes `text` without a newline and flushes; used for prompts.
    pub fn write(&mut self, text: &str, line: usize) -> EvalResult<()> {
        write!(self.output, "{text}").and_then(|()| self.output.flush())
                                     .map_err(|e| io_error(&e, line))
    }

    /// Reads one line without its terminator; `None` at end of input.
    pub fn read_line(&mut self, line: usize) -> EvalResult<Option<String>> {
        let mut buffer = String::new();
        let read = self.input
                       .read_line(&mut buffer)
                       .map_err(|e| io_error(&e, line))?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(trimmed);
        Ok(Some(buffer))
    }
}

fn io_error(err: &io::Error, line: usize) -> RuntimeError {
    RuntimeError::Io { details: err.to_string(),
                       line }
}

/// A cloneable in-memory sink.
///
/// Handy for embedding and tests: one clone goes into the [`Host`], the other
/// stays with the caller to read what the program printed.
#[derive(Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
