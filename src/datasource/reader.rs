use crate::common::types::LogEntry;
use crate::parser::{LineParser, ParseResult, TargetStatusPolicy};
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::path::Path;
use std::result;

pub type Result<T> = result::Result<T, ReaderError>;

#[derive(Fail, Debug)]
pub enum ReaderError {
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for ReaderError {
    fn from(err: io::Error) -> ReaderError {
        ReaderError::Io(err)
    }
}

#[derive(Debug)]
pub struct ReaderBuilder {
    capacity: usize,
    parser: LineParser,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        ReaderBuilder {
            capacity: 8 * (1 << 10),
            parser: LineParser::default(),
        }
    }
}

impl ReaderBuilder {
    pub fn new() -> Self {
        ReaderBuilder::default()
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Reader<File>> {
        Ok(Reader::new(self, File::open(path)?))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<R> {
        Reader::new(self, rdr)
    }

    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut ReaderBuilder {
        self.capacity = capacity;
        self
    }

    pub fn target_status_policy(&mut self, policy: TargetStatusPolicy) -> &mut ReaderBuilder {
        self.parser = self.parser.target_status_policy(policy);
        self
    }
}

/// Counts of what happened to the lines of one stream.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct ReadSummary {
    pub parsed: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct Reader<R> {
    rdr: io::BufReader<R>,
    parser: LineParser,
    line_number: usize,
    buf: Vec<u8>,
}

impl<R: io::Read> Reader<R> {
    fn new(builder: &ReaderBuilder, rdr: R) -> Reader<R> {
        Reader {
            rdr: io::BufReader::with_capacity(builder.capacity, rdr),
            parser: builder.parser,
            line_number: 0,
            buf: Vec::new(),
        }
    }

    pub fn from_reader(rdr: R) -> Reader<R> {
        ReaderBuilder::new().from_reader(rdr)
    }

    /// 1-based number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line into `line` without its terminator. Returns
    /// `false` once the input is exhausted.
    pub fn read_line(&mut self, line: &mut String) -> Result<bool> {
        self.buf.clear();
        let num_of_bytes = self.rdr.read_until(b'\n', &mut self.buf)?;
        if num_of_bytes == 0 {
            return Ok(false);
        }

        if self.buf.ends_with(b"\n") {
            self.buf.pop();
            if self.buf.ends_with(b"\r") {
                self.buf.pop();
            }
        }

        self.line_number += 1;
        line.clear();
        line.push_str(&String::from_utf8_lossy(&self.buf));
        Ok(true)
    }

    pub fn next_entry(&mut self) -> Result<Option<ParseResult<LogEntry>>> {
        let mut line = String::new();
        if self.read_line(&mut line)? {
            Ok(Some(self.parser.parse(&line)))
        } else {
            Ok(None)
        }
    }

    /// Hands every parsed entry to `handler`. Lines that fail to parse are
    /// logged and skipped; only I/O errors stop the stream.
    pub fn for_each_entry<F>(&mut self, mut handler: F) -> Result<ReadSummary>
    where
        F: FnMut(LogEntry),
    {
        let mut summary = ReadSummary::default();

        while let Some(result) = self.next_entry()? {
            match result {
                Ok(entry) => {
                    summary.parsed += 1;
                    handler(entry);
                }
                Err(failure) => {
                    summary.failed += 1;
                    tracing::warn!(
                        line_number = self.line_number,
                        line = %failure.line,
                        "skipping unparsable log line: {}",
                        failure
                    );
                }
            }
        }

        tracing::debug!(parsed = summary.parsed, failed = summary.failed, "finished reading log");
        Ok(summary)
    }
}

/// Parses every line of the file at `path`, calling `handler` for each entry.
pub fn parse_file<P, F>(path: P, handler: F) -> Result<ReadSummary>
where
    P: AsRef<Path>,
    F: FnMut(LogEntry),
{
    ReaderBuilder::new().from_path(path)?.for_each_entry(handler)
}
