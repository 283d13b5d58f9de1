use std::io::{self, BufRead};

use bytes::{Bytes, BytesMut};

use crate::constants::MAX_LINE_LENGTH;

/// One unit of input from [`LineReader::read_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(Bytes),
    /// The line ran past the limit and was thrown away up to its newline.
    TooLong,
}

/// Reads one command line at a time from a buffered source.
pub struct LineReader<R> {
    reader: R,
    buffer: BytesMut,
    max_len: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, MAX_LINE_LENGTH)
    }

    pub fn with_limit(reader: R, max_len: usize) -> Self {
        LineReader {
            reader,
            buffer: BytesMut::with_capacity(max_len + 1),
            max_len: max_len.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.max_len
    }

    /// Returns the next line, newline included, or `None` once the source is exhausted.
    ///
    /// A line may hold `max_len` bytes before its newline. Anything longer is
    /// consumed through the newline and reported as [`Line::TooLong`].
    pub fn read_line(&mut self) -> io::Result<Option<Line>> {
        self.buffer.clear();
        let mut overflowed = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                break;
            }

            let newline = available.iter().position(|&byte| byte == b'\n');
            if overflowed {
                let skipped = newline.map_or(available.len(), |idx| idx + 1);
                self.reader.consume(skipped);
                if newline.is_some() {
                    break;
                }
                continue;
            }

            let room = self.max_len - self.buffer.len();
            match newline {
                Some(idx) if idx <= room => {
                    self.buffer.extend_from_slice(&available[..=idx]);
                    self.reader.consume(idx + 1);
                    break;
                }
                None if available.len() <= room => {
                    let taken = available.len();
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(taken);
                }
                _ => {
                    log::warn!("input line exceeds {} bytes, discarding it", self.max_len);
                    overflowed = true;
                    self.buffer.clear();
                }
            }
        }

        if overflowed {
            return Ok(Some(Line::TooLong));
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(Line::Text(self.buffer.split().freeze())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn reader(input: &str) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(input.as_bytes().to_vec()))
    }

    fn text(bytes: &'static [u8]) -> Line {
        Line::Text(Bytes::from_static(bytes))
    }

    #[test]
    fn reads_lines_with_newline() {
        let mut lines = reader("pwd\ncd /tmp\n");
        assert_eq!(Some(text(b"pwd\n")), lines.read_line().unwrap());
        assert_eq!(Some(text(b"cd /tmp\n")), lines.read_line().unwrap());
        assert!(lines.read_line().unwrap().is_none());
    }

    #[test]
    fn final_line_without_newline_precedes_end_of_input() {
        let mut lines = reader("exit");
        assert_eq!(Some(text(b"exit")), lines.read_line().unwrap());
        assert!(lines.read_line().unwrap().is_none());
        assert!(lines.read_line().unwrap().is_none());
    }

    #[test]
    fn empty_source_is_end_of_input() {
        assert!(reader("").read_line().unwrap().is_none());
    }

    #[test]
    fn overlong_line_is_discarded_through_its_newline() {
        let mut lines = LineReader::with_limit(Cursor::new(b"abcdefgh\nxy\n".to_vec()), 5);
        assert_eq!(Some(Line::TooLong), lines.read_line().unwrap());
        assert_eq!(Some(text(b"xy\n")), lines.read_line().unwrap());
        assert!(lines.read_line().unwrap().is_none());
    }

    #[test]
    fn overlong_line_at_end_of_input_is_still_reported() {
        let mut lines = LineReader::with_limit(Cursor::new(b"abcdefgh".to_vec()), 5);
        assert_eq!(Some(Line::TooLong), lines.read_line().unwrap());
        assert!(lines.read_line().unwrap().is_none());
    }

    #[test]
    fn line_of_exactly_the_limit_is_accepted() {
        let mut lines = LineReader::with_limit(Cursor::new(b"abcde\nabcde".to_vec()), 5);
        assert_eq!(Some(text(b"abcde\n")), lines.read_line().unwrap());
        assert_eq!(Some(text(b"abcde")), lines.read_line().unwrap());
        assert!(lines.read_line().unwrap().is_none());
    }

    #[test]
    fn overlong_line_split_across_reads_is_discarded() {
        let source = BufReader::with_capacity(2, Cursor::new(b"abcdefgh\npwd\n".to_vec()));
        let mut lines = LineReader::with_limit(source, 5);
        assert_eq!(Some(Line::TooLong), lines.read_line().unwrap());
        assert_eq!(Some(text(b"pwd\n")), lines.read_line().unwrap());
    }

    #[test]
    fn line_spanning_several_reads_is_joined() {
        // a one-byte buffer forces a fill per byte
        let source = BufReader::with_capacity(1, Cursor::new(b"echo hi\n".to_vec()));
        let mut lines = LineReader::new(source);
        assert_eq!(Some(text(b"echo hi\n")), lines.read_line().unwrap());
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn read_failures_are_reported() {
        let mut lines = LineReader::new(BufReader::new(Failing));
        let err = lines.read_line().unwrap_err();
        assert_eq!(io::ErrorKind::BrokenPipe, err.kind());
    }
}
