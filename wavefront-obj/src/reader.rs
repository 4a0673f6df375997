//! Chunked line reader.
//!
//! Reads a file in fixed-size chunks into a double-sized buffer, rather than a single
//! `BufReader::lines()` call, so that a 2GiB OBJ never has to sit fully in memory. A line that
//! straddles two chunk reads is carried over into the front of the buffer for the next read.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::warn;

/// Size of a single underlying read. The working buffer is twice this, so that a read always has
/// room to land after whatever partial line was carried over from the previous one.
const CHUNK_SIZE: usize = 1 << 16;

/// Reads a file's lines in fixed-size chunks, handing each complete line to a callback rather than
/// building an in-memory `Vec<String>` or borrowing `Iterator`.
pub struct ChunkedLineReader {
    file: File,
    buffer: Vec<u8>,
    /// Number of bytes at the front of `buffer` still awaiting a newline, carried from the
    /// previous read.
    pending: usize,
    eof: bool,
}

impl ChunkedLineReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
            buffer: vec![0u8; CHUNK_SIZE * 2],
            pending: 0,
            eof: false,
        })
    }

    /// Invokes `on_line` once per complete line, in order, with trailing `\n`/`\r\n` stripped.
    /// Lines are decoded as lossy UTF-8: an OBJ/MTL file containing invalid UTF-8 in comments or
    /// names does not abort the parse, it just garbles that text.
    pub fn for_each_line(mut self, mut on_line: impl FnMut(&str)) -> io::Result<()> {
        loop {
            if !self.eof {
                let read = self.file.read(&mut self.buffer[self.pending..self.pending + CHUNK_SIZE])?;
                if read == 0 {
                    self.eof = true;
                    // Synthesize a trailing newline so the final partial line still gets dispatched.
                    if self.pending > 0 && self.buffer[self.pending - 1] != b'\n' {
                        self.buffer[self.pending] = b'\n';
                        self.pending += 1;
                    }
                } else {
                    self.pending += read;
                }
            }

            if self.pending == 0 {
                return Ok(());
            }

            let filled = &self.buffer[..self.pending];
            let last_newline = filled.iter().rposition(|&b| b == b'\n');
            let dispatch_end = match last_newline {
                Some(pos) => pos + 1,
                None if self.eof => self.pending,
                None => {
                    // No newline anywhere in a full double-sized buffer: a single line longer than
                    // one chunk. Grow the buffer rather than silently truncating it.
                    let new_len = self.buffer.len() * 2;
                    if new_len > 256 * 1024 * 1024 {
                        warn!("encountered a line longer than 256MiB, giving up on this file");
                        return Ok(());
                    }
                    self.buffer.resize(new_len, 0);
                    continue;
                }
            };

            for raw_line in filled[..dispatch_end].split(|&b| b == b'\n') {
                if raw_line.is_empty() {
                    continue;
                }
                let line = String::from_utf8_lossy(raw_line);
                on_line(line.trim_end_matches('\r'));
            }

            let remainder_len = self.pending - dispatch_end;
            self.buffer.copy_within(dispatch_end..self.pending, 0);
            self.pending = remainder_len;

            if self.eof && remainder_len == 0 {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_lines(contents: &[u8]) -> Vec<String> {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("wavefront-obj-reader-test-{:p}", contents.as_ptr()));
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(contents).unwrap();
        }
        let mut lines = Vec::new();
        ChunkedLineReader::open(&path).unwrap().for_each_line(|l| lines.push(l.to_owned())).unwrap();
        std::fs::remove_file(&path).ok();
        lines
    }

    #[test]
    fn splits_simple_lines() {
        let lines = read_lines(b"v 1 2 3\nv 4 5 6\n");
        assert_eq!(lines, vec!["v 1 2 3", "v 4 5 6"]);
    }

    #[test]
    fn handles_missing_trailing_newline() {
        let lines = read_lines(b"v 1 2 3\nv 4 5 6");
        assert_eq!(lines, vec!["v 1 2 3", "v 4 5 6"]);
    }

    #[test]
    fn handles_crlf() {
        let lines = read_lines(b"v 1 2 3\r\nv 4 5 6\r\n");
        assert_eq!(lines, vec!["v 1 2 3", "v 4 5 6"]);
    }

    #[test]
    fn handles_chunk_straddling_line() {
        let mut contents = Vec::new();
        for i in 0..5000 {
            contents.extend_from_slice(format!("v {i}.0 {i}.0 {i}.0\n").as_bytes());
        }
        let lines = read_lines(&contents);
        assert_eq!(lines.len(), 5000);
        assert_eq!(lines[4999], "v 4999.0 4999.0 4999.0");
    }
}
