//! Fixed-size character buffer over a byte stream
//!
//! Bytes are pulled from the underlying reader in chunks of the configured
//! size and decoded as UTF-8. A multi-byte sequence cut by a chunk boundary
//! is carried over to the next refill.

use std::io::{self, Read};
use tracing::trace;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Read-ahead character source used by the CSV parser
pub(crate) struct CharBuffer<R> {
    inner: R,
    chars: Vec<char>,
    position: usize,
    scratch: Vec<u8>,
    pending: Vec<u8>,
    started: bool,
    eof: bool,
}

impl<R: Read> CharBuffer<R> {
    pub(crate) fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            chars: Vec::with_capacity(capacity),
            position: 0,
            scratch: vec![0; capacity],
            pending: Vec::new(),
            started: false,
            eof: false,
        }
    }

    /// Consume the next character, or `None` at end of stream
    pub(crate) fn next_char(&mut self) -> io::Result<Option<char>> {
        let next = self.peek_char()?;
        if next.is_some() {
            self.position += 1;
        }
        Ok(next)
    }

    /// Look at the next character without consuming it
    ///
    /// Refills the buffer when the lookahead falls past the last buffered
    /// character.
    pub(crate) fn peek_char(&mut self) -> io::Result<Option<char>> {
        if self.position >= self.chars.len() && !self.refill()? {
            return Ok(None);
        }
        Ok(self.chars.get(self.position).copied())
    }

    /// Consume the next character only if it equals `expected`
    pub(crate) fn next_if_eq(&mut self, expected: char) -> io::Result<bool> {
        if self.peek_char()? == Some(expected) {
            self.position += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn refill(&mut self) -> io::Result<bool> {
        self.chars.clear();
        self.position = 0;

        loop {
            self.decode_pending()?;

            if !self.started && !self.chars.is_empty() {
                self.started = true;
                if self.chars[0] == BYTE_ORDER_MARK {
                    self.chars.remove(0);
                }
            }
            if !self.chars.is_empty() {
                return Ok(true);
            }

            if self.eof {
                if !self.pending.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "stream ended inside a UTF-8 sequence",
                    ));
                }
                return Ok(false);
            }

            let read = loop {
                match self.inner.read(&mut self.scratch) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            trace!(bytes = read, "refilled CSV buffer");

            if read == 0 {
                self.eof = true;
            } else {
                self.pending.extend_from_slice(&self.scratch[..read]);
            }
        }
    }

    /// Decode the longest valid prefix of the pending bytes
    ///
    /// Invalid bytes are only reported once everything before them has been
    /// handed out.
    fn decode_pending(&mut self) -> io::Result<()> {
        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.valid_up_to() == 0 && e.error_len().is_some() => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
            Err(e) => e.valid_up_to(),
        };
        if valid_up_to == 0 {
            return Ok(());
        }

        let text = std::str::from_utf8(&self.pending[..valid_up_to])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.chars.extend(text.chars());
        self.pending.drain(..valid_up_to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain<R: Read>(buffer: &mut CharBuffer<R>) -> io::Result<String> {
        let mut out = String::new();
        while let Some(c) = buffer.next_char()? {
            out.push(c);
        }
        Ok(out)
    }

    #[test]
    fn test_reads_across_refills() {
        let mut buffer = CharBuffer::new(Cursor::new("abcdefg"), 2);
        assert_eq!(drain(&mut buffer).unwrap(), "abcdefg");
        assert_eq!(buffer.next_char().unwrap(), None);
    }

    #[test]
    fn test_peek_crosses_buffer_boundary() {
        let mut buffer = CharBuffer::new(Cursor::new("ab"), 1);
        assert_eq!(buffer.next_char().unwrap(), Some('a'));
        assert_eq!(buffer.peek_char().unwrap(), Some('b'));
        assert!(buffer.next_if_eq('b').unwrap());
        assert!(!buffer.next_if_eq('c').unwrap());
        assert_eq!(buffer.peek_char().unwrap(), None);
    }

    #[test]
    fn test_multibyte_split_across_refills() {
        // 'é' is two bytes and 'ツ' is three; a one-byte buffer splits both
        let mut buffer = CharBuffer::new(Cursor::new("é,ツ"), 1);
        assert_eq!(drain(&mut buffer).unwrap(), "é,ツ");
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let mut buffer = CharBuffer::new(Cursor::new("\u{feff}x"), 3);
        assert_eq!(drain(&mut buffer).unwrap(), "x");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let mut buffer = CharBuffer::new(Cursor::new(vec![b'a', 0xff, b'b']), 8);
        let err = drain(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_utf8_is_error() {
        let mut buffer = CharBuffer::new(Cursor::new(vec![b'a', 0xe3, 0x83]), 8);
        assert_eq!(buffer.next_char().unwrap(), Some('a'));
        let err = buffer.next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
