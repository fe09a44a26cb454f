//! Line cursor: a seekable, lazily cached line reader over a script body.
//!
//! Lines are yielded with their terminator attached so that concatenating
//! everything read reproduces the source byte-for-byte.

use crate::error::ResolveError;
use std::str::SplitInclusive;

pub struct LineCursor<'a> {
    source: SplitInclusive<'a, char>,
    lines: Vec<&'a str>,
    pos: usize,
    exhausted: bool,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        LineCursor {
            source: text.split_inclusive('\n'),
            lines: Vec::new(),
            pos: 0,
            exhausted: false,
        }
    }

    /// Index of the next line `read_line` would return.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to `pos`. Any cached index is O(1); seeking past the cache reads
    /// ahead, and seeking beyond the end of content is an error. The end
    /// position itself (one past the last line) is valid.
    pub fn set_position(&mut self, pos: usize) -> Result<(), ResolveError> {
        while self.lines.len() < pos {
            if !self.fill_one() {
                return Err(ResolveError::SeekOutOfRange {
                    requested: pos,
                    available: self.lines.len(),
                });
            }
        }
        self.pos = pos;
        Ok(())
    }

    /// Step back one line so the last line read is returned again.
    pub fn unread(&mut self) -> Result<(), ResolveError> {
        match self.pos.checked_sub(1) {
            Some(prev) => self.set_position(prev),
            None => Err(ResolveError::SeekOutOfRange {
                requested: 0,
                available: self.lines.len(),
            }),
        }
    }

    pub fn read_line(&mut self) -> Option<&'a str> {
        let line = self.peek_line()?;
        self.pos += 1;
        Some(line)
    }

    pub fn peek_line(&mut self) -> Option<&'a str> {
        if self.pos >= self.lines.len() && !self.fill_one() {
            return None;
        }
        self.lines.get(self.pos).copied()
    }

    fn fill_one(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.source.next() {
            Some(line) => {
                self.lines.push(line);
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}
