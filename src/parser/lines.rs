//! Line splitting tolerant of every end-of-line convention
//!
//! ads.txt files in the wild are written on every platform, so `\n`, `\r\n`
//! and a bare `\r` all end a line. Mixed terminators in one file are common.

use std::borrow::Cow;
use std::iter::FusedIterator;

/// Iterator over the logical lines of a byte buffer
///
/// Created by [`split_lines`]. Lines are decoded as UTF-8; invalid sequences are
/// replaced rather than rejected.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    remaining: &'a [u8],
}

/// Splits a byte buffer into logical lines
///
/// A line ends at the first `\r` or `\n`. `\r\n` counts as a single terminator.
/// Bytes left after the last terminator form one final line. Empty input yields
/// no lines.
///
/// # Examples
///
/// ```
/// use adstxt::split_lines;
///
/// let lines: Vec<_> = split_lines(b"one\r\ntwo\rthree\nfour").collect();
/// assert_eq!(lines, vec!["one", "two", "three", "four"]);
/// ```
pub fn split_lines(bytes: &[u8]) -> Lines<'_> {
    Lines { remaining: bytes }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let line = match self
            .remaining
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
        {
            Some(i) => {
                let line = &self.remaining[..i];
                let mut advance = i + 1;
                if self.remaining[i] == b'\r' && self.remaining.get(i + 1) == Some(&b'\n') {
                    advance += 1;
                }
                self.remaining = &self.remaining[advance..];
                line
            }
            None => std::mem::take(&mut self.remaining),
        };

        Some(String::from_utf8_lossy(line))
    }
}

impl FusedIterator for Lines<'_> {}
