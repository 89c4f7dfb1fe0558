//! Line source with one-line pushback

use std::io::{self, BufRead, Lines};

/// Reads a rule file line by line
///
/// The statement parser consumes command lines greedily after a rule
/// header; the first line that ends a command block is handed back with
/// [`Reader::push_back`] so the outer loop sees it again.
pub struct Reader<R> {
    lines: Lines<R>,
    pushed: Option<String>,
    line_no: usize,
}

impl<R: BufRead> Reader<R> {
    /// Wrap a buffered source
    pub fn new(source: R) -> Self {
        Reader {
            lines: source.lines(),
            pushed: None,
            line_no: 0,
        }
    }

    /// Check whether another line is available
    pub fn has_next(&mut self) -> io::Result<bool> {
        if self.pushed.is_some() {
            return Ok(true);
        }
        match self.next_line()? {
            Some(line) => {
                self.push_back(line);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Take the next line, preferring a pushed-back one
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pushed.take() {
            self.line_no += 1;
            return Ok(Some(line));
        }

        match self.lines.next().transpose()? {
            Some(mut line) => {
                if line.ends_with('\r') {
                    line.pop();
                }
                self.line_no += 1;
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    /// Return a consumed line to the front of the stream
    pub fn push_back(&mut self, line: String) {
        debug_assert!(self.pushed.is_none(), "only one line of pushback");
        self.line_no = self.line_no.saturating_sub(1);
        self.pushed = Some(line);
    }

    /// 1-based number of the most recently returned line
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}
