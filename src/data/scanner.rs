//! Line-oriented cursor over a rewindable text source.
//!
//! Both loader passes walk the source through [`TableCursor`]: it hands out
//! data lines one at a time, skipping blank lines and comment lines whose
//! first non-blank byte is `;`, `#` or `*`. Each line is then read with a
//! [`LineScanner`], which knows the table's number syntax and treats any byte
//! other than a digit, `.` or `-` as filler between values.

use std::io::{self, BufRead, Seek, SeekFrom};

const COMMENT_MARKERS: &[u8] = b";#*";

fn starts_number(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.' || b == b'-'
}

// ---------------------------------------------------------------------------
// TableCursor
// ---------------------------------------------------------------------------

pub(crate) struct TableCursor<R> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead + Seek> TableCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        TableCursor {
            reader,
            line: Vec::new(),
            line_no: 0,
        }
    }

    /// Total length of the source in bytes. Leaves the cursor at the start.
    pub(crate) fn source_len(&mut self) -> io::Result<u64> {
        let end = self.reader.seek(SeekFrom::End(0))?;
        self.rewind()?;
        Ok(end)
    }

    pub(crate) fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_no = 0;
        Ok(())
    }

    /// 1-based number of the line most recently returned.
    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }

    /// Next line that is neither blank nor a comment, or `None` at end.
    pub(crate) fn next_data_line(&mut self) -> io::Result<Option<LineScanner<'_>>> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line.last() == Some(&b'\n') {
                self.line.pop();
            }

            let first = self.line.iter().copied().find(|b| !b.is_ascii_whitespace());
            match first {
                None => continue,
                Some(b) if COMMENT_MARKERS.contains(&b) => continue,
                Some(_) => {
                    let mut scanner = LineScanner::new(&self.line);
                    scanner.line_no = self.line_no;
                    return Ok(Some(scanner));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LineScanner
// ---------------------------------------------------------------------------

pub(crate) struct LineScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line_no: usize,
}

impl<'a> LineScanner<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        LineScanner {
            bytes,
            pos: 0,
            line_no: 0,
        }
    }

    /// 1-based line number in the source, or 0 for a detached line.
    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }

    /// Read the line's leading value. Only whitespace may precede it.
    pub(crate) fn first_value(&mut self) -> Option<f64> {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let value = self.read_number()?;
        self.skip_filler();
        Some(value)
    }

    /// Read the next value on this line, if any.
    pub(crate) fn next_value(&mut self) -> Option<f64> {
        let value = self.read_number()?;
        self.skip_filler();
        Some(value)
    }

    /// Nothing but filler remains.
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_filler(&mut self) {
        while self.peek().is_some_and(|b| !starts_number(b)) {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self, from: usize) -> usize {
        let mut end = from;
        while self.bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    }

    /// Decimal number with optional sign, fraction and exponent. The
    /// position is unchanged when no number starts here.
    fn read_number(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut end = start;
        if matches!(self.bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }

        let int_end = self.skip_digits(end);
        let mut digits = int_end - end;
        end = int_end;
        if self.bytes.get(end) == Some(&b'.') {
            let frac_end = self.skip_digits(end + 1);
            digits += frac_end - end - 1;
            end = frac_end;
        }
        if digits == 0 {
            return None;
        }

        if matches!(self.bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(self.bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = self.skip_digits(exp);
            if exp_end > exp {
                end = exp_end;
            }
        }

        let value = std::str::from_utf8(&self.bytes[start..end])
            .ok()?
            .parse::<f64>()
            .ok()?;
        self.pos = end;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn values(line: &str) -> Vec<f64> {
        let mut scanner = LineScanner::new(line.as_bytes());
        let mut out = Vec::new();
        if let Some(v) = scanner.first_value() {
            out.push(v);
            while let Some(v) = scanner.next_value() {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn test_number_syntax() {
        assert_eq!(
            values("1 -2.5 .5 3. 1e3 -4.0E-2 +7"),
            vec![1.0, -2.5, 0.5, 3.0, 1000.0, -0.04, 7.0]
        );
    }

    #[test]
    fn test_filler_between_values() {
        assert_eq!(values("  300.5,\t1.0 ; 2.0 | x 3\r"), vec![300.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dangling_exponent_is_filler() {
        let mut scanner = LineScanner::new(b"2e 5");
        assert_eq!(scanner.first_value(), Some(2.0));
        assert_eq!(scanner.next_value(), Some(5.0));
        assert!(scanner.at_end());
    }

    #[test]
    fn test_first_value_rejects_text() {
        let mut scanner = LineScanner::new(b"lambda 1 2");
        assert_eq!(scanner.first_value(), None);
        assert!(values("- 1").is_empty());
    }

    #[test]
    fn test_trailing_sign_is_not_end() {
        let mut scanner = LineScanner::new(b"1 2 -");
        scanner.first_value();
        scanner.next_value();
        assert!(!scanner.at_end());
        assert_eq!(scanner.next_value(), None);
    }

    #[test]
    fn test_cursor_skips_comments_and_blank_lines() {
        let text = "; header\n\n  # indented\n* star\n1 2\n\r\n3 4";
        let mut cursor = TableCursor::new(Cursor::new(text.as_bytes()));
        assert_eq!(cursor.source_len().unwrap(), text.len() as u64);

        let mut line = cursor.next_data_line().unwrap().unwrap();
        assert_eq!(line.line_no(), 5);
        assert_eq!(line.first_value(), Some(1.0));
        assert_eq!(cursor.line_no(), 5);

        let second = cursor.next_data_line().unwrap().unwrap().first_value();
        assert_eq!(second, Some(3.0));
        assert_eq!(cursor.line_no(), 7);
        assert!(cursor.next_data_line().unwrap().is_none());

        cursor.rewind().unwrap();
        let again = cursor.next_data_line().unwrap().unwrap().first_value();
        assert_eq!(again, Some(1.0));
    }
}
