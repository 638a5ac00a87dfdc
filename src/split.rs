//! Partitioning of extracted text into ASCII and non-ASCII streams.
//!
//! Lines are split character by character, with `\n` and `\r` acting as
//! flush points. Spreadsheet rows are split cell by cell: a cell is routed
//! whole to one side and leaves an empty placeholder on the other, so both
//! sides keep the row and column shape of the input.

use serde::Serialize;

/// The two output streams produced in split mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Ascii,
    Unicode,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Ascii, Partition::Unicode];
}

/// ASCII-only and non-ASCII-only versions of one extraction result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split<T> {
    pub ascii: Vec<T>,
    pub unicode: Vec<T>,
}

impl<T> Split<T> {
    pub fn partition(&self, partition: Partition) -> &[T] {
        match partition {
            Partition::Ascii => &self.ascii,
            Partition::Unicode => &self.unicode,
        }
    }
}

fn is_ascii_char(c: char) -> bool {
    (c as u32) < 128
}

/// True when `text` holds nothing but whitespace, counting the information
/// separators U+001C to U+001F as whitespace too.
pub(crate) fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Per-line accumulator for the two character runs.
#[derive(Default)]
struct LineBuffers {
    ascii: String,
    unicode: String,
}

impl LineBuffers {
    fn flush(&mut self, out: &mut Split<String>) {
        let ascii = std::mem::take(&mut self.ascii);
        if !is_blank(&ascii) {
            out.ascii.push(ascii);
        }
        let unicode = std::mem::take(&mut self.unicode);
        if !is_blank(&unicode) {
            out.unicode.push(unicode);
        }
    }
}

/// Classify a single line, appending completed runs to `out`.
pub fn split_line(line: &str, out: &mut Split<String>) {
    let mut buffers = LineBuffers::default();

    for c in line.chars() {
        if !is_ascii_char(c) {
            buffers.unicode.push(c);
        } else if c == '\n' || c == '\r' {
            buffers.flush(out);
        } else {
            buffers.ascii.push(c);
        }
    }

    // a line need not end with a terminator
    buffers.flush(out);
}

/// Split every line of an extraction result.
pub fn split_lines<S: AsRef<str>>(lines: &[S]) -> Split<String> {
    let mut out = Split::default();
    for line in lines {
        split_line(line.as_ref(), &mut out);
    }
    out
}

/// True when every character of the cell is below U+0080.
pub fn is_ascii_cell(cell: &str) -> bool {
    cell.chars().all(is_ascii_char)
}

/// Route each cell of a row wholesale to the ASCII or the Unicode row.
///
/// Unlike [`split_line`], a cell mixing ASCII and non-ASCII characters is
/// never divided; it goes to the Unicode side in full. Cells are not trimmed.
pub fn split_row<S: AsRef<str>>(row: &[S]) -> (Vec<String>, Vec<String>) {
    let mut ascii = Vec::with_capacity(row.len());
    let mut unicode = Vec::with_capacity(row.len());

    for cell in row {
        let cell = cell.as_ref();
        if is_ascii_cell(cell) {
            ascii.push(cell.to_string());
            unicode.push(String::new());
        } else {
            ascii.push(String::new());
            unicode.push(cell.to_string());
        }
    }

    (ascii, unicode)
}

/// Split every row of a tabular extraction result, row for row.
pub fn split_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Split<Vec<String>> {
    let mut out = Split {
        ascii: Vec::with_capacity(rows.len()),
        unicode: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        let (ascii, unicode) = split_row(row);
        out.ascii.push(ascii);
        out.unicode.push(unicode);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_ascii_line() {
        let split = split_lines(&["Hello, world!"]);
        assert_eq!(split.ascii, vec!["Hello, world!"]);
        assert!(split.unicode.is_empty());
    }

    #[test]
    fn test_pure_unicode_line() {
        let split = split_lines(&["日本語のテキスト"]);
        assert!(split.ascii.is_empty());
        assert_eq!(split.unicode, vec!["日本語のテキスト"]);
    }

    #[test]
    fn test_mixed_line_keeps_order_within_each_stream() {
        let split = split_lines(&["a日b本c"]);
        assert_eq!(split.ascii, vec!["abc"]);
        assert_eq!(split.unicode, vec!["日本"]);
    }

    #[test]
    fn test_embedded_terminators_flush() {
        let split = split_lines(&["abc\ndef"]);
        assert_eq!(split.ascii, vec!["abc", "def"]);

        let split = split_lines(&["one\r\ntwo\rthree"]);
        assert_eq!(split.ascii, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_terminator_flushes_unicode_too() {
        let split = split_lines(&["x café\ny naïve"]);
        assert_eq!(split.ascii, vec!["x caf", "y nave"]);
        assert_eq!(split.unicode, vec!["é", "ï"]);
    }

    #[test]
    fn test_whitespace_only_runs_are_dropped() {
        // The ASCII side of "日本 語" is a lone space and must not be emitted.
        let split = split_lines(&["日本 語", "   ", ""]);
        assert!(split.ascii.is_empty());
        assert_eq!(split.unicode, vec!["日本語"]);
    }

    #[test]
    fn test_separator_only_runs_are_dropped() {
        let split = split_lines(&["\u{1f}", "\u{1c} \u{1d}\u{1e}", "é\u{1f}"]);
        assert!(split.ascii.is_empty());
        assert_eq!(split.unicode, vec!["é"]);

        assert!(is_blank("\u{1c}\t\u{1f}"));
        assert!(!is_blank("\u{1f}x"));
    }

    #[test]
    fn test_emitted_lines_are_not_trimmed() {
        let split = split_lines(&["  padded  é"]);
        assert_eq!(split.ascii, vec!["  padded  "]);
        assert_eq!(split.unicode, vec!["é"]);
    }

    #[test]
    fn test_every_character_lands_in_one_stream() {
        let input = "Ünïcödé and ASCII mixed — with dashes";
        let split = split_lines(&[input]);
        let recombined: usize = split
            .ascii
            .iter()
            .chain(split.unicode.iter())
            .map(|s| s.chars().count())
            .sum();
        assert_eq!(recombined, input.chars().count());
    }

    #[test]
    fn test_row_classifier_routes_whole_cells() {
        let (ascii, unicode) = split_row(&["plain", "café"]);
        assert_eq!(ascii, vec!["plain", ""]);
        assert_eq!(unicode, vec!["", "café"]);
    }

    #[test]
    fn test_row_classifier_mixed_cell_is_unicode_wholesale() {
        // Deliberately asymmetric with the line classifier: the ASCII part of
        // a mixed cell is not split out.
        let (ascii, unicode) = split_row(&["price: 5€"]);
        assert_eq!(ascii, vec![""]);
        assert_eq!(unicode, vec!["price: 5€"]);
    }

    #[test]
    fn test_row_classifier_does_not_trim() {
        let (ascii, unicode) = split_row(&["  spaced ", ""]);
        assert_eq!(ascii, vec!["  spaced ", ""]);
        assert_eq!(unicode, vec!["", ""]);
    }

    #[test]
    fn test_split_rows_preserves_shape() {
        let rows = vec![
            vec!["a".to_string(), "ü".to_string(), "c".to_string()],
            vec!["".to_string(), "".to_string(), "".to_string()],
        ];
        let split = split_rows(&rows);
        assert_eq!(split.ascii.len(), 2);
        assert_eq!(split.unicode.len(), 2);
        assert!(split.ascii.iter().all(|row| row.len() == 3));
        assert_eq!(split.partition(Partition::Unicode)[0], vec!["", "ü", ""]);
    }
}
