//! Line splitting and field (de)serialization

use tracing::warn;

use crate::error::StoreError;

/// One logical record as found in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Record text without its line terminator
    pub text: &'a str,
    /// Record text exactly as on disk, terminator included
    pub raw: &'a str,
    /// Quotes in this record are plain characters
    pub literal: bool,
}

impl<'a> Line<'a> {
    /// The terminator that ended this record (empty at end of file)
    pub fn terminator(&self) -> &'a str {
        &self.raw[self.text.len()..]
    }
}

/// Split file content into logical records
///
/// A record normally spans one physical line. A quote that starts a field
/// opens a quoted field, which may contain delimiters and newlines until the
/// closing quote. A quote anywhere else is an ordinary character. When a
/// quoted field never closes properly, the record falls back to its single
/// physical line read literally, so one bad row cannot swallow the rest of
/// the file. Blank records are skipped.
pub(crate) fn logical_lines(content: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    while start < content.len() {
        let (len, literal) = record_len(&content[start..]);
        let raw = &content[start..start + len];
        let text = raw.trim_end_matches(['\r', '\n']);
        if !text.trim().is_empty() {
            lines.push(Line { text, raw, literal });
        }
        start += len;
    }
    lines
}

/// Byte length of the record at the start of `s`, terminator included
fn record_len(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    let mut field_start = true;
    let mut in_quotes = false;
    let mut multiline = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            match b {
                b'"' if bytes.get(i + 1) == Some(&b'"') => i += 1,
                b'"' => {
                    in_quotes = false;
                    if multiline && !closes_field(bytes.get(i + 1)) {
                        return (physical_len(s), true);
                    }
                }
                b'\n' => multiline = true,
                _ => {}
            }
        } else {
            match b {
                b'\n' => return (i + 1, false),
                b'"' if field_start => in_quotes = true,
                _ => {}
            }
            field_start = matches!(b, b',' | b'\t');
        }
        i += 1;
    }

    if in_quotes {
        (physical_len(s), true)
    } else {
        (s.len(), false)
    }
}

fn closes_field(next: Option<&u8>) -> bool {
    matches!(next, None | Some(b',' | b'\t' | b'\r' | b'\n' | b' '))
}

fn physical_len(s: &str) -> usize {
    s.find('\n').map(|n| n + 1).unwrap_or(s.len())
}

/// Pick the delimiter for a file from its header line
pub(crate) fn sniff_delimiter(header: &str) -> u8 {
    if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

/// Parse one logical record into trimmed fields
///
/// Files mix comma and tab separated lines depending on which tool wrote
/// them: a record that yields a single field is retried with the other
/// delimiter.
pub fn parse_record(raw: &str, delimiter: u8) -> Result<Vec<String>, StoreError> {
    parse_fields(raw, delimiter, true)
}

pub(crate) fn parse_line(line: &Line<'_>, delimiter: u8) -> Result<Vec<String>, StoreError> {
    parse_fields(line.text, delimiter, !line.literal)
}

fn parse_fields(raw: &str, delimiter: u8, quoting: bool) -> Result<Vec<String>, StoreError> {
    let fields = read_fields(raw, delimiter, quoting)?;
    if fields.len() == 1 {
        let other = if delimiter == b'\t' { b',' } else { b'\t' };
        let alt = read_fields(raw, other, quoting)?;
        if alt.len() > 1 {
            return Ok(alt);
        }
    }
    Ok(fields)
}

fn read_fields(raw: &str, delimiter: u8, quoting: bool) -> Result<Vec<String>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(quoting)
        .delimiter(delimiter)
        .from_reader(raw.as_bytes());

    let mut fields = Vec::new();
    for (n, record) in reader.records().enumerate() {
        if n > 0 {
            warn!(record = n, "record text holds more than one line, keeping all fields");
        }
        fields.extend(record?.iter().map(|f| f.trim().to_string()));
    }
    Ok(fields)
}

/// Serialize fields as one comma-separated record, without terminator
pub fn format_record<S: AsRef<str>>(fields: &[S]) -> Result<String, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|f| f.as_ref()))?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let line = String::from_utf8_lossy(&bytes);
    Ok(line.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(lines: &[Line<'a>]) -> Vec<&'a str> {
        lines.iter().map(|l| l.text).collect()
    }

    #[test]
    fn test_logical_lines_skip_blank() {
        let content = "a,b\r\n\r\n  \nc,d\ne,f";
        let lines = logical_lines(content);
        assert_eq!(texts(&lines), vec!["a,b", "c,d", "e,f"]);
        assert_eq!(lines[0].terminator(), "\r\n");
        assert_eq!(lines[2].terminator(), "");
    }

    #[test]
    fn test_logical_lines_keep_quoted_newline() {
        let content = "1,\"hola\nque tal\",x\n2,y,z\n";
        assert_eq!(texts(&logical_lines(content)), vec!["1,\"hola\nque tal\",x", "2,y,z"]);
    }

    #[test]
    fn test_quote_inside_field_is_plain_text() {
        let content = "Pedro \"el turco,p@x,1\nAna,a@x,2\nLuis,l@x,3\n";
        let lines = logical_lines(content);
        assert_eq!(texts(&lines), vec!["Pedro \"el turco,p@x,1", "Ana,a@x,2", "Luis,l@x,3"]);
        let fields = parse_line(&lines[0], b',').unwrap();
        assert_eq!(fields, vec!["Pedro \"el turco", "p@x", "1"]);
    }

    #[test]
    fn test_unclosed_leading_quote_stays_on_its_line() {
        let content = "\"Pedro,p@x,1\nAna,a@x,2\n\"Luis\" Gomez,l@x,3\n";
        let lines = logical_lines(content);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].literal);
        assert_eq!(parse_line(&lines[0], b',').unwrap(), vec!["\"Pedro", "p@x", "1"]);
        assert_eq!(parse_line(&lines[1], b',').unwrap(), vec!["Ana", "a@x", "2"]);
    }

    #[test]
    fn test_unclosed_quote_at_end_of_file() {
        let lines = logical_lines("Ana,a@x,2\nRueda 15\",x,1\n\"Luis,l@x,3");
        assert_eq!(texts(&lines), vec!["Ana,a@x,2", "Rueda 15\",x,1", "\"Luis,l@x,3"]);
        assert!(lines[2].literal);
    }

    #[test]
    fn test_parse_record_tab_fallback() {
        let fields = parse_record("Juan Perez\tjuan@mail.com\t555", b',').unwrap();
        assert_eq!(fields, vec!["Juan Perez", "juan@mail.com", "555"]);
    }

    #[test]
    fn test_parse_record_trims_and_unquotes() {
        let fields = parse_record(" Ana ,\"Gomez, Ana\",", b',').unwrap();
        assert_eq!(fields, vec!["Ana", "Gomez, Ana", ""]);
    }

    #[test]
    fn test_format_record_quotes_when_needed() {
        let line = format_record(&["plain", "with,comma", "with \"quote\""]).unwrap();
        assert_eq!(line, "plain,\"with,comma\",\"with \"\"quote\"\"\"");
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("a,b,c"), b',');
    }
}
