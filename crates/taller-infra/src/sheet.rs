//! Spreadsheet exports shared by the price list and the filter catalog
//!
//! Both are `;` separated text written by spreadsheet tools. Exports from
//! older tools come as Windows-1252 instead of UTF-8.

use encoding_rs::WINDOWS_1252;
use thiserror::Error;
use tracing::warn;

use taller_types::ConfigError;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to read spreadsheet export: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse spreadsheet export: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    #[error("Spreadsheet export has no {0:?} column")]
    MissingColumn(&'static str),
}

impl From<SheetError> for taller_types::Error {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::IoError(e) => taller_types::Error::Io(e),
            SheetError::CsvError(e) => taller_types::Error::Csv(e),
            other => taller_types::Error::Config(ConfigError::ParseError(other.to_string())),
        }
    }
}

/// The delimiter as the byte the csv reader needs
pub fn delimiter_byte(delimiter: char) -> Result<u8, SheetError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(SheetError::InvalidDelimiter(delimiter))
    }
}

/// Decode file bytes, falling back to Windows-1252
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("some characters of a spreadsheet export could not be decoded");
            }
            decoded.into_owned()
        }
    }
}

/// Reader over an export with a header line, fields trimmed
pub fn reader(text: &str, delimiter: char) -> Result<csv::Reader<&[u8]>, SheetError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter_byte(delimiter)?)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert!(matches!(delimiter_byte('¦'), Err(SheetError::InvalidDelimiter('¦'))));
    }

    #[test]
    fn test_decode_utf8_bom_and_latin1() {
        assert_eq!(decode("\u{feff}Bujía".as_bytes()), "Bujía");
        assert_eq!(decode(&[b'B', b'u', b'j', 0xED, b'a']), "Bujía");
    }
}
