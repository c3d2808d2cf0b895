//! Price list loader
//!
//! The price list is a spreadsheet export maintained outside this program:
//! `;` separated, one header line, read by column position.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use taller_domain::model::PriceItem;
use taller_domain::repository::PriceListRepository;

use crate::sheet::{decode, reader, SheetError};

/// Column positions of the price list export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceListLayout {
    pub delimiter: char,
    pub code_column: usize,
    pub description_column: usize,
    pub price_column: usize,
    pub stock_column: usize,
    /// Absent in exports without categories
    pub category_column: Option<usize>,
}

impl Default for PriceListLayout {
    fn default() -> Self {
        Self {
            delimiter: ';',
            code_column: 0,
            description_column: 1,
            price_column: 2,
            stock_column: 3,
            category_column: Some(4),
        }
    }
}

/// Parse a price as written in the sheet
///
/// Accepts `1.234,56`, `1234.56`, `$ 1.234` and plain integers. A single dot
/// followed by exactly three digits is a thousands separator.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if let Some((_, decimals)) = cleaned.rsplit_once('.') {
        if cleaned.matches('.').count() > 1 || decimals.len() == 3 {
            cleaned.replace('.', "")
        } else {
            cleaned
        }
    } else {
        cleaned
    };
    normalized.parse().ok()
}

/// Parse the whole export
pub fn parse_price_list(text: &str, layout: &PriceListLayout) -> Result<Vec<PriceItem>, SheetError> {
    let mut reader = reader(text, layout.delimiter)?;
    let mut items = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let code = field(layout.code_column);
        if code.is_empty() {
            continue;
        }
        let Some(unit_price) = parse_price(&field(layout.price_column)) else {
            debug!(row = row_idx + 2, code = %code, "price list row without a usable price");
            continue;
        };
        items.push(PriceItem {
            code,
            description: field(layout.description_column),
            unit_price,
            stock: field(layout.stock_column),
            category: layout.category_column.map(field).unwrap_or_default(),
        });
    }
    Ok(items)
}

/// Load a price list file
pub fn load_price_list<P: AsRef<Path>>(
    path: P,
    layout: &PriceListLayout,
) -> Result<Vec<PriceItem>, SheetError> {
    let bytes = fs::read(path)?;
    parse_price_list(&decode(&bytes), layout)
}

/// Price list read from disk on every query, so edits to the export are
/// picked up without a restart
pub struct FilePriceListRepository {
    path: PathBuf,
    layout: PriceListLayout,
}

impl FilePriceListRepository {
    pub fn new(path: impl Into<PathBuf>, layout: PriceListLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceListRepository for FilePriceListRepository {
    fn find_all(&self) -> Result<Vec<PriceItem>, taller_types::Error> {
        Ok(load_price_list(&self.path, &self.layout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use tempfile::tempdir;

    #[test]
    fn test_parse_price_forms() {
        assert_eq!(parse_price("1.234,56"), Some(1234.56));
        assert_eq!(parse_price("1234.56"), Some(1234.56));
        assert_eq!(parse_price("$ 1.234"), Some(1234.0));
        assert_eq!(parse_price("$60.000"), Some(60000.0));
        assert_eq!(parse_price("1.234.567"), Some(1234567.0));
        assert_eq!(parse_price("850"), Some(850.0));
        assert_eq!(parse_price("consultar"), None);
    }

    #[test]
    fn test_parse_price_list_by_columns() {
        let text = "Codigo;Descripcion;Precio;Stock;Rubro\n\
                    ACE-01;Aceite 10W40 1L;$ 8.500,50;12;aceites\n\
                    ;fila vacia;1;1;x\n\
                    FIL-02;Filtro aire;consultar;0;complementos\n\
                    FIL-03;Filtro aceite;4200;3;complementos\n";
        let items = parse_price_list(text, &PriceListLayout::default()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price, 8500.5);
        assert_eq!(items[0].category, "aceites");
        assert_eq!(items[1].code, "FIL-03");
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let layout = PriceListLayout {
            delimiter: '¦',
            ..PriceListLayout::default()
        };
        let err = parse_price_list("Codigo¦Precio\nA¦1\n", &layout).unwrap_err();
        assert!(matches!(err, SheetError::InvalidDelimiter('¦')));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lista.csv");
        let (bytes, _, _) = WINDOWS_1252.encode("Codigo;Descripcion;Precio;Stock;Rubro\nB-1;Bujía;1500;4;complementos\n");
        fs::write(&path, &bytes).unwrap();

        let repo = FilePriceListRepository::new(&path, PriceListLayout::default());
        let item = repo.find_by_code("b-1").unwrap().unwrap();
        assert_eq!(item.description, "Bujía");
        assert_eq!(repo.find_by_category("COMPLEMENTOS").unwrap().len(), 1);
    }
}
