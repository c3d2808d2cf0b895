//! Vehicle to filter catalog
//!
//! A spreadsheet export with one row per vehicle, filter element and
//! candidate part. Unlike the price list it is read by header name, since
//! the sheet gets columns added over time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use taller_domain::model::FilterApplication;
use taller_domain::repository::FilterCatalogRepository;

use crate::sheet::{decode, reader, SheetError};

const MAKE: &str = "Marca";
const MODEL: &str = "Modelo";
const ENGINE: &str = "Motor";
const ELEMENT: &str = "Elemento";
const MAN_CODE: &str = "Codigo Man";
const WIX_CODE: &str = "Codigo Wix";
const FUEL: &str = "Combustible";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCatalogLayout {
    pub delimiter: char,
}

impl Default for FilterCatalogLayout {
    fn default() -> Self {
        Self { delimiter: ';' }
    }
}

/// Parse the whole export
///
/// Rows with fewer fields than the header are skipped. The part code and
/// fuel columns may be missing; make, model, engine and element may not.
pub fn parse_filter_catalog(
    text: &str,
    layout: &FilterCatalogLayout,
) -> Result<Vec<FilterApplication>, SheetError> {
    let mut reader = reader(text, layout.delimiter)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let required = |name: &'static str| position(name).ok_or(SheetError::MissingColumn(name));

    let make = required(MAKE)?;
    let model = required(MODEL)?;
    let engine = required(ENGINE)?;
    let element = required(ELEMENT)?;
    let man_code = position(MAN_CODE);
    let wix_code = position(WIX_CODE);
    let fuel = position(FUEL);

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() < headers.len() {
            debug!(row = row_idx + 2, "filter catalog row shorter than its header");
            continue;
        }
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
        };
        rows.push(FilterApplication {
            make: field(Some(make)),
            model: field(Some(model)),
            engine: field(Some(engine)),
            element: field(Some(element)),
            man_code: field(man_code),
            wix_code: field(wix_code),
            fuel: field(fuel),
        });
    }
    Ok(rows)
}

pub fn load_filter_catalog<P: AsRef<Path>>(
    path: P,
    layout: &FilterCatalogLayout,
) -> Result<Vec<FilterApplication>, SheetError> {
    let bytes = fs::read(path)?;
    parse_filter_catalog(&decode(&bytes), layout)
}

/// Catalog read from disk on every query
pub struct FileFilterCatalogRepository {
    path: PathBuf,
    layout: FilterCatalogLayout,
}

impl FileFilterCatalogRepository {
    pub fn new(path: impl Into<PathBuf>, layout: FilterCatalogLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FilterCatalogRepository for FileFilterCatalogRepository {
    fn find_all(&self) -> Result<Vec<FilterApplication>, taller_types::Error> {
        Ok(load_filter_catalog(&self.path, &self.layout)?)
    }
}
