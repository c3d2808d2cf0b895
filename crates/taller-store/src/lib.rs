//! Flat-file record store
//!
//! Each table is a delimited text file with a header row. Reads are tolerant
//! (comma or tab, blank lines skipped, missing file is empty); mutations are
//! either a single appended line or a full rewrite of the file.

mod codec;
mod error;
mod row;
mod schema;
mod table;

pub use codec::{format_record, parse_record};
pub use error::StoreError;
pub use row::Row;
pub use schema::{LegacyLayout, Schema};
pub use table::{Edit, SchemaStatus, Table};
