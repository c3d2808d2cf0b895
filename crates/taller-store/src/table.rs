//! A delimited text file used as a table

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::codec::{format_record, logical_lines, parse_line, sniff_delimiter};
use crate::error::StoreError;
use crate::row::Row;
use crate::schema::Schema;

/// Outcome of an edit closure passed to [`Table::modify`]
pub enum Edit<T> {
    /// Nothing changed, the file is left alone
    Unchanged(T),
    /// Rows changed, the file is rewritten
    Changed(T),
}

/// What [`Table::ensure_schema`] had to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    Current,
    Created,
    Migrated {
        from: String,
        rows: usize,
        dropped: usize,
    },
    HeaderReplaced {
        found: String,
    },
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::Current => write!(f, "up to date"),
            SchemaStatus::Created => write!(f, "created"),
            SchemaStatus::Migrated { from, rows, dropped } => {
                write!(f, "migrated from [{from}] ({rows} rows, {dropped} dropped)")
            }
            SchemaStatus::HeaderReplaced { found } => write!(f, "header [{found}] replaced"),
        }
    }
}

struct Snapshot {
    header: Option<Vec<String>>,
    header_raw: Option<String>,
    /// Line terminator of the file, taken from its header line
    newline: &'static str,
    rows: Vec<Row>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            header: None,
            header_raw: None,
            newline: "\n",
            rows: Vec::new(),
        }
    }
}

/// How a rewrite lays out the header and line ends
struct Layout {
    /// Header text to keep as is; `None` writes the schema header
    header: Option<String>,
    newline: &'static str,
}

/// Table file bound to a schema
///
/// All operations on one table are serialized by an internal lock, so a
/// read-modify-write through [`Table::modify`] cannot lose a concurrent
/// update from the same process.
pub struct Table {
    path: PathBuf,
    schema: &'static Schema,
    lock: Mutex<()>,
}

impl Table {
    pub fn new(path: impl Into<PathBuf>, schema: &'static Schema) -> Self {
        Self {
            path: path.into(),
            schema,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load all data rows in file order (missing file = no rows)
    pub fn load(&self) -> Result<Vec<Row>, StoreError> {
        let _guard = self.guard();
        Ok(self.read()?.rows)
    }

    /// Append one record and return the number of data rows afterwards
    pub fn append<S: AsRef<str>>(&self, fields: &[S]) -> Result<usize, StoreError> {
        let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self.append_with(|_| Ok::<_, StoreError>(fields))
    }

    /// Append the record `build` derives from the current rows
    ///
    /// Reading the rows and appending happen under the same lock, so ids
    /// computed from existing rows and uniqueness checks done by `build`
    /// cannot race with another append.
    pub fn append_with<E, F>(&self, build: F) -> Result<usize, E>
    where
        E: From<StoreError>,
        F: FnOnce(&[Row]) -> Result<Vec<String>, E>,
    {
        let _guard = self.guard();
        let snapshot = self.read()?;
        let fields = build(&snapshot.rows)?;
        self.write_line(&snapshot, fields.as_slice())?;
        debug!(table = self.schema.name, "appended row");
        Ok(snapshot.rows.len() + 1)
    }

    /// Replace the whole file with the header and `rows`
    pub fn rewrite(&self, rows: &[Row]) -> Result<(), StoreError> {
        let _guard = self.guard();
        let snapshot = self.read()?;
        self.write_rows(rows, &self.layout_of(&snapshot))
    }

    /// Load, edit and (if the edit says so) rewrite, holding the lock throughout
    pub fn modify<T, E, F>(&self, edit: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Vec<Row>) -> Result<Edit<T>, E>,
    {
        let _guard = self.guard();
        let snapshot = self.read()?;
        let layout = self.layout_of(&snapshot);
        let mut rows = snapshot.rows;
        match edit(&mut rows)? {
            Edit::Unchanged(value) => Ok(value),
            Edit::Changed(value) => {
                self.write_rows(&rows, &layout)?;
                Ok(value)
            }
        }
    }

    /// Make sure the file exists with the current header, migrating old layouts
    pub fn ensure_schema(&self) -> Result<SchemaStatus, StoreError> {
        let _guard = self.guard();
        let snapshot = self.read()?;

        let fresh = Layout {
            header: None,
            newline: snapshot.newline,
        };
        let Some(header) = snapshot.header else {
            self.write_rows(&[], &fresh)?;
            info!(table = self.schema.name, path = %self.path.display(), "created table file");
            return Ok(SchemaStatus::Created);
        };

        if self.schema.matches(&header) {
            return Ok(SchemaStatus::Current);
        }

        let found = snapshot.header_raw.unwrap_or_default();
        if let Some(layout) = self.schema.legacy_for(&header) {
            let required = layout.required_fields();
            let total = snapshot.rows.len();
            let migrated: Vec<Row> = snapshot
                .rows
                .iter()
                .filter(|row| row.len() >= required)
                .map(|row| Row::new(layout.remap(row.fields())))
                .collect();
            let dropped = total - migrated.len();
            self.write_rows(&migrated, &fresh)?;
            info!(
                table = self.schema.name,
                from = %found,
                rows = migrated.len(),
                dropped,
                "migrated legacy table layout"
            );
            return Ok(SchemaStatus::Migrated {
                from: found,
                rows: migrated.len(),
                dropped,
            });
        }

        warn!(
            table = self.schema.name,
            expected = %self.schema.header_line(),
            found = %found,
            "unrecognised header, replacing it and keeping rows"
        );
        self.write_rows(&snapshot.rows, &fresh)?;
        Ok(SchemaStatus::HeaderReplaced { found })
    }

    /// Current header text when it already is the schema's, so rewrites keep it
    fn layout_of(&self, snapshot: &Snapshot) -> Layout {
        let header = match (&snapshot.header, &snapshot.header_raw) {
            (Some(fields), Some(raw)) if self.schema.matches(fields) => Some(raw.clone()),
            _ => None,
        };
        Layout {
            header,
            newline: snapshot.newline,
        }
    }

    fn write_line<S: AsRef<str>>(&self, snapshot: &Snapshot, fields: &[S]) -> Result<(), StoreError> {
        if snapshot.header.is_none() {
            let fresh = Layout {
                header: None,
                newline: snapshot.newline,
            };
            self.write_rows(&[], &fresh)?;
        }

        let line = format_record(fields)?;
        let needs_newline = !ends_with_newline(&self.path)?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if needs_newline {
            file.write_all(snapshot.newline.as_bytes())?;
        }
        file.write_all(line.as_bytes())?;
        file.write_all(snapshot.newline.as_bytes())?;
        Ok(())
    }

    fn read(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::empty());
        }

        let bytes = fs::read(&self.path)?;
        let content = String::from_utf8_lossy(&bytes);
        let content = content.trim_start_matches('\u{feff}');
        let lines = logical_lines(content);

        let Some((first, rest)) = lines.split_first() else {
            return Ok(Snapshot::empty());
        };

        let delimiter = sniff_delimiter(first.text);
        let header = parse_line(first, delimiter)?;
        let mut rows = Vec::with_capacity(rest.len());
        for line in rest {
            let fields = parse_line(line, delimiter)?;
            rows.push(Row::from_disk(line.raw, fields));
        }

        Ok(Snapshot {
            header: Some(header),
            header_raw: Some(first.text.to_string()),
            newline: if first.terminator() == "\r\n" { "\r\n" } else { "\n" },
            rows,
        })
    }

    fn write_rows(&self, rows: &[Row], layout: &Layout) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut content = match &layout.header {
            Some(header) => header.clone(),
            None => self.schema.header_line(),
        };
        content.push_str(layout.newline);
        for row in rows {
            match row.raw() {
                Some(raw) => {
                    content.push_str(raw);
                    if !raw.ends_with('\n') {
                        content.push_str(layout.newline);
                    }
                }
                None => {
                    content.push_str(&format_record(row.fields())?);
                    content.push_str(layout.newline);
                }
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        debug!(table = self.schema.name, rows = rows.len(), "rewrote table file");
        Ok(())
    }
}

fn ends_with_newline(path: &Path) -> Result<bool, StoreError> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LegacyLayout;
    use tempfile::tempdir;

    static PEOPLE: Schema = Schema {
        name: "people",
        columns: &["Name", "Email", "Phone"],
        legacy: &[LegacyLayout {
            columns: &["Email", "Name"],
            mapping: &[Some(1), Some(0), None],
        }],
    };

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.get(0)).collect()
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let table = Table::new(dir.path().join("people.csv"), &PEOPLE);
        assert!(table.load().unwrap().is_empty());
        assert!(!table.path().exists());
    }

    #[test]
    fn test_append_creates_header_and_counts() {
        let dir = tempdir().unwrap();
        let table = Table::new(dir.path().join("sub").join("people.csv"), &PEOPLE);
        assert_eq!(table.append(&["Ana", "ana@x.com", ""]).unwrap(), 1);
        assert_eq!(table.append(&["Beto", "b@x.com", "55"]).unwrap(), 2);

        let content = fs::read_to_string(table.path()).unwrap();
        assert_eq!(content, "Name,Email,Phone\nAna,ana@x.com,\nBeto,b@x.com,55\n");
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\nAna,a@x.com,1").unwrap();
        let table = Table::new(&path, &PEOPLE);
        table.append(&["Beto", "b@x.com", "2"]).unwrap();
        assert_eq!(names(&table.load().unwrap()), vec!["Ana", "Beto"]);
    }

    #[test]
    fn test_load_tolerates_tabs_and_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\n\nAna\ta@x.com\t1\n   \nBeto , b@x.com , 2\n").unwrap();
        let rows = Table::new(&path, &PEOPLE).load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields(), &["Ana", "a@x.com", "1"]);
        assert_eq!(rows[1].get(1), "b@x.com");
    }

    #[test]
    fn test_modify_keeps_untouched_rows_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\n Ana ,a@x.com,  1\nBeto,b@x.com,2\nCarla\tc@x.com\t3\n").unwrap();
        let table = Table::new(&path, &PEOPLE);

        table
            .modify(|rows| -> Result<Edit<()>, StoreError> {
                rows[1].set(2, "99");
                Ok(Edit::Changed(()))
            })
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,Email,Phone\n Ana ,a@x.com,  1\nBeto,b@x.com,99\nCarla\tc@x.com\t3\n"
        );
    }

    #[test]
    fn test_modify_keeps_crlf_rows_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\r\nAna,a@x.com,1\r\nBob,b@x.com,2\r\n").unwrap();
        let table = Table::new(&path, &PEOPLE);

        table
            .modify(|rows| -> Result<Edit<()>, StoreError> {
                rows[1].set(0, "Rob");
                Ok(Edit::Changed(()))
            })
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Name,Email,Phone\r\nAna,a@x.com,1\r\nRob,b@x.com,2\r\n"
        );

        table.append(&["Carla", "c@x.com", "3"]).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("Rob,b@x.com,2\r\nCarla,c@x.com,3\r\n"));
    }

    #[test]
    fn test_stray_quote_does_not_hide_following_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let original = "Name,Email,Phone\nPedro \"el turco,p@x,1\nAna,a@x,2\nLuis,l@x,3\n";
        fs::write(&path, original).unwrap();
        let table = Table::new(&path, &PEOPLE);

        let rows = table.load().unwrap();
        assert_eq!(names(&rows), vec!["Pedro \"el turco", "Ana", "Luis"]);

        table
            .modify(|rows| -> Result<Edit<()>, StoreError> {
                rows[2].set(2, "9");
                Ok(Edit::Changed(()))
            })
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Name,Email,Phone\nPedro \"el turco,p@x,1\nAna,a@x,2\nLuis,l@x,9\n"
        );
    }

    #[test]
    fn test_last_row_without_newline_is_terminated_on_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\nAna,a@x.com,1\nBob,b@x.com,2").unwrap();
        let table = Table::new(&path, &PEOPLE);
        table
            .modify(|rows| -> Result<Edit<()>, StoreError> {
                rows[0].set(2, "5");
                Ok(Edit::Changed(()))
            })
            .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Name,Email,Phone\nAna,a@x.com,5\nBob,b@x.com,2\n"
        );
    }

    #[test]
    fn test_modify_unchanged_does_not_touch_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "Name,Email,Phone\r\nAna,a@x.com,1\r\n").unwrap();
        let table = Table::new(&path, &PEOPLE);
        let count = table
            .modify(|rows| -> Result<Edit<usize>, StoreError> { Ok(Edit::Unchanged(rows.len())) })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,Email,Phone\r\nAna,a@x.com,1\r\n");
    }

    #[test]
    fn test_ensure_schema_creates_file() {
        let dir = tempdir().unwrap();
        let table = Table::new(dir.path().join("people.csv"), &PEOPLE);
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Created);
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Current);
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "Name,Email,Phone\n");
    }

    #[test]
    fn test_ensure_schema_migrates_legacy_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "email, name\na@x.com,Ana\nbroken\n").unwrap();
        let table = Table::new(&path, &PEOPLE);

        let status = table.ensure_schema().unwrap();
        assert_eq!(
            status,
            SchemaStatus::Migrated {
                from: "email, name".to_string(),
                rows: 1,
                dropped: 1
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,Email,Phone\nAna,a@x.com,\n");
    }

    #[test]
    fn test_ensure_schema_replaces_unknown_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "whatever\nAna,a@x.com,1\n").unwrap();
        let table = Table::new(&path, &PEOPLE);

        let status = table.ensure_schema().unwrap();
        assert_eq!(
            status,
            SchemaStatus::HeaderReplaced {
                found: "whatever".to_string()
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,Email,Phone\nAna,a@x.com,1\n");
    }
}
