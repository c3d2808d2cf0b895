/// Expected layout of a table file
#[derive(Debug)]
pub struct Schema {
    /// Table name used in logs
    pub name: &'static str,
    /// Header columns of the current layout
    pub columns: &'static [&'static str],
    /// Older layouts that can be migrated automatically
    pub legacy: &'static [LegacyLayout],
}

/// An older header and how its columns map onto the current ones
#[derive(Debug)]
pub struct LegacyLayout {
    pub columns: &'static [&'static str],
    /// For each current column, the index of the old column (None = empty)
    pub mapping: &'static [Option<usize>],
}

impl Schema {
    /// Header line as written to disk
    pub fn header_line(&self) -> String {
        self.columns.join(",")
    }

    /// Whether a header read from disk is the current layout
    pub fn matches(&self, header: &[String]) -> bool {
        same_columns(self.columns, header)
    }

    /// Find the legacy layout a header belongs to
    pub fn legacy_for(&self, header: &[String]) -> Option<&LegacyLayout> {
        self.legacy.iter().find(|l| same_columns(l.columns, header))
    }
}

impl LegacyLayout {
    /// Minimum number of fields an old row needs to be migrated
    pub fn required_fields(&self) -> usize {
        self.mapping.iter().flatten().max().map(|m| m + 1).unwrap_or(0)
    }

    /// Remap an old row onto the current columns
    pub fn remap(&self, old: &[String]) -> Vec<String> {
        self.mapping
            .iter()
            .map(|m| m.and_then(|i| old.get(i).cloned()).unwrap_or_default())
            .collect()
    }
}

fn same_columns(expected: &[&str], found: &[String]) -> bool {
    expected.len() == found.len()
        && expected
            .iter()
            .zip(found)
            .all(|(e, f)| e.trim().eq_ignore_ascii_case(f.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    static OLD: LegacyLayout = LegacyLayout {
        columns: &["id", "b", "a"],
        mapping: &[Some(0), Some(2), Some(1), None],
    };

    static SCHEMA: Schema = Schema {
        name: "test",
        columns: &["Id", "A", "B", "C"],
        legacy: &[],
    };

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_match_ignores_case_and_spaces() {
        assert!(SCHEMA.matches(&strings(&["id", " a", "B ", "c"])));
        assert!(!SCHEMA.matches(&strings(&["id", "a", "b"])));
    }

    #[test]
    fn test_remap_fills_missing_columns() {
        let row = OLD.remap(&strings(&["7", "bee", "ay"]));
        assert_eq!(row, strings(&["7", "ay", "bee", ""]));
        assert_eq!(OLD.required_fields(), 3);
    }
}
