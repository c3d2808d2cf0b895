/// One data record of a table
///
/// Rows read from disk remember their raw text so that a rewrite puts
/// untouched rows back exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    raw: Option<String>,
    fields: Vec<String>,
}

impl Row {
    /// Build a fresh row (serialized on write)
    pub fn new(fields: Vec<String>) -> Self {
        Self { raw: None, fields }
    }

    pub(crate) fn from_disk(raw: &str, fields: Vec<String>) -> Self {
        Self {
            raw: Some(raw.to_string()),
            fields,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `idx`, empty when the row is short
    pub fn get(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replace a field; the row is re-serialized on the next rewrite
    pub fn set(&mut self, idx: usize, value: impl Into<String>) {
        if self.fields.len() <= idx {
            self.fields.resize(idx + 1, String::new());
        }
        self.fields[idx] = value.into();
        self.raw = None;
    }

    /// Raw text as read from disk, line terminator included, if the row is
    /// unchanged
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}
