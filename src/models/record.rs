use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// A registered academic term with its coordinator's email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Unique identifier, assigned once at creation
    pub id: u64,
    /// Term label (e.g. "2024.1")
    /// Older blobs written by the browser version use `nome`
    #[serde(alias = "nome")]
    pub name: String,
    /// Coordinator email
    pub email: String,
}

impl Record {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Record {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Get the label truncated to a display width
    pub fn label_preview(&self, max_width: usize) -> String {
        truncate_to_width(&self.name, max_width)
    }
}

/// Truncate a string to a terminal display width, appending "..." when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// Insertion-ordered collection of records with unique ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        RecordList {
            records: Vec::new(),
        }
    }

    /// Build from a loaded sequence. Fails with the first repeated id.
    pub fn from_records(records: Vec<Record>) -> Result<Self, u64> {
        let mut list = RecordList::new();
        for record in records {
            let id = record.id;
            if !list.push(record) {
                return Err(id);
            }
        }
        Ok(list)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Largest id in the collection (seeds the monotonic generator)
    pub fn max_id(&self) -> Option<u64> {
        self.records.iter().map(|r| r.id).max()
    }

    /// Append a record. Returns false if the id is already taken.
    pub fn push(&mut self, record: Record) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Replace name/email of the record with `id` in place
    /// Returns false if no such record exists
    pub fn replace(&mut self, id: u64, name: String, email: String) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.name = name;
                record.email = email;
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`, returning it if present
    pub fn remove(&mut self, id: u64) -> Option<Record> {
        let pos = self.position(id)?;
        Some(self.records.remove(pos))
    }
}
