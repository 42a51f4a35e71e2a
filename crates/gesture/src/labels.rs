use crate::{GestureError, error::LabelTable};
use std::path::Path;

/// Class-id to label mapping, read once at startup from a one-column CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    table: LabelTable,
    names: Vec<String>,
}

impl Labels {
    pub fn new(table: LabelTable, names: Vec<String>) -> Self {
        Self { table, names }
    }

    /// Parse CSV text: the first field of every non-empty row is a label.
    /// A leading UTF-8 byte order mark is ignored.
    pub fn from_csv(table: LabelTable, text: &str) -> Result<Self, GestureError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut names = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let name = first_field(line).ok_or_else(|| {
                GestureError::InvalidLabels(format!("unterminated quote on line {}", line_no + 1))
            })?;
            names.push(name);
        }
        if names.is_empty() {
            return Err(GestureError::InvalidLabels(format!("{table} label file is empty")));
        }
        Ok(Self { table, names })
    }

    pub fn load(table: LabelTable, path: impl AsRef<Path>) -> Result<Self, GestureError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv(table, &text)
    }

    pub fn get(&self, id: usize) -> Result<&str, GestureError> {
        self.names
            .get(id)
            .map(String::as_str)
            .ok_or(GestureError::UnknownLabel {
                table: self.table,
                id,
            })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn table(&self) -> LabelTable {
        self.table
    }

    /// Every class id a classifier can produce must have a label, and no
    /// label may be unreachable.
    pub fn validate(&self, classes: usize) -> Result<(), GestureError> {
        if self.names.len() != classes {
            return Err(GestureError::ConfigurationMismatch {
                table: self.table,
                labels: self.names.len(),
                classes,
            });
        }
        Ok(())
    }
}

fn first_field(line: &str) -> Option<String> {
    let line = line.trim_end_matches('\r');
    let Some(quoted) = line.strip_prefix('"') else {
        return Some(line.split(',').next().unwrap_or_default().to_string());
    };
    let mut field = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                field.push('"');
            } else {
                return Some(field);
            }
        } else {
            field.push(c);
        }
    }
    None
}
