//! Ordered key/value sections describing the live state of a service

use crate::traits::{Output, ServiceStatus};
use indexmap::IndexMap;
use std::fmt;

/// A renderable table value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Bool(bool),
    Number(u64),
    Status(ServiceStatus),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Status(s) => f.write_str(s.as_str()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&ServiceStatus> for Cell {
    fn from(value: &ServiceStatus) -> Self {
        Cell::Status(value.clone())
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value)
    }
}

/// Labelled values of one table section, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    rows: IndexMap<String, Cell>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, label: &str, value: impl Into<Cell>) -> Self {
        self.rows.insert(label.to_string(), value.into());
        self
    }

    pub fn get(&self, label: &str) -> Option<&Cell> {
        self.rows.get(label)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &Cell)> {
        self.rows.iter()
    }
}

/// Named sections, built fresh for every render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayTable {
    sections: IndexMap<String, Section>,
}

impl DisplayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, section: Section) {
        self.sections.insert(name.to_string(), section);
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Print every section through the terminal output
    pub fn write_to(&self, output: &dyn Output) {
        for (name, section) in &self.sections {
            output.section(name);
            for (label, value) in section.rows() {
                match value {
                    Cell::Status(status) => output.status(label, status),
                    other => output.key_value(label, &other.to_string()),
                }
            }
        }
        output.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockOutput, OutputMessage};

    #[test]
    fn test_sections_keep_insertion_order() {
        let mut table = DisplayTable::new();
        table.push(
            "Monitoring",
            Section::new().row("Status", &ServiceStatus::Active),
        );
        table.push("Grafana", Section::new().row("url", "http://g").row("port", 3000u64));

        assert_eq!(table.section_names(), vec!["Monitoring", "Grafana"]);
        assert_eq!(
            table.section("Grafana").unwrap().get("port"),
            Some(&Cell::Number(3000))
        );
    }

    #[test]
    fn test_write_to_output() {
        let mut table = DisplayTable::new();
        table.push(
            "Exporters",
            Section::new()
                .row("Status", &ServiceStatus::Pending)
                .row("nodeExporter", true),
        );

        let output = MockOutput::new();
        table.write_to(&output);

        assert!(output.contains_message(&OutputMessage::Status(
            "Status".to_string(),
            ServiceStatus::Pending
        )));
        assert!(output.contains_message(&OutputMessage::Section("Exporters".to_string())));
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "nodeExporter".to_string(),
            "true".to_string()
        )));
    }
}
