//! View models handed to whatever draws the form page.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One rendered record. `position` and `id` back the row's delete control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub position: usize,
    pub id: RecordId,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregate {
    Total {
        label: String,
        total: f64,
        formatted: String,
    },
    Breakdown {
        label: String,
        counts: Vec<CategoryCount>,
    },
}

impl Aggregate {
    pub fn count_for(&self, category: &str) -> Option<usize> {
        match self {
            Aggregate::Breakdown { counts, .. } => counts
                .iter()
                .find(|c| c.category == category)
                .map(|c| c.count),
            Aggregate::Total { .. } => None,
        }
    }

    pub fn formatted_total(&self) -> Option<&str> {
        match self {
            Aggregate::Total { formatted, .. } => Some(formatted),
            Aggregate::Breakdown { .. } => None,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Total {
                label, formatted, ..
            } => write!(f, "{label}: {formatted}"),
            Aggregate::Breakdown { label, counts } => {
                write!(f, "{label}:")?;
                for count in counts {
                    write!(f, "\n{}: {}", count.label, count.count)?;
                }
                Ok(())
            }
        }
    }
}

/// Everything the page needs after a trigger completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormView {
    pub title: String,
    pub table: TableView,
    pub aggregate: Aggregate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Set after a successful submission so the inputs get reset.
    #[serde(default)]
    pub clear_inputs: bool,
}
