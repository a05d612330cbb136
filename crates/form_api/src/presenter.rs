//! Pure transformations from a record sequence to view models.

use shared::{
    domain::Identified,
    view::{Aggregate, CategoryCount, TableRow, TableView},
};

use crate::schema::FormSchema;

pub fn render<S: FormSchema>(records: &[S::Record]) -> TableView {
    TableView {
        columns: S::COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: records
            .iter()
            .enumerate()
            .map(|(position, record)| TableRow {
                position,
                id: record.id(),
                cells: S::cells(record),
            })
            .collect(),
    }
}

pub fn aggregate<S: FormSchema>(records: &[S::Record]) -> Aggregate {
    S::aggregate(records)
}

/// Left-to-right sum, so the result only depends on sequence order.
/// Saturates at `f64::MAX` instead of overflowing to infinity.
pub fn sum_in_order<T>(records: &[T], value: impl Fn(&T) -> f64) -> f64 {
    records
        .iter()
        .fold(0.0, |acc, record| (acc + value(record)).min(f64::MAX))
}

/// Two decimals, with halves rounded away from zero (`10.125` is `$10.13`).
pub fn format_currency(amount: f64) -> String {
    let cents = amount * 100.0;
    let rounded = if cents.is_finite() {
        cents.round() / 100.0
    } else {
        amount
    };
    format!("${rounded:.2}")
}

/// Shortest form: `5` rather than `5.0`, `2.5` as is.
pub fn format_quantity(value: f64) -> String {
    format!("{value}")
}

/// Counts per category, starting every known category at zero.
pub fn breakdown<T, C>(
    label: &str,
    categories: &[C],
    records: &[T],
    category_of: impl Fn(&T) -> C,
    describe: impl Fn(&C) -> (String, String),
) -> Aggregate
where
    C: PartialEq,
{
    let mut counts: Vec<usize> = vec![0; categories.len()];
    for record in records {
        let category = category_of(record);
        if let Some(idx) = categories.iter().position(|c| *c == category) {
            counts[idx] += 1;
        }
    }
    Aggregate::Breakdown {
        label: label.to_string(),
        counts: categories
            .iter()
            .zip(counts)
            .map(|(category, count)| {
                let (category, label) = describe(category);
                CategoryCount {
                    category,
                    label,
                    count,
                }
            })
            .collect(),
    }
}

/// Escapes text for safe display inside markup.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
