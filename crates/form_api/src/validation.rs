//! Ordered field checks that collect every violation instead of stopping at
//! the first one.
//!
//! Checks run in three passes: presence for every field, then format, then
//! range, each pass in the order the fields were declared. A field that has
//! already failed is skipped by later passes, so it reports one violation at
//! most. Optional fields left blank skip format and range checks entirely.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use shared::error::Violation;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

type Check = fn(&str) -> bool;

pub struct FieldRule<'a> {
    field: &'static str,
    value: &'a str,
    required: Option<&'static str>,
    format: Option<(Check, &'static str)>,
    range: Option<(Check, &'static str)>,
}

impl<'a> FieldRule<'a> {
    pub fn required(&mut self, message: &'static str) -> &mut Self {
        self.required = Some(message);
        self
    }

    pub fn format(&mut self, check: Check, message: &'static str) -> &mut Self {
        self.format = Some((check, message));
        self
    }

    pub fn range(&mut self, check: Check, message: &'static str) -> &mut Self {
        self.range = Some((check, message));
        self
    }
}

#[derive(Default)]
pub struct Validator<'a> {
    rules: Vec<FieldRule<'a>>,
}

impl<'a> Validator<'a> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn field(&mut self, field: &'static str, value: &'a str) -> &mut FieldRule<'a> {
        self.rules.push(FieldRule {
            field,
            value: value.trim(),
            required: None,
            format: None,
            range: None,
        });
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    pub fn finish(self) -> Vec<Violation> {
        let mut settled = vec![false; self.rules.len()];
        let mut violations = Vec::new();

        for (idx, rule) in self.rules.iter().enumerate() {
            if !rule.value.is_empty() {
                continue;
            }
            settled[idx] = true;
            if let Some(message) = rule.required {
                violations.push(Violation::new(rule.field, message));
            }
        }

        for pass in [Pass::Format, Pass::Range] {
            for (idx, rule) in self.rules.iter().enumerate() {
                if settled[idx] {
                    continue;
                }
                let check = match pass {
                    Pass::Format => rule.format,
                    Pass::Range => rule.range,
                };
                if let Some((check, message)) = check {
                    if !check(rule.value) {
                        settled[idx] = true;
                        violations.push(Violation::new(rule.field, message));
                    }
                }
            }
        }

        violations
    }
}

#[derive(Clone, Copy)]
enum Pass {
    Format,
    Range,
}

pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

pub fn is_positive_number(value: &str) -> bool {
    parse_number(value).is_some_and(|n| n > 0.0)
}

pub fn parse_whole_number(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn is_whole_number(value: &str) -> bool {
    parse_whole_number(value).is_some()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// One `@`, no whitespace, and a dot somewhere in the domain part.
pub fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
        .is_match(value)
}

pub fn within_chars(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}
