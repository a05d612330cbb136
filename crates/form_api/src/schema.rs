use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::Identified,
    error::{ValidationErrors, Violation},
    view::Aggregate,
};

/// One form's field schema: how its input is checked, how records are
/// keyed for deletion, and how they are displayed and summarised.
pub trait FormSchema: Send + Sync + 'static {
    type Input: Send;
    type Record: Serialize + DeserializeOwned + Identified + Clone + Debug + Send + Sync;
    /// Fields a delete control can match on when no id is at hand.
    type Key: PartialEq + Debug + Send + Sync;

    /// Persistence slot holding this form's record sequence.
    const SLOT_KEY: &'static str;
    const TITLE: &'static str;
    const SUCCESS_NOTICE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn validate(input: &Self::Input) -> Vec<Violation>;

    /// Builds the typed record from input that already passed `validate`.
    fn build(input: Self::Input) -> Result<Self::Record, ValidationErrors>;

    fn key(record: &Self::Record) -> Self::Key;

    /// Display cells, one per entry of `COLUMNS`.
    fn cells(record: &Self::Record) -> Vec<String>;

    fn aggregate(records: &[Self::Record]) -> Aggregate;
}

/// Validates and, when clean, builds a record with a fresh id.
pub fn parse<S: FormSchema>(input: S::Input) -> Result<S::Record, ValidationErrors> {
    let violations = S::validate(&input);
    if !violations.is_empty() {
        return Err(ValidationErrors(violations));
    }
    S::build(input)
}

/// Re-checks a value `build` expects to be valid.
pub(crate) fn expect_valid<T>(
    value: Option<T>,
    field: &'static str,
    message: &'static str,
) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationErrors(vec![Violation::new(field, message)]))
}
