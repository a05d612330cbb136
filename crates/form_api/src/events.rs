//! Triggers a form page can raise against its controller.

use std::fmt;

use shared::domain::RecordId;

use crate::schema::FormSchema;

/// How a delete control names the row it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordIdentity<K> {
    Position(usize),
    Id(RecordId),
    /// Matches the first record whose key fields are equal.
    Key(K),
}

impl<K: fmt::Debug> fmt::Display for RecordIdentity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIdentity::Position(position) => write!(f, "position {position}"),
            RecordIdentity::Id(id) => write!(f, "id {id}"),
            RecordIdentity::Key(key) => write!(f, "key {key:?}"),
        }
    }
}

pub enum FormEvent<S: FormSchema> {
    /// Form submitted; default navigation is already suppressed by the caller.
    Submit(S::Input),
    Delete(RecordIdentity<S::Key>),
    Clear,
    /// Page load: render what is already persisted.
    Refresh,
}

impl<S: FormSchema> FormEvent<S> {
    pub fn name(&self) -> &'static str {
        match self {
            FormEvent::Submit(_) => "submit",
            FormEvent::Delete(_) => "delete",
            FormEvent::Clear => "clear",
            FormEvent::Refresh => "refresh",
        }
    }
}
