//! Validate, store, render and summarise form submissions.

pub mod controller;
pub mod error;
pub mod events;
pub mod presenter;
pub mod schema;
pub mod schemas;
pub mod validation;

pub use controller::FormController;
pub use error::FormError;
pub use events::{FormEvent, RecordIdentity};
pub use schema::{parse, FormSchema};
pub use schemas::{DonationForm, SignupForm, VolunteerForm};
