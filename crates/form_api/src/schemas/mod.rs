mod donation;
mod signup;
mod volunteer;

pub use donation::{DonationForm, DonationKey, MESSAGE_MAX_CHARS};
pub use signup::{SignupForm, SignupKey};
pub use volunteer::{VolunteerForm, VolunteerKey, RATING_RANGE};

#[cfg(test)]
#[path = "../tests/schemas_tests.rs"]
mod tests;
