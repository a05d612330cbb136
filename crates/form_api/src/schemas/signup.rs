use shared::{
    domain::{EventSignup, EventSignupInput, RecordId, Role},
    error::{ValidationErrors, Violation},
    view::Aggregate,
};

use crate::{
    presenter::{breakdown, escape_text},
    schema::{expect_valid, FormSchema},
    validation::{is_email, Validator},
};

const ROLE_UNKNOWN: &str = "Role must be one of: sponsor, participant, organizer.";

pub struct SignupForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupKey {
    pub event_name: String,
    pub representative_email: String,
}

impl FormSchema for SignupForm {
    type Input = EventSignupInput;
    type Record = EventSignup;
    type Key = SignupKey;

    const SLOT_KEY: &'static str = "eventSignups";
    const TITLE: &'static str = "Event Signups";
    const SUCCESS_NOTICE: &'static str = "Form sign up successfully!";
    const COLUMNS: &'static [&'static str] = &["Event Name", "Participant Name", "Email", "Role"];

    fn validate(input: &EventSignupInput) -> Vec<Violation> {
        let mut v = Validator::new();
        v.field("eventName", &input.event_name)
            .required("Event name is required.");
        v.field("representativeName", &input.representative_name)
            .required("Representative's name is required.");
        v.field("representativeEmail", &input.representative_email)
            .required("Representative's email is required.")
            .format(is_email, "Valid email is required.");
        v.field("role", &input.role)
            .required("Role selection is required.")
            .format(|s| s.parse::<Role>().is_ok(), ROLE_UNKNOWN);
        v.finish()
    }

    fn build(input: EventSignupInput) -> Result<EventSignup, ValidationErrors> {
        let role = expect_valid(input.role.parse::<Role>().ok(), "role", ROLE_UNKNOWN)?;
        Ok(EventSignup {
            id: RecordId::new(),
            event_name: input.event_name.trim().to_string(),
            representative_name: input.representative_name.trim().to_string(),
            representative_email: input.representative_email.trim().to_string(),
            role,
        })
    }

    fn key(record: &EventSignup) -> SignupKey {
        SignupKey {
            event_name: record.event_name.clone(),
            representative_email: record.representative_email.clone(),
        }
    }

    fn cells(record: &EventSignup) -> Vec<String> {
        vec![
            escape_text(&record.event_name),
            escape_text(&record.representative_name),
            escape_text(&record.representative_email),
            record.role.as_str().to_string(),
        ]
    }

    fn aggregate(records: &[EventSignup]) -> Aggregate {
        breakdown(
            "Upcoming Events",
            &Role::ALL,
            records,
            |signup| signup.role,
            |role| (role.as_str().to_string(), role.plural_label().to_string()),
        )
    }
}
