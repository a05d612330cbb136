use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identity generated for every record when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

pub trait Identified {
    fn id(&self) -> RecordId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sponsor,
    Participant,
    Organizer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Sponsor, Role::Participant, Role::Organizer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sponsor => "sponsor",
            Role::Participant => "participant",
            Role::Organizer => "organizer",
        }
    }

    /// Plural heading used in the role breakdown.
    pub fn plural_label(self) -> &'static str {
        match self {
            Role::Sponsor => "Sponsors",
            Role::Participant => "Participants",
            Role::Organizer => "Organizers",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownRole(normalized.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(default)]
    pub id: RecordId,
    pub charity_name: String,
    pub donation_amount: f64,
    pub donation_date: String,
    #[serde(default)]
    pub donor_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerLog {
    #[serde(default)]
    pub id: RecordId,
    pub charity_name: String,
    pub hours_volunteered: f64,
    pub date: String,
    pub experience_rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSignup {
    #[serde(default)]
    pub id: RecordId,
    pub event_name: String,
    pub representative_name: String,
    pub representative_email: String,
    pub role: Role,
}

macro_rules! identified {
    ($($name:ident),+) => {
        $(
            impl Identified for $name {
                fn id(&self) -> RecordId {
                    self.id
                }
            }
        )+
    };
}

identified!(Donation, VolunteerLog, EventSignup);

/// Raw field values exactly as collected from the donation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationInput {
    pub charity_name: String,
    pub donation_amount: String,
    pub donation_date: String,
    #[serde(default)]
    pub donor_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerLogInput {
    pub charity_name: String,
    pub hours_volunteered: String,
    pub date: String,
    pub experience_rating: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSignupInput {
    pub event_name: String,
    pub representative_name: String,
    pub representative_email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(" Sponsor ".parse::<Role>(), Ok(Role::Sponsor));
        assert_eq!("organizer".parse::<Role>(), Ok(Role::Organizer));
        assert_eq!(
            "judge".parse::<Role>().expect_err("unknown").to_string(),
            "unknown role 'judge'"
        );
    }

    #[test]
    fn donation_uses_form_field_names_on_the_wire() {
        let donation = Donation {
            id: RecordId::new(),
            charity_name: "Charity A".into(),
            donation_amount: 100.0,
            donation_date: "2024-11-26".into(),
            donor_message: "Great cause!".into(),
        };
        let value = serde_json::to_value(&donation).expect("serialize");
        assert_eq!(value["charityName"], "Charity A");
        assert_eq!(value["donationAmount"], 100.0);
        assert_eq!(value["donorMessage"], "Great cause!");
        assert_eq!(value["id"], donation.id.to_string());
    }

    #[test]
    fn legacy_entries_without_id_get_one_on_load() {
        let raw = r#"[{"charityName":"Charity ABC","hoursVolunteered":5,"date":"2024-11-26","experienceRating":4}]"#;
        let logs: Vec<VolunteerLog> = serde_json::from_str(raw).expect("legacy logs");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].hours_volunteered, 5.0);
        assert!(!logs[0].id.0.is_nil());
    }
}
