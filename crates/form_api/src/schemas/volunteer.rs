use shared::{
    domain::{RecordId, VolunteerLog, VolunteerLogInput},
    error::{ValidationErrors, Violation},
    view::Aggregate,
};

use crate::{
    presenter::{escape_text, format_quantity, sum_in_order},
    schema::{expect_valid, FormSchema},
    validation::{
        is_date, is_number, is_positive_number, is_whole_number, parse_number,
        parse_whole_number, Validator,
    },
};

pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

const RATING_OUT_OF_RANGE: &str = "Experience rating must be between 1 and 5.";

pub struct VolunteerForm;

/// Deletion by key matches charity and date, first entry only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerKey {
    pub charity_name: String,
    pub date: String,
}

impl FormSchema for VolunteerForm {
    type Input = VolunteerLogInput;
    type Record = VolunteerLog;
    type Key = VolunteerKey;

    const SLOT_KEY: &'static str = "volunteerLogs";
    const TITLE: &'static str = "Volunteer Log";
    const SUCCESS_NOTICE: &'static str = "Volunteer hours logged successfully!";
    const COLUMNS: &'static [&'static str] = &["Charity", "Hours", "Date", "Rating"];

    fn validate(input: &VolunteerLogInput) -> Vec<Violation> {
        let mut v = Validator::new();
        v.field("charityName", &input.charity_name)
            .required("Charity name is required.");
        v.field("hoursVolunteered", &input.hours_volunteered)
            .required("Hours volunteered is required.")
            .format(is_number, "Hours volunteered must be a number.")
            .range(is_positive_number, "Hours volunteered must be greater than 0.");
        v.field("date", &input.date)
            .required("Date is required.")
            .format(is_date, "Invalid date.");
        v.field("experienceRating", &input.experience_rating)
            .required("Experience rating is required.")
            .format(is_whole_number, "Experience rating must be a whole number.")
            .range(
                |s| parse_whole_number(s).is_some_and(|n| RATING_RANGE.contains(&n)),
                RATING_OUT_OF_RANGE,
            );
        v.finish()
    }

    fn build(input: VolunteerLogInput) -> Result<VolunteerLog, ValidationErrors> {
        let hours_volunteered = expect_valid(
            parse_number(&input.hours_volunteered).filter(|n| *n > 0.0),
            "hoursVolunteered",
            "Hours volunteered must be greater than 0.",
        )?;
        let experience_rating = expect_valid(
            parse_whole_number(&input.experience_rating)
                .filter(|n| RATING_RANGE.contains(n))
                .and_then(|n| u8::try_from(n).ok()),
            "experienceRating",
            RATING_OUT_OF_RANGE,
        )?;
        Ok(VolunteerLog {
            id: RecordId::new(),
            charity_name: input.charity_name.trim().to_string(),
            hours_volunteered,
            date: input.date.trim().to_string(),
            experience_rating,
        })
    }

    fn key(record: &VolunteerLog) -> VolunteerKey {
        VolunteerKey {
            charity_name: record.charity_name.clone(),
            date: record.date.clone(),
        }
    }

    fn cells(record: &VolunteerLog) -> Vec<String> {
        vec![
            escape_text(&record.charity_name),
            format_quantity(record.hours_volunteered),
            escape_text(&record.date),
            record.experience_rating.to_string(),
        ]
    }

    fn aggregate(records: &[VolunteerLog]) -> Aggregate {
        let total = sum_in_order(records, |log| log.hours_volunteered);
        Aggregate::Total {
            label: "Total Hours".to_string(),
            total,
            formatted: format_quantity(total),
        }
    }
}
