use shared::{
    domain::{Donation, DonationInput, RecordId},
    error::{ValidationErrors, Violation},
    view::Aggregate,
};

use crate::{
    presenter::{escape_text, format_currency, sum_in_order},
    schema::{expect_valid, FormSchema},
    validation::{is_date, is_number, parse_number, within_chars, Validator},
};

pub const MESSAGE_MAX_CHARS: usize = 255;

const AMOUNT_INVALID: &str = "Donation Amount must be a valid positive number.";

pub struct DonationForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationKey {
    pub charity_name: String,
    pub donation_date: String,
}

impl FormSchema for DonationForm {
    type Input = DonationInput;
    type Record = Donation;
    type Key = DonationKey;

    const SLOT_KEY: &'static str = "donations";
    const TITLE: &'static str = "Donation Tracker";
    const SUCCESS_NOTICE: &'static str =
        "Donation submitted successfully! Thank you for your contribution.";
    const COLUMNS: &'static [&'static str] = &["Charity", "Amount", "Date", "Message"];

    fn validate(input: &DonationInput) -> Vec<Violation> {
        let mut v = Validator::new();
        v.field("charityName", &input.charity_name)
            .required("Charity Name is required.");
        v.field("donationAmount", &input.donation_amount)
            .required("Donation Amount is required.")
            .format(is_number, AMOUNT_INVALID)
            .range(|s| parse_number(s).is_some_and(|n| n > 0.0), AMOUNT_INVALID);
        v.field("donationDate", &input.donation_date)
            .required("Donation Date is required.")
            .format(is_date, "Invalid Donation Date.");
        v.field("donorMessage", &input.donor_message).range(
            |s| within_chars(s, MESSAGE_MAX_CHARS),
            "Message should not exceed 255 characters.",
        );
        v.finish()
    }

    fn build(input: DonationInput) -> Result<Donation, ValidationErrors> {
        let donation_amount = expect_valid(
            parse_number(&input.donation_amount).filter(|n| *n > 0.0),
            "donationAmount",
            AMOUNT_INVALID,
        )?;
        Ok(Donation {
            id: RecordId::new(),
            charity_name: input.charity_name.trim().to_string(),
            donation_amount,
            donation_date: input.donation_date.trim().to_string(),
            donor_message: input.donor_message.trim().to_string(),
        })
    }

    fn key(record: &Donation) -> DonationKey {
        DonationKey {
            charity_name: record.charity_name.clone(),
            donation_date: record.donation_date.clone(),
        }
    }

    fn cells(record: &Donation) -> Vec<String> {
        vec![
            escape_text(&record.charity_name),
            format_currency(record.donation_amount),
            escape_text(&record.donation_date),
            escape_text(&record.donor_message),
        ]
    }

    fn aggregate(records: &[Donation]) -> Aggregate {
        let total = sum_in_order(records, |d| d.donation_amount);
        Aggregate::Total {
            label: "Total Donated".to_string(),
            total,
            formatted: format_currency(total),
        }
    }
}
