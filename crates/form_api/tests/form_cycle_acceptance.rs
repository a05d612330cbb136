use std::sync::Arc;

use form_api::{DonationForm, FormController, FormEvent, RecordIdentity, VolunteerForm};
use shared::domain::{DonationInput, VolunteerLogInput};
use storage::{SlotStore, Storage, TracingDiagnostics};

#[tokio::test]
async fn forms_share_one_database_without_touching_each_others_slots() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        temp_root
            .path()
            .join("forms.db")
            .to_string_lossy()
            .replace('\\', "/")
    );
    let slots: Arc<dyn SlotStore> = Arc::new(Storage::new(&database_url).await.expect("db"));

    let mut donations: FormController<DonationForm> =
        FormController::open(slots.clone(), Arc::new(TracingDiagnostics))
            .await
            .expect("donations");
    let mut logs: FormController<VolunteerForm> =
        FormController::open(slots.clone(), Arc::new(TracingDiagnostics))
            .await
            .expect("logs");

    donations
        .handle(FormEvent::Submit(DonationInput {
            charity_name: "Charity A".into(),
            donation_amount: "100".into(),
            donation_date: "2024-11-26".into(),
            donor_message: "Great cause!".into(),
        }))
        .await
        .expect("donation");
    donations
        .handle(FormEvent::Submit(DonationInput {
            charity_name: "Charity B".into(),
            donation_amount: "50".into(),
            donation_date: "2024-11-27".into(),
            donor_message: String::new(),
        }))
        .await
        .expect("donation");
    logs.handle(FormEvent::Submit(VolunteerLogInput {
        charity_name: "Charity ABC".into(),
        hours_volunteered: "5".into(),
        date: "2024-11-26".into(),
        experience_rating: "4".into(),
    }))
    .await
    .expect("log");

    let view = donations
        .handle(FormEvent::Delete(RecordIdentity::Position(0)))
        .await
        .expect("delete");
    assert_eq!(view.aggregate.to_string(), "Total Donated: $50.00");

    drop(donations);
    drop(logs);
    drop(slots);

    let reopened: Arc<dyn SlotStore> = Arc::new(Storage::new(&database_url).await.expect("db"));
    let donations: FormController<DonationForm> =
        FormController::open(reopened.clone(), Arc::new(TracingDiagnostics))
            .await
            .expect("donations");
    let logs: FormController<VolunteerForm> =
        FormController::open(reopened, Arc::new(TracingDiagnostics))
            .await
            .expect("logs");

    assert_eq!(donations.records().len(), 1);
    assert_eq!(donations.records()[0].charity_name, "Charity B");
    assert_eq!(logs.view().aggregate.formatted_total(), Some("5"));
}
