//! Integration tests for the import session lifecycle

use contactsync_core::error::ImportError;
use contactsync_core::import::SourceKind;
use contactsync_core::models::{Classification, ContactRecord, GENERIC_FAILURE_MESSAGE};
use contactsync_core::session::SessionPhase;

use super::fakes::{FakeDirectory, FakePicker, FakeProvider, failing_session, harness, pages};

const CARDS_AB: &str = "BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Ann Lee\r\n\
EMAIL;TYPE=WORK:ann@cards.example\r\n\
END:VCARD\r\n\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
N:Bell;Bo;;;\r\n\
TEL;TYPE=CELL:+1 555 0102\r\n\
END:VCARD\r\n";

fn names(records: &[ContactRecord]) -> Vec<&str> {
    records.iter().map(|r| r.identity.as_str()).collect()
}

#[tokio::test]
async fn card_then_picker_accumulates_first_introducer_wins() {
    let picker = FakePicker::named(&[("Bo Bell", Some("bo@picker.example")), ("Cy", None)]);
    let mut h = harness(
        Some(picker),
        FakeProvider::granting(),
        FakeDirectory::new(Vec::new()),
    );

    assert_eq!(h.session.populate_card_text(CARDS_AB).await.unwrap(), 2);
    assert_eq!(h.session.populate_picker().await.unwrap(), 1);

    let records = h.session.records();
    assert_eq!(names(records), ["Ann Lee", "Bo Bell", "Cy"]);
    assert_eq!(records[1].email, None);
    assert_eq!(records[1].phone.as_deref(), Some("+1 555 0102"));
    assert_eq!(h.session.phase(), SessionPhase::Populated);
}

#[tokio::test]
async fn dismissed_picker_surfaces_nothing_and_keeps_records() {
    let mut h = harness(
        Some(FakePicker::dismissing()),
        FakeProvider::granting(),
        FakeDirectory::new(Vec::new()),
    );
    h.session.populate_card_text(CARDS_AB).await.unwrap();

    assert_eq!(h.session.populate_picker().await.unwrap(), 0);
    assert!(h.session.last_error().is_none());
    assert_eq!(h.session.phase(), SessionPhase::Populated);
    assert_eq!(names(h.session.records()), ["Ann Lee", "Bo Bell"]);
}

#[tokio::test]
async fn reimport_does_not_restore_selection() {
    let mut h = harness(None, FakeProvider::granting(), FakeDirectory::new(Vec::new()));
    h.session.populate_card_text(CARDS_AB).await.unwrap();
    h.session.toggle_one(0);

    assert_eq!(h.session.populate_card_text(CARDS_AB).await.unwrap(), 0);
    assert!(!h.session.records()[0].selected);
    assert_eq!(h.session.records().len(), 2);
}

#[tokio::test]
async fn removed_record_can_be_reintroduced() {
    let mut h = harness(None, FakeProvider::granting(), FakeDirectory::new(Vec::new()));
    h.session.populate_card_text(CARDS_AB).await.unwrap();

    let removed = h.session.remove_one(0).unwrap();
    assert_eq!(removed.identity, "Ann Lee");
    assert_eq!(names(h.session.records()), ["Bo Bell"]);

    h.session.populate_card_text(CARDS_AB).await.unwrap();
    assert_eq!(names(h.session.records()), ["Bo Bell", "Ann Lee"]);
}

#[tokio::test]
async fn card_then_directory_share_the_store() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["Ann Lee", "Dee"]])),
    );
    h.session.populate_card_text(CARDS_AB).await.unwrap();
    assert_eq!(h.session.populate_directory().await.unwrap(), 1);
    assert_eq!(names(h.session.records()), ["Ann Lee", "Bo Bell", "Dee"]);
    assert_eq!(h.session.active_source(), Some(SourceKind::Directory));
}

#[tokio::test]
async fn submission_sends_selected_rows_with_shared_classification() {
    let mut h = harness(None, FakeProvider::granting(), FakeDirectory::new(Vec::new()));
    h.session.populate_card_text(CARDS_AB).await.unwrap();
    h.session.toggle_one(0);
    h.session.set_classification(Classification::Employee);

    let report = h.session.submit().await.unwrap();
    assert_eq!(report.imported_count, 1);
    assert_eq!(h.session.phase(), SessionPhase::Result);

    let calls = h.backend.bulk_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    assert_eq!(calls[0][0].identity, "Bo Bell");
    assert_eq!(calls[0][0].classification, Classification::Employee);
    assert_eq!(calls[0][0].phone.as_deref(), Some("+1 555 0102"));
}

#[tokio::test]
async fn zero_selected_submission_makes_no_call_and_no_report() {
    let mut h = harness(None, FakeProvider::granting(), FakeDirectory::new(Vec::new()));
    h.session.populate_card_text(CARDS_AB).await.unwrap();
    h.session.toggle_all();
    assert!(h.session.records().iter().all(|r| !r.selected));

    assert!(h.session.submit().await.is_none());
    assert!(h.session.outcome().is_none());
    assert!(h.backend.bulk_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn collaborator_failure_becomes_generic_report() {
    let (mut session, backend) = failing_session();
    session.populate_card_text(CARDS_AB).await.unwrap();

    let report = session.submit().await.unwrap();
    assert_eq!(report.imported_count, 0);
    assert_eq!(report.skipped_count, 0);
    assert_eq!(report.errors, [GENERIC_FAILURE_MESSAGE]);
    assert_eq!(session.outcome(), Some(&report));
    assert_eq!(backend.bulk_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failures_keep_accumulated_records() {
    let mut h = harness(None, FakeProvider::denying(), FakeDirectory::new(Vec::new()));
    h.session.populate_card_text(CARDS_AB).await.unwrap();

    let err = h.session.populate_card_text("BEGIN:VCARD\nEMAIL:x@y.z\nEND:VCARD").await;
    assert!(matches!(err, Err(ImportError::EmptyResult { .. })));
    let err = h.session.populate_directory().await;
    assert!(matches!(err, Err(ImportError::AuthorizationDenied(_))));

    assert_eq!(h.session.records().len(), 2);
    assert_eq!(h.session.phase(), SessionPhase::SourceError);
    assert!(h.session.last_error().is_some());
}

#[tokio::test]
async fn tab_switch_and_close_discard_everything() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["Dee"]])),
    );
    h.session.populate_directory().await.unwrap();
    assert!(h.session.authorization_state().is_some());

    h.session.select_source(SourceKind::Tabular);
    assert!(h.session.records().is_empty());
    assert!(h.session.authorization_state().is_none());

    h.session.populate_card_text(CARDS_AB).await.unwrap();
    h.session.close();
    assert_eq!(h.session.phase(), SessionPhase::Idle);
    assert!(h.session.records().is_empty());
    assert!(h.session.active_source().is_none());
}
