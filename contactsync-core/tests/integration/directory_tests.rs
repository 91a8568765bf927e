//! Integration tests for the remote directory authorization and sweep

use std::sync::Arc;
use std::sync::atomic::Ordering;

use contactsync_core::error::ImportError;
use contactsync_core::import::ContactSource;
use contactsync_core::import::directory::{
    CONSENT_PROMPT, ConnectionsPage, DIRECTORY_READONLY_SCOPE, DirectoryImporter, MAX_PAGE_SIZE,
};

use super::fakes::{FakeDirectory, FakeProvider, harness, pages, person};

#[tokio::test]
async fn three_pages_of_two_yield_six_records() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["A", "B"], &["C", "D"], &["E", "F"]])),
    );

    let added = h.session.populate_directory().await.unwrap();
    assert_eq!(added, 6);
    assert_eq!(h.session.records().len(), 6);
    assert_eq!(h.directory.request_count(), 3);

    let requests = h.directory.requests.lock().unwrap();
    assert!(requests.iter().all(|r| r.page_size == MAX_PAGE_SIZE));
    assert_eq!(requests[2].page_token.as_deref(), Some("p2"));
}

#[tokio::test]
async fn denied_authorization_fetches_nothing() {
    let mut h = harness(
        None,
        FakeProvider::denying(),
        FakeDirectory::new(pages(&[&["A"]])),
    );

    let err = h.session.populate_directory().await.unwrap_err();
    assert!(matches!(err, ImportError::AuthorizationDenied(ref m) if m.contains("access_denied")));
    assert!(h.session.records().is_empty());
    assert_eq!(h.directory.request_count(), 0);

    let state = h.session.authorization_state().unwrap();
    assert!(state.last_error.is_some());
    assert!(!state.in_flight);
    assert!(state.token_client_ready);
}

#[tokio::test]
async fn token_request_forces_consent_for_read_only_scope() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["A"]])),
    );
    h.session.populate_directory().await.unwrap();

    let requests = h.provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].scope, DIRECTORY_READONLY_SCOPE);
    assert_eq!(requests[0].prompt, CONSENT_PROMPT);
}

#[tokio::test]
async fn client_is_loaded_once_per_session() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["A"]])),
    );
    h.session.populate_directory().await.unwrap();
    h.session.populate_directory().await.unwrap();
    assert_eq!(h.provider.loads.load(Ordering::SeqCst), 1);

    h.session.close();
    h.session.populate_directory().await.unwrap();
    assert_eq!(h.provider.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_page_yields_no_partial_batch() {
    let mut listing = pages(&[&["A", "B"], &["C"]]);
    listing[1].next_page_token = Some("p9".into());
    let mut h = harness(None, FakeProvider::granting(), FakeDirectory::new(listing));

    let err = h.session.populate_directory().await.unwrap_err();
    assert!(matches!(err, ImportError::FetchFailed(_)));
    assert!(h.session.records().is_empty());
    assert!(!h.session.authorization_state().unwrap().in_flight);
}

#[tokio::test]
async fn entries_without_names_are_skipped() {
    let listing = vec![ConnectionsPage {
        connections: vec![
            person("Ann", Some("ann@example.com")),
            contactsync_core::import::directory::Person::default(),
        ],
        next_page_token: None,
    }];
    let provider = Arc::new(FakeProvider::granting());
    let importer = DirectoryImporter::new(provider, Arc::new(FakeDirectory::new(listing)));

    let records = importer.produce().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].email.as_deref(), Some("ann@example.com"));
}

#[tokio::test]
async fn overlapping_populations_both_merge() {
    let mut h = harness(
        None,
        FakeProvider::granting(),
        FakeDirectory::new(pages(&[&["Dee", "Eve"]])),
    );
    let directory = h.session.directory_handle().unwrap();

    let first = h.session.begin_populating(contactsync_core::SourceKind::Directory);
    let cards = h.session.begin_populating(contactsync_core::SourceKind::CardText);
    let batch = directory.produce().await;

    h.session
        .accept_batch(
            cards,
            Ok(contactsync_core::CardTextImporter::parse(
                "BEGIN:VCARD\nFN:Eve\nEND:VCARD\nBEGIN:VCARD\nFN:Zed\nEND:VCARD",
            )),
        )
        .unwrap();
    h.session.accept_batch(first, batch).unwrap();

    let names: Vec<_> = h.session.records().iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(names, ["Eve", "Zed", "Dee"]);
}
