//! In-memory collaborators shared by the integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contactsync_core::endpoint::{BulkImportEndpoint, BulkImportRow, FileImportEndpoint};
use contactsync_core::error::{
    AuthorizationError, DirectoryError, SubmissionError, SubmissionResult,
};
use contactsync_core::import::directory::{
    AccessToken, AuthorizationProvider, ConnectionsApi, ConnectionsPage, FieldMetadata,
    ListRequest, NameField, Person, TokenRequest, TokenResponder, ValueField,
};
use contactsync_core::import::{ContactPicker, ContactProperty, PickerError, RawContact};
use contactsync_core::models::OutcomeReport;
use contactsync_core::session::{
    DirectoryCollaborators, ImportSession, SessionCollaborators, SessionOptions,
};

/// Backend recording every bulk call
#[derive(Default)]
pub struct FakeBackend {
    pub fail: bool,
    pub bulk_calls: Mutex<Vec<Vec<BulkImportRow>>>,
}

#[async_trait]
impl BulkImportEndpoint for FakeBackend {
    async fn bulk_import(&self, rows: &[BulkImportRow]) -> SubmissionResult<OutcomeReport> {
        self.bulk_calls.lock().unwrap().push(rows.to_vec());
        if self.fail {
            return Err(SubmissionError::Transport("connection refused".into()));
        }
        Ok(OutcomeReport::new(rows.len(), 0, Vec::new()))
    }
}

#[async_trait]
impl FileImportEndpoint for FakeBackend {
    async fn import_file(
        &self,
        _file_name: &str,
        _contents: Vec<u8>,
    ) -> SubmissionResult<OutcomeReport> {
        Ok(OutcomeReport::new(0, 0, Vec::new()))
    }
}

/// Picker returning a fixed list of contacts, or dismissed by the operator
pub struct FakePicker {
    pub contacts: Vec<RawContact>,
    pub dismissed: bool,
}

impl FakePicker {
    pub fn named(entries: &[(&str, Option<&str>)]) -> Self {
        Self {
            contacts: entries
                .iter()
                .map(|(name, email)| RawContact {
                    name: vec![(*name).to_string()],
                    email: email.iter().map(ToString::to_string).collect(),
                    tel: Vec::new(),
                })
                .collect(),
            dismissed: false,
        }
    }

    pub fn dismissing() -> Self {
        Self {
            contacts: Vec::new(),
            dismissed: true,
        }
    }
}

#[async_trait]
impl ContactPicker for FakePicker {
    fn has_feature(&self) -> bool {
        true
    }

    async fn select(
        &self,
        _properties: &[ContactProperty],
        _multiple: bool,
    ) -> Result<Vec<RawContact>, PickerError> {
        if self.dismissed {
            return Err(PickerError::Cancelled);
        }
        Ok(self.contacts.clone())
    }
}

/// Provider that either grants `token` or denies with `access_denied`
pub struct FakeProvider {
    pub grant: bool,
    pub loads: AtomicUsize,
    pub requests: Mutex<Vec<TokenRequest>>,
}

impl FakeProvider {
    pub fn granting() -> Self {
        Self {
            grant: true,
            loads: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn denying() -> Self {
        Self {
            grant: false,
            ..Self::granting()
        }
    }
}

#[async_trait]
impl AuthorizationProvider for FakeProvider {
    async fn load_client(&self) -> Result<(), AuthorizationError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn request_token(&self, request: TokenRequest, responder: TokenResponder) {
        self.requests.lock().unwrap().push(request);
        if self.grant {
            responder.grant(AccessToken::new("token"));
        } else {
            responder.deny("access_denied");
        }
    }
}

/// Listing serving pre-built pages in order
pub struct FakeDirectory {
    pub pages: Vec<ConnectionsPage>,
    pub requests: Mutex<Vec<ListRequest>>,
}

impl FakeDirectory {
    pub fn new(pages: Vec<ConnectionsPage>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ConnectionsApi for FakeDirectory {
    async fn list_connections(
        &self,
        token: &AccessToken,
        request: &ListRequest,
    ) -> Result<ConnectionsPage, DirectoryError> {
        if token.expose() != "token" {
            return Err(DirectoryError::Unauthorized(401));
        }
        let mut requests = self.requests.lock().unwrap();
        let index = match &request.page_token {
            None => 0,
            Some(t) => t
                .trim_start_matches('p')
                .parse::<usize>()
                .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?,
        };
        requests.push(request.clone());
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| DirectoryError::Status {
                status: 400,
                body: "bad page token".into(),
            })
    }
}

pub fn person(name: &str, email: Option<&str>) -> Person {
    Person {
        names: vec![NameField {
            display_name: Some(name.to_string()),
            metadata: FieldMetadata { primary: true },
        }],
        email_addresses: email
            .map(|e| {
                vec![ValueField {
                    value: Some(e.to_string()),
                    metadata: FieldMetadata::default(),
                }]
            })
            .unwrap_or_default(),
        phone_numbers: Vec::new(),
    }
}

/// Builds pages whose continuation tokens are `p1`, `p2`, ...
pub fn pages(entries: &[&[&str]]) -> Vec<ConnectionsPage> {
    entries
        .iter()
        .enumerate()
        .map(|(i, names)| ConnectionsPage {
            connections: names.iter().map(|n| person(n, None)).collect(),
            next_page_token: (i + 1 < entries.len()).then(|| format!("p{}", i + 1)),
        })
        .collect()
}

pub struct Harness {
    pub session: ImportSession,
    pub backend: Arc<FakeBackend>,
    pub provider: Arc<FakeProvider>,
    pub directory: Arc<FakeDirectory>,
}

pub fn harness(picker: Option<FakePicker>, provider: FakeProvider, listing: FakeDirectory) -> Harness {
    let backend = Arc::new(FakeBackend::default());
    let provider = Arc::new(provider);
    let directory = Arc::new(listing);
    let collaborators = SessionCollaborators {
        bulk_import: backend.clone(),
        file_import: backend.clone(),
        picker: picker.map(|p| Arc::new(p) as Arc<dyn ContactPicker>),
        directory: Some(DirectoryCollaborators::new(provider.clone(), directory.clone())),
    };
    Harness {
        session: ImportSession::new(collaborators, SessionOptions::default()),
        backend,
        provider,
        directory,
    }
}

/// Session whose bulk endpoint always fails
pub fn failing_session() -> (ImportSession, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend {
        fail: true,
        ..Default::default()
    });
    let collaborators = SessionCollaborators {
        bulk_import: backend.clone(),
        file_import: backend.clone(),
        picker: None,
        directory: None,
    };
    (
        ImportSession::new(collaborators, SessionOptions::default()),
        backend,
    )
}
