//! People-API-shaped connections listing.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::endpoint::truncate;
use crate::error::DirectoryError;
use crate::models::ContactRecord;

use super::auth::AccessToken;

/// Person fields requested from the listing
pub const PERSON_FIELDS: &str = "names,emailAddresses,phoneNumbers";

/// Largest page size the listing accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default listing host
pub const DEFAULT_API_BASE: &str = "https://people.googleapis.com";

const CONNECTIONS_PATH: &str = "v1/people/me/connections";

/// Per-value metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    /// Marks the value the owner chose as primary
    #[serde(default)]
    pub primary: bool,
}

/// A name value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameField {
    /// Formatted display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Value metadata
    #[serde(default)]
    pub metadata: FieldMetadata,
}

/// An email or phone value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueField {
    /// Raw value
    #[serde(default)]
    pub value: Option<String>,
    /// Value metadata
    #[serde(default)]
    pub metadata: FieldMetadata,
}

/// One listing entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Names
    #[serde(default)]
    pub names: Vec<NameField>,
    /// Email addresses
    #[serde(default)]
    pub email_addresses: Vec<ValueField>,
    /// Phone numbers
    #[serde(default)]
    pub phone_numbers: Vec<ValueField>,
}

trait Field {
    fn text(&self) -> Option<&str>;
    fn is_primary(&self) -> bool;
}

impl Field for NameField {
    fn text(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn is_primary(&self) -> bool {
        self.metadata.primary
    }
}

impl Field for ValueField {
    fn text(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn is_primary(&self) -> bool {
        self.metadata.primary
    }
}

/// Primary value if one is marked, otherwise the first non-blank one
fn preferred<F: Field>(fields: &[F]) -> Option<&str> {
    let mut present = fields
        .iter()
        .filter(|f| f.text().is_some_and(|t| !t.trim().is_empty()));
    let first = present.clone().next();
    present
        .find(|f| f.is_primary())
        .or(first)
        .and_then(Field::text)
}

impl Person {
    /// Maps the entry to a record, or `None` without a display name
    #[must_use]
    pub fn to_record(&self) -> Option<ContactRecord> {
        Some(
            ContactRecord::new(preferred(&self.names)?)?
                .with_email(preferred(&self.email_addresses))
                .with_phone(preferred(&self.phone_numbers)),
        )
    }
}

/// One page of the listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsPage {
    /// Entries on this page
    #[serde(default)]
    pub connections: Vec<Person>,
    /// Continuation token; absent or empty on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ConnectionsPage {
    /// Returns the continuation token if another page follows
    #[must_use]
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Parameters of one listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Comma-separated person fields
    pub fields: String,
    /// Entries per page
    pub page_size: u32,
    /// Continuation token from the previous page
    pub page_token: Option<String>,
}

/// Bearer-authenticated connections listing
#[async_trait]
pub trait ConnectionsApi: Send + Sync {
    /// Fetches one page
    async fn list_connections(
        &self,
        token: &AccessToken,
        request: &ListRequest,
    ) -> Result<ConnectionsPage, DirectoryError>;
}

/// HTTP client for the People API connections listing
#[derive(Debug, Clone)]
pub struct PeopleApiClient {
    client: reqwest::Client,
    api_base: String,
}

impl PeopleApiClient {
    /// Creates a client rooted at `api_base`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_base: impl Into<String>) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn connections_url(&self) -> String {
        format!("{}/{CONNECTIONS_PATH}", self.api_base)
    }
}

#[async_trait]
impl ConnectionsApi for PeopleApiClient {
    #[instrument(skip(self, token, request), fields(page_size = request.page_size))]
    async fn list_connections(
        &self,
        token: &AccessToken,
        request: &ListRequest,
    ) -> Result<ConnectionsPage, DirectoryError> {
        let mut query = vec![
            ("personFields", request.fields.clone()),
            ("pageSize", request.page_size.to_string()),
        ];
        if let Some(page_token) = &request.page_token {
            query.push(("pageToken", page_token.clone()));
        }

        let response = self
            .client
            .get(self.connections_url())
            .bearer_auth(token.expose())
            .query(&query)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DirectoryError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let page = response
            .json::<ConnectionsPage>()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;
        debug!(entries = page.connections.len(), "Fetched connections page");
        Ok(page)
    }
}
