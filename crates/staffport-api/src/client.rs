//! Blocking HTTP client for the HR platform API.

use chrono::NaiveDate;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, info};

use staffport_model::{Credentials, EmployeeRecord};

use crate::error::{ApiError, Result};
use crate::types::{
    OrgFieldDescriptor, ScaleDescriptor, TokenResponse, decode_employees, decode_org_fields,
    decode_scales,
};

/// API version header value sent with every request.
const API_VERSION: &str = "v3";

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("staffport/", env!("CARGO_PKG_VERSION"));

/// Longest response body kept in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Base URL for a tenant domain such as `acme.sb`.
pub fn base_url_for_domain(domain: &str) -> String {
    format!("https://{}.catalystone.com/mono/api", domain.trim())
}

/// Filters for the employees listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub include_inactive: bool,
    /// Only timeline history from this date onwards.
    pub timeline_since: Option<NaiveDate>,
}

impl EmployeeQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.include_inactive {
            params.push(("includeInactive", "true".to_string()));
        }
        if let Some(since) = self.timeline_since {
            params.push(("timelineSince", since.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Client bound to one API base URL, before authentication.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (without trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Api-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::Config(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Client for the tenant named in `credentials`.
    pub fn for_credentials(credentials: &Credentials) -> Result<Self> {
        Self::new(base_url_for_domain(&credentials.domain))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Acquires an access token and returns an authenticated session.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<ApiSession> {
        if !credentials.is_complete() {
            return Err(ApiError::Auth(
                "domain, client id and client secret are required".to_string(),
            ));
        }
        let url = format!("{}/accesstoken", self.base_url);
        debug!(url = %url, "requesting access token");

        let response = self
            .client
            .get(&url)
            .header("Client-Id", &credentials.client_id)
            .header("Client-Secret", &credentials.client_secret)
            .header("Grant-Type", "client_credentials")
            .send()
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = truncated_body(response);
            return Err(ApiError::Auth(format!("status {status}: {body}")));
        }
        let token: TokenResponse = response
            .json()
            .map_err(|e| ApiError::Auth(format!("unreadable token response: {e}")))?;
        let token = token
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Auth("no access_token in response".to_string()))?;

        info!(base_url = %self.base_url, "access token acquired");
        Ok(ApiSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        })
    }
}

/// Authenticated session. Every request makes a single attempt.
#[derive(Clone)]
pub struct ApiSession {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiSession {
    /// Raw `employees` listing body.
    pub fn employees_json(&self, query: EmployeeQuery) -> Result<Value> {
        let url = Url::parse_with_params(&format!("{}/employees", self.base_url), query.params())
            .map_err(|e| ApiError::Config(e.to_string()))?;
        self.get_json("employees", url.as_str())
    }

    /// Decoded employee records.
    pub fn list_employees(&self, query: EmployeeQuery) -> Result<Vec<EmployeeRecord>> {
        let body = self.employees_json(query)?;
        let records = decode_employees(&body);
        info!(count = records.len(), "employees loaded");
        Ok(records)
    }

    pub fn lists_json(&self) -> Result<Value> {
        self.get_json("lists", &format!("{}/lists", self.base_url))
    }

    pub fn list_scales(&self) -> Result<Vec<ScaleDescriptor>> {
        Ok(decode_scales(&self.lists_json()?))
    }

    pub fn organizations_json(&self) -> Result<Value> {
        self.get_json("organizations", &format!("{}/organizations", self.base_url))
    }

    pub fn list_org_fields(&self) -> Result<Vec<OrgFieldDescriptor>> {
        Ok(decode_org_fields(&self.organizations_json()?))
    }

    /// Downloads a document from an absolute link.
    pub fn fetch_binary(&self, link: &str) -> Result<Vec<u8>> {
        debug!(url = %link, "fetching document");
        let response = self.authorized(link).send()?;
        let response = check_status("document", response)?;
        Ok(response.bytes()?.to_vec())
    }

    fn get_json(&self, resource: &str, url: &str) -> Result<Value> {
        debug!(resource, url = %url, "requesting resource");
        let response = self.authorized(url).send()?;
        let response = check_status(resource, response)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn authorized(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(url)
            .header("Access-Token", &self.token)
            .header(ACCEPT, "application/json")
    }
}

fn check_status(resource: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ApiError::Status {
        resource: resource.to_string(),
        status: status.as_u16(),
        body: truncated_body(response),
    })
}

fn truncated_body(response: Response) -> String {
    let mut body = response.text().unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_for_domain() {
        assert_eq!(
            base_url_for_domain(" acme.sb "),
            "https://acme.sb.catalystone.com/mono/api"
        );
    }

    #[test]
    fn test_client_creation_trims_slash() {
        let client = ApiClient::new("https://example.test/api/").expect("client");
        assert_eq!(client.base_url(), "https://example.test/api");
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn test_query_params() {
        assert!(EmployeeQuery::default().params().is_empty());
        let query = EmployeeQuery {
            include_inactive: true,
            timeline_since: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            query.params(),
            vec![
                ("includeInactive", "true".to_string()),
                ("timelineSince", "2024-03-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_incomplete_credentials_fail_before_request() {
        let client = ApiClient::new("https://example.test/api").expect("client");
        let credentials = Credentials::new("example", "", "");
        let error = client.authenticate(&credentials).expect_err("auth fails");
        assert!(matches!(error, ApiError::Auth(_)));
    }
}
