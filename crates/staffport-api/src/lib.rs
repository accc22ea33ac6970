//! Upstream REST access for the HR platform.
//!
//! Everything here is blocking and makes exactly one attempt per request.
//! Authentication failures are fatal; listing failures can be degraded to an
//! empty source with [`degrade`].
//!
//! ```no_run
//! use staffport_api::{ApiClient, EmployeeQuery};
//! use staffport_model::Credentials;
//!
//! fn load() -> staffport_api::Result<()> {
//!     let credentials = Credentials::new("acme", "client", "secret");
//!     let session = ApiClient::for_credentials(&credentials)?.authenticate(&credentials)?;
//!     let records = session.list_employees(EmployeeQuery::default())?;
//!     println!("{} employees", records.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod sources;
pub mod types;

pub use client::{ApiClient, ApiSession, EmployeeQuery, base_url_for_domain};
pub use error::{ApiError, Result};
pub use sources::{Sourced, degrade};
pub use types::{
    OrgFieldDescriptor, ScaleDescriptor, TokenResponse, decode_employees,
    decode_org_fields, decode_scales,
};
