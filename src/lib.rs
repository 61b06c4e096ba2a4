//! # uamir - Universal Assignment Manager client
//!
//! A client for the Universal Assignment Manager (UAM) API of the
//! recruiting and contingent staffing products. It assigns document requests
//! to candidates, lists what is assigned, sends reminders and deletes
//! requests, on behalf of an administrative user.
//!
//! ## Quick Start
//!
//! ```no_run
//! use uamir::AssignmentManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), uamir::Error> {
//!     // Fetches a session key; fails if none is handed out.
//!     let manager = AssignmentManager::new("acme", "acme-staffing", 1001).await?;
//!
//!     // Request document 17 (a form) from candidate 42
//!     manager.assign_document(42, 17, "form").await?;
//!
//!     let docs = manager.get_assigned_documents(42).await?;
//!     println!("{} documents outstanding", docs.len());
//!
//!     // Remind the candidate about all of them at once
//!     manager.send_reminder_for_all(42).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! Every call goes to a single endpoint, with the action selected by the
//! `action` query parameter. Parameters are flat `key=value` pairs joined by
//! `&`, written without escaping (see [`params`]). Responses are JSON objects
//! with the outcome nested under an action-specific envelope key, except the
//! session-key action, which answers with a script containing
//! `sessionKey = '<token>';`.
//!
//! ## Error Handling
//!
//! No call is retried and the session key is never refreshed implicitly.
//! Failures fall into four classes, see [`ErrorKind`]:
//!
//! ```no_run
//! use uamir::{AssignmentManager, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let mut manager = AssignmentManager::new("acme", "acme-staffing", 1001).await?;
//! let result = manager.delete_request(42, 17, "form").await;
//! match result {
//!     Ok(response) => println!("Deleted: {}", response.data),
//!     Err(Error::HttpStatus { status, .. }) => eprintln!("HTTP error {}", status),
//!     Err(Error::InvalidJson { raw_response, .. }) => {
//!         eprintln!("Not JSON, refreshing session: {}", raw_response);
//!         manager.update_session_key().await?;
//!     }
//!     Err(Error::ActionRejected { envelope, .. }) => eprintln!("Rejected: {}", envelope),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod envelope;
mod error;
pub mod params;
mod response;
pub mod session;
mod transport;

pub use client::{AssignmentManager, ClientBuilder};
pub use envelope::AssignedDocument;
pub use error::{Error, ErrorKind, Result};
pub use response::Response;
pub use session::ClientContext;
