// Security module for caller authentication
//
// Network-facing transports require callers to present the server API key.
// STDIO is a private pipe to the parent process and is not checked.

pub mod api_key;

pub use api_key::{ApiKeyError, verify_api_key};
