//! Request handler module
//!
//! Maps one inbound request to one redirect or one error response.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
