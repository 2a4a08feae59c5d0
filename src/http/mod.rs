//! HTTP protocol layer module
//!
//! Response builders, decoupled from template resolution.

pub mod response;

pub use response::{
    build_405_response, build_error_response, build_health_response, build_options_response,
    build_redirect_response,
};
