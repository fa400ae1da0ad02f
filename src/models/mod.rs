//! Models Module
//!
//! Request descriptors, parameter serialization and response payloads.

mod params;
mod requests;
mod responses;

pub use params::{build_params, build_query, Params};
pub use requests::{HttpVerb, RequestDescriptor, KEY_GLUE};
pub use responses::{ApiResponse, STATUS_NETWORK_ERROR};
