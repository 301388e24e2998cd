//! Public types for the Pedia API.

mod envelope;
mod request;
mod response;

pub use envelope::{ErrorCode, ToolEnvelope, ToolError};
pub use request::{DEFAULT_BASE_URL, QueryKind, RequestKey};
pub use response::ResponseValue;
