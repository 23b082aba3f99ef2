//! REST surface of the TangibleX node

pub mod errors;
pub mod handlers;
pub mod server;

pub use errors::{ApiError, ApiResult, NOT_DEPLOYED_MESSAGE};
pub use server::{create_router, start_api_server, AppState};
