pub mod error;
pub mod http;
pub mod types;

pub use error::ClientError;
pub use http::{StatusClient, StatusSource};
pub use types::{Resolution, StatusRequest, StatusResponse};
