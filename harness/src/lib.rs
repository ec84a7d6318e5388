pub mod assertion;
mod config;
mod data;
mod envelope;
mod error;
mod http_client;
pub mod json_path;
pub mod logging;
pub mod mock;
mod request;
mod response;
mod test_session;
pub mod util;

pub use apiharness_codegen::harness_test;
pub use assertion::{AssertionError, AssertionResult};
pub use config::Config;
pub use data::{RequestData, ResponseData};
pub use envelope::Envelope;
pub use error::Error;
pub use http_client::{HttpClient, HttpClientBuilder, RequestBuilder};
pub use request::{RequestBody, RequestDescriptor};
pub use response::ApiResponse;
pub use test_session::{TestContext, TestOutcome};
