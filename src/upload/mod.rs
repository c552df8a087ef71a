pub mod client;
pub mod response;

pub use client::ApiClient;
pub use response::{UploadErrorResponse, UploadResponse, decode_upload_response};
