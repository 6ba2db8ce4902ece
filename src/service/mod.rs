//! Chat service client
//!
//! The remote assistant is opaque: it answers a text query on `/chat` and an
//! image upload on `/upload_image`, both with `{response}` or `{error}`.
//! `ChatBackend` is the seam the conversation controller talks to.

pub mod http;

pub use http::HttpChatService;

use crate::{ParleyError, Result};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remote assistant contract (dyn-compatible)
pub trait ChatBackend: Send + Sync {
    /// Ask a question; resolves to the assistant's answer text.
    fn chat(&self, query: String) -> BoxFuture<'_, Result<String>>;

    /// Upload an image; resolves to the assistant's answer text.
    fn upload_image(&self, file: UploadFile) -> BoxFuture<'_, Result<String>>;
}

/// Body of a `/chat` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
}

/// Reply body shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceReply {
    /// An error payload wins over a response; a reply with neither is malformed.
    pub fn into_result(self) -> Result<String> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(ParleyError::ServiceError(error));
        }
        self.response
            .ok_or_else(|| ParleyError::ServiceError("malformed reply: no response field".into()))
    }
}

/// Decode a reply body into the answer text
pub fn parse_reply(body: &[u8]) -> Result<String> {
    let reply: ServiceReply = serde_json::from_slice(body)
        .map_err(|e| ParleyError::ServiceError(format!("malformed reply: {}", e)))?;
    reply.into_result()
}

/// A file picked by the user for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(&name).to_string();
        Self {
            name,
            bytes,
            mime_type,
        }
    }

    /// Read a file from disk, naming it after its final path component
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ParleyError::IoError(format!("Not a file: {}", path.display())))?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// MIME type from the file extension
pub fn guess_mime_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
