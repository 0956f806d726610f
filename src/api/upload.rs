//! Attachment upload

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use std::path::Path;

use super::{ApiClient, ApiError};

/// A file to send in a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming the part after the file
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self { file_name, bytes })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadedUrls {
    Bare(Vec<String>),
    Wrapped { urls: Vec<String> },
}

impl ApiClient {
    /// `POST /api/upload` with one `files` part per file
    ///
    /// All files go in a single request; the returned URLs keep the order
    /// the server reports.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<String>, ApiError> {
        let path = "/api/upload";
        let form = files.into_iter().fold(Form::new(), |form, file| {
            form.part("files", Part::bytes(file.bytes).file_name(file.file_name))
        });
        let builder = self.request(Method::POST, path).multipart(form);
        let urls: UploadedUrls = self.fetch(Method::POST, path, builder).await?;
        Ok(match urls {
            UploadedUrls::Bare(urls) | UploadedUrls::Wrapped { urls } => urls,
        })
    }
}
