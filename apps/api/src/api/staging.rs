// Upload staging
// Streams a multipart file field into a temporary file that lives as long as the request

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tempfile::NamedTempFile;

use crate::domain::lists::UploadError;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// An uploaded file held on disk for the duration of one request
///
/// The backing file is removed when the value is dropped, whichever way the
/// request ends.
pub struct StagedUpload {
    file: NamedTempFile,
    file_name: String,
    content_type: Option<String>,
    size: usize,
    limit: usize,
}

impl StagedUpload {
    /// Creates an empty staging file in `dir`
    pub fn create(
        dir: &Path,
        file_name: impl Into<String>,
        content_type: Option<String>,
        limit: usize,
    ) -> Result<Self, UploadError> {
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)
            .map_err(|e| UploadError::Staging(format!("create in {}: {}", dir.display(), e)))?;

        Ok(Self {
            file,
            file_name: file_name.into(),
            content_type,
            size: 0,
            limit,
        })
    }

    /// Reads the `file` field of a multipart body into a staging file
    ///
    /// Other fields are ignored. The size limit is enforced while streaming,
    /// so an oversized upload never lands on disk in full.
    pub async fn from_multipart(
        multipart: &mut Multipart,
        dir: &Path,
        limit: usize,
    ) -> Result<Self, UploadError> {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = match field.file_name() {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => return Err(UploadError::MissingFile),
            };
            let content_type = field.content_type().map(str::to_string);

            let mut staged = Self::create(dir, file_name, content_type, limit)?;
            while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
                staged.write_chunk(&chunk)?;
            }

            tracing::debug!(
                file = %staged.file_name,
                bytes = staged.size,
                path = %staged.path().display(),
                "Staged upload"
            );
            return Ok(staged);
        }

        Err(UploadError::MissingFile)
    }

    /// Appends bytes, failing once the total passes the limit
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        if self.size + chunk.len() > self.limit {
            return Err(UploadError::FileTooLarge { limit: self.limit });
        }

        self.file
            .write_all(chunk)
            .map_err(|e| UploadError::Staging(format!("write: {}", e)))?;
        self.size += chunk.len();
        Ok(())
    }

    /// Reads the staged contents back
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, UploadError> {
        let io_err = |e: std::io::Error| UploadError::Staging(format!("read back: {}", e));

        self.file.flush().map_err(io_err)?;
        let handle = self.file.as_file_mut();
        handle.seek(SeekFrom::Start(0)).map_err(io_err)?;

        let mut bytes = Vec::with_capacity(self.size);
        handle.read_to_end(&mut bytes).map_err(io_err)?;
        Ok(bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge { limit }
    } else {
        UploadError::Parse(format!("Invalid multipart body: {}", err.body_text()))
    }
}
