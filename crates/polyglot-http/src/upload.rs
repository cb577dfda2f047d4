//! File upload and download URLs

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::id::FileId;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// Multipart upload endpoint
pub const UPLOAD_PATH: &str = "/File/UploadFile";

/// Download endpoint; the file id goes in the `id` query parameter
pub const DOWNLOAD_PATH: &str = "/File/DownloadFile/download";

const FILE_FIELD: &str = "file";

/// A file about to be uploaded
#[derive(Debug, Clone)]
pub struct UploadFile {
	/// Original file name
	pub file_name: String,
	/// File contents
	pub bytes: Vec<u8>,
	/// MIME type, if known
	pub mime: Option<String>,
}

impl UploadFile {
	/// File with unknown MIME type
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			file_name: file_name.into(),
			bytes: bytes.into(),
			mime: None,
		}
	}

	/// Set the MIME type
	pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = Some(mime.into());
		self
	}
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	/// Server-assigned file id, to be embedded in entity fields
	pub id: FileId,
	/// Name the file was uploaded under
	pub file_name: String,
}

impl ApiClient {
	/// Upload `file` as multipart field `file`.
	///
	/// The bytes are moved into the request and not kept afterwards.
	pub async fn upload(&self, file: UploadFile) -> ApiResult<UploadedFile> {
		let UploadFile {
			file_name,
			bytes,
			mime,
		} = file;
		let size = bytes.len();

		let mut part = Part::bytes(bytes).file_name(file_name.clone());
		if let Some(mime) = mime {
			part = part.mime_str(&mime)?;
		}
		let form = Form::new().part(FILE_FIELD, part);

		tracing::debug!(file = %file_name, size, "Uploading file");
		let envelope = self
			.execute(self.request(Method::POST, UPLOAD_PATH).multipart(form))
			.await?;

		let id = envelope
			.content
			.as_ref()
			.and_then(file_id_of)
			.ok_or_else(|| ApiError::Decode("upload response has no file id".to_string()))?;

		tracing::info!(file = %file_name, %id, "File uploaded");
		Ok(UploadedFile { id, file_name })
	}

	/// Absolute download URL for an uploaded file
	pub fn download_url(&self, id: &FileId) -> String {
		let encoded: String = url::form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
		format!("{}?id={}", self.url(DOWNLOAD_PATH), encoded)
	}
}

fn file_id_of(content: &Value) -> Option<FileId> {
	let raw = match content {
		Value::Object(map) => map.get("id")?,
		other => other,
	};
	match raw {
		Value::String(s) if !s.is_empty() => Some(FileId::new(s.as_str())),
		Value::Number(n) => Some(FileId::new(n.to_string())),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!({ "id": "9f1c" }), Some("9f1c"))]
	#[case(json!({ "id": 31 }), Some("31"))]
	#[case(json!("abc"), Some("abc"))]
	#[case(json!({ "id": "" }), None)]
	#[case(json!({ "name": "x" }), None)]
	fn test_file_id_shapes(#[case] content: Value, #[case] expected: Option<&str>) {
		assert_eq!(
			file_id_of(&content).as_ref().map(FileId::as_str),
			expected
		);
	}

	#[rstest]
	fn test_download_url_encodes_id() {
		let client = ApiClient::builder()
			.base_url("https://cdn.example.com/api")
			.build()
			.unwrap();

		let url = client.download_url(&FileId::new("a b/c"));

		assert_eq!(
			url,
			"https://cdn.example.com/api/File/DownloadFile/download?id=a+b%2Fc"
		);
	}
}
