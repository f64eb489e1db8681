//! Multipart form-data encoding for attachment uploads.

use rand::RngExt;

use crate::store::FileUpload;

/// Encoded multipart body and its content type header value.
pub(super) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode form fields followed by the `file` part.
pub(super) fn encode(upload: &FileUpload) -> MultipartBody {
    let boundary = format!("----C2bFormBoundary{:016x}", rand::rng().random::<u64>());
    encode_with_boundary(upload, &boundary)
}

fn encode_with_boundary(upload: &FileUpload, boundary: &str) -> MultipartBody {
    let mut body = Vec::new();

    for (name, value) in &upload.fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", quote(name)).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            quote(&upload.filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", upload.content_type).as_bytes());
    body.extend_from_slice(&upload.data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes: body,
    }
}

/// Escape a header parameter value.
fn quote(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}
