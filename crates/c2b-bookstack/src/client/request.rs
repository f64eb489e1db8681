//! Request dispatch and response mapping.

use serde_json::{Map, Value};
use tracing::debug;

use super::BookStackClient;
use super::multipart;
use crate::error::BookStackError;
use crate::store::{ContentStore, FileUpload, Method};

impl ContentStore for BookStackClient {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        upload: Option<&FileUpload>,
    ) -> Result<Value, BookStackError> {
        let url = format!("{}{}", self.api_url(), path);
        debug!("{} {}", method, url);

        let response = match method {
            Method::Get => self
                .agent
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .call()?,
            Method::Delete => self
                .agent
                .delete(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .call()?,
            Method::Post => match upload {
                Some(upload) => {
                    let form = multipart::encode(upload);
                    self.agent
                        .post(&url)
                        .header("Authorization", &self.auth_header)
                        .header("Content-Type", &form.content_type)
                        .header("Accept", "application/json")
                        .send(&form.bytes[..])?
                }
                None => {
                    let payload = json_bytes(body)?;
                    self.agent
                        .post(&url)
                        .header("Authorization", &self.auth_header)
                        .header("Content-Type", "application/json")
                        .header("Accept", "application/json")
                        .send(&payload[..])?
                }
            },
            Method::Put => {
                let payload = json_bytes(body)?;
                self.agent
                    .put(&url)
                    .header("Authorization", &self.auth_header)
                    .header("Content-Type", "application/json")
                    .header("Accept", "application/json")
                    .send(&payload[..])?
            }
        };

        let status = response.status().as_u16();
        let text = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read response body)".to_owned());

        map_response(status, &text)
    }
}

fn json_bytes(body: Option<&Value>) -> Result<Vec<u8>, BookStackError> {
    match body {
        Some(value) => Ok(serde_json::to_vec(value)?),
        None => Ok(b"{}".to_vec()),
    }
}

/// Map a status code and raw body onto the request result.
fn map_response(status: u16, text: &str) -> Result<Value, BookStackError> {
    match status {
        204 => Ok(Value::Object(Map::new())),
        200 | 201 if text.trim().is_empty() => Ok(Value::Object(Map::new())),
        200 | 201 => Ok(serde_json::from_str(text)?),
        _ => Err(BookStackError::HttpResponse {
            status,
            body: text.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_response_ok_json() {
        let value = map_response(200, r#"{"id": 7}"#).unwrap();
        assert_eq!(value, json!({"id": 7}));
    }

    #[test]
    fn test_map_response_created() {
        let value = map_response(201, r#"{"id": 8}"#).unwrap();
        assert_eq!(value["id"], 8);
    }

    #[test]
    fn test_map_response_no_content() {
        assert_eq!(map_response(204, "").unwrap(), json!({}));
    }

    #[test]
    fn test_map_response_empty_ok_body() {
        assert_eq!(map_response(200, "  ").unwrap(), json!({}));
    }

    #[test]
    fn test_map_response_error_status() {
        let err = map_response(422, r#"{"error": {"message": "name required"}}"#).unwrap_err();
        assert!(matches!(err, BookStackError::HttpResponse { status: 422, .. }));
        assert!(err.to_string().contains("name required"));
    }

    #[test]
    fn test_map_response_redirect_is_failure() {
        assert!(map_response(302, "").is_err());
    }

    #[test]
    fn test_map_response_invalid_json() {
        let err = map_response(200, "<html>").unwrap_err();
        assert!(matches!(err, BookStackError::Json(_)));
    }

    #[test]
    fn test_json_bytes_default_object() {
        assert_eq!(json_bytes(None).unwrap(), b"{}");
    }
}
