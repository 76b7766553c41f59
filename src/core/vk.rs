use crate::domain::model::{GroupList, SavedPhoto, UploadResult, UploadServer, UploadTicket, WallPost};
use crate::utils::error::{PosterError, Result};
use reqwest::{multipart, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

pub const VK_API_VERSION: &str = "5.103";

/// Client for the VK method-dispatch API. Holds the access token so that
/// every call carries it plus the fixed API version.
pub struct VkClient {
    client: Client,
    base_url: String,
    token: String,
}

impl VkClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Shared request helper: every VK method call goes through here.
    /// Fails on non-2xx, then translates an embedded error object into
    /// `VkApiError` before deserializing the `response` payload.
    async fn call<T: DeserializeOwned>(
        &self,
        http_method: Method,
        vk_method: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, vk_method);
        tracing::debug!("VK request: {} {}", http_method, vk_method);

        let mut query: Vec<(&str, String)> = vec![
            ("access_token", self.token.clone()),
            ("v", VK_API_VERSION.to_string()),
        ];
        query.extend(params.iter().cloned());

        let response = self
            .client
            .request(http_method, &url)
            .query(&query)
            .send()
            .await?;

        let body = check_api_error(response).await?;
        let payload = body.get("response").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(payload)?)
    }

    /// Ids of the communities the token administers.
    pub async fn get_groups(&self) -> Result<GroupList> {
        self.call(Method::GET, "groups.get", &[]).await
    }

    pub async fn get_wall_upload_server(&self, group_id: i64) -> Result<String> {
        let server: UploadServer = self
            .call(
                Method::GET,
                "photos.getWallUploadServer",
                &[("group_id", group_id.to_string())],
            )
            .await?;
        Ok(server.upload_url)
    }

    /// Posts the raw file bytes as multipart form data to the upload URL
    /// issued by `photos.getWallUploadServer`. The upload server reports
    /// failure as a 200 with an empty `photo` field, not as an error
    /// object, so that case maps to the fixed `EmptyUploadError`.
    pub async fn upload_photo(&self, upload_url: &str, photo_path: &Path) -> Result<UploadTicket> {
        let file_name = photo_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo")
            .to_string();
        let bytes = tokio::fs::read(photo_path).await?;
        tracing::debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), upload_url);

        let form =
            multipart::Form::new().part("photo", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self.client.post(upload_url).multipart(form).send().await?;
        let body = check_api_error(response).await?;

        let ticket: UploadTicket = serde_json::from_value(body)?;
        if ticket.is_empty() {
            return Err(PosterError::EmptyUploadError);
        }
        Ok(ticket)
    }

    pub async fn save_wall_photo(
        &self,
        group_id: i64,
        ticket: &UploadTicket,
        caption: &str,
    ) -> Result<UploadResult> {
        let saved: Vec<SavedPhoto> = self
            .call(
                Method::POST,
                "photos.saveWallPhoto",
                &[
                    ("photo", ticket.photo.clone().unwrap_or_default()),
                    ("server", ticket.server.to_string()),
                    ("hash", ticket.hash.clone()),
                    ("group_id", group_id.to_string()),
                    ("caption", caption.to_string()),
                ],
            )
            .await?;

        let first = saved
            .into_iter()
            .next()
            .ok_or_else(|| PosterError::ProcessingError {
                message: "photos.saveWallPhoto returned no items".to_string(),
            })?;

        Ok(UploadResult {
            owner_id: first.owner_id,
            media_id: first.id,
        })
    }

    /// Resolves the upload server, uploads the file, and finalizes the
    /// photo in one go.
    pub async fn upload_wall_photo(
        &self,
        group_id: i64,
        photo_path: &Path,
        caption: &str,
    ) -> Result<UploadResult> {
        let upload_url = self.get_wall_upload_server(group_id).await?;
        let ticket = self.upload_photo(&upload_url, photo_path).await?;
        self.save_wall_photo(group_id, &ticket, caption).await
    }

    /// Publishes a wall post on behalf of the community. The wall owner is
    /// the negated group id.
    pub async fn post_to_wall(
        &self,
        group_id: i64,
        attachment: &str,
        message: &str,
    ) -> Result<i64> {
        let posted: WallPost = self
            .call(
                Method::POST,
                "wall.post",
                &[
                    ("from_group", "1".to_string()),
                    ("message", message.to_string()),
                    ("attachments", attachment.to_string()),
                    ("owner_id", format!("-{}", group_id)),
                ],
            )
            .await?;
        Ok(posted.post_id)
    }
}

/// Fails on non-2xx, then on an embedded `{"error": {...}}` object. VK
/// reports domain errors inside a 200 body, so both checks are needed.
async fn check_api_error(response: Response) -> Result<Value> {
    let response = response.error_for_status()?;
    let body: Value = response.json().await?;

    if let Some(error) = body.get("error") {
        let code = error
            .get("error_code")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let message = error
            .get("error_msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(PosterError::VkApiError { code, message });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn client_for(server: &MockServer) -> VkClient {
        VkClient::new(server.url("/method"), "test-token")
    }

    #[tokio::test]
    async fn get_wall_upload_server_returns_upload_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/method/photos.getWallUploadServer")
                .query_param("access_token", "test-token")
                .query_param("v", VK_API_VERSION)
                .query_param("group_id", "123");
            then.status(200).json_body(serde_json::json!({
                "response": {"upload_url": "https://upload.example/wall"}
            }));
        });

        let vk = client_for(&server);
        let url = vk.get_wall_upload_server(123).await.unwrap();

        mock.assert();
        assert_eq!(url, "https://upload.example/wall");
    }

    #[tokio::test]
    async fn error_body_wins_over_http_200() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/method/photos.getWallUploadServer");
            then.status(200).json_body(serde_json::json!({
                "error": {"error_code": 5, "error_msg": "User authorization failed"}
            }));
        });

        let vk = client_for(&server);
        let err = vk.get_wall_upload_server(123).await.unwrap_err();

        match err {
            PosterError::VkApiError { code, message } => {
                assert_eq!(code, 5);
                assert_eq!(message, "User authorization failed");
            }
            other => panic!("expected VkApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_a_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/method/photos.getWallUploadServer");
            then.status(500);
        });

        let vk = client_for(&server);
        let err = vk.get_wall_upload_server(123).await.unwrap_err();
        assert!(matches!(err, PosterError::TransportError(_)));
    }

    #[tokio::test]
    async fn upload_photo_rejects_empty_null_and_absent_photo() {
        let bodies = [
            serde_json::json!({"photo": "", "server": 1, "hash": "h"}),
            serde_json::json!({"photo": null, "server": 1, "hash": "h"}),
            serde_json::json!({"server": 1, "hash": "h"}),
        ];

        for body in bodies {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(POST).path("/upload");
                then.status(200).json_body(body.clone());
            });

            let dir = TempDir::new().unwrap();
            let photo = dir.path().join("123.png");
            std::fs::write(&photo, b"bytes").unwrap();

            let vk = client_for(&server);
            let err = vk
                .upload_photo(&server.url("/upload"), &photo)
                .await
                .unwrap_err();

            assert!(matches!(err, PosterError::EmptyUploadError));
            assert_eq!(err.api_code(), Some(0));
            assert_eq!(err.to_string(), "Image upload error");
        }
    }

    #[tokio::test]
    async fn upload_photo_returns_ticket() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(serde_json::json!({
                "photo": "photo-token", "server": 42, "hash": "abc"
            }));
        });

        let dir = TempDir::new().unwrap();
        let photo = dir.path().join("123.png");
        std::fs::write(&photo, b"bytes").unwrap();

        let vk = client_for(&server);
        let ticket = vk.upload_photo(&server.url("/upload"), &photo).await.unwrap();

        mock.assert();
        assert_eq!(ticket.photo.as_deref(), Some("photo-token"));
        assert_eq!(ticket.server, 42);
        assert_eq!(ticket.hash, "abc");
    }

    #[tokio::test]
    async fn save_wall_photo_takes_first_result_item() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/method/photos.saveWallPhoto")
                .query_param("photo", "photo-token")
                .query_param("server", "42")
                .query_param("hash", "abc")
                .query_param("group_id", "123")
                .query_param("caption", "hi");
            then.status(200).json_body(serde_json::json!({
                "response": [{"owner_id": 10, "id": 20}, {"owner_id": 11, "id": 21}]
            }));
        });

        let vk = client_for(&server);
        let ticket = UploadTicket {
            photo: Some("photo-token".to_string()),
            server: 42,
            hash: "abc".to_string(),
        };
        let saved = vk.save_wall_photo(123, &ticket, "hi").await.unwrap();

        mock.assert();
        assert_eq!(saved.owner_id, 10);
        assert_eq!(saved.media_id, 20);
    }

    #[tokio::test]
    async fn save_wall_photo_fails_on_empty_result_list() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/method/photos.saveWallPhoto");
            then.status(200)
                .json_body(serde_json::json!({"response": []}));
        });

        let vk = client_for(&server);
        let ticket = UploadTicket {
            photo: Some("photo-token".to_string()),
            server: 42,
            hash: "abc".to_string(),
        };
        let err = vk.save_wall_photo(123, &ticket, "hi").await.unwrap_err();
        assert!(matches!(err, PosterError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn post_to_wall_sends_group_post_with_attachment() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/method/wall.post")
                .query_param("from_group", "1")
                .query_param("message", "hi")
                .query_param("attachments", "photo10_20")
                .query_param("owner_id", "-123")
                .query_param("access_token", "test-token")
                .query_param("v", VK_API_VERSION);
            then.status(200)
                .json_body(serde_json::json!({"response": {"post_id": 7}}));
        });

        let vk = client_for(&server);
        let post_id = vk.post_to_wall(123, "photo10_20", "hi").await.unwrap();

        mock.assert();
        assert_eq!(post_id, 7);
    }

    #[tokio::test]
    async fn get_groups_parses_count_and_items() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/method/groups.get")
                .query_param("access_token", "test-token")
                .query_param("v", VK_API_VERSION);
            then.status(200).json_body(serde_json::json!({
                "response": {"count": 2, "items": [111, 222]}
            }));
        });

        let vk = client_for(&server);
        let groups = vk.get_groups().await.unwrap();

        mock.assert();
        assert_eq!(groups.count, 2);
        assert_eq!(groups.items, vec![111, 222]);
    }
}
