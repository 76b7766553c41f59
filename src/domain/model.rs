use serde::Deserialize;

/// One comic as described by the xkcd metadata endpoint. Consumed within a
/// single run; never persisted.
#[derive(Debug, Clone)]
pub struct ComicRecord {
    pub id: u32,
    pub image_url: String,
    pub caption: String,
}

/// Payload of `photos.getWallUploadServer`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadServer {
    pub upload_url: String,
}

/// Raw answer of the upload server. Every field is defaulted: a failed
/// upload comes back as a 200 with the fields missing or empty, and the
/// emptiness check is the caller's, not serde's.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTicket {
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub server: i64,
    #[serde(default)]
    pub hash: String,
}

impl UploadTicket {
    pub fn is_empty(&self) -> bool {
        self.photo.as_deref().map_or(true, |p| p.trim().is_empty())
    }
}

/// One item of the `photos.saveWallPhoto` result list.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedPhoto {
    pub owner_id: i64,
    pub id: i64,
}

/// Stored-photo identity handed from the uploader to the publisher.
#[derive(Debug, Clone, Copy)]
pub struct UploadResult {
    pub owner_id: i64,
    pub media_id: i64,
}

impl UploadResult {
    /// Attachment reference in the exact `photo{owner}_{id}` wire format.
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.media_id)
    }
}

/// Payload of `groups.get`: ids of the communities the token administers.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupList {
    pub count: i64,
    #[serde(default)]
    pub items: Vec<i64>,
}

/// Payload of `wall.post`.
#[derive(Debug, Clone, Deserialize)]
pub struct WallPost {
    pub post_id: i64,
}
