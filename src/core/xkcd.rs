use crate::domain::model::ComicRecord;
use crate::utils::error::{PosterError, Result};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Deserialize)]
struct ComicInfo {
    num: u32,
    #[serde(default)]
    img: String,
    #[serde(default)]
    alt: String,
}

/// Client for the xkcd metadata endpoints and image hosting.
pub struct XkcdClient {
    client: Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Number of the most recently published comic.
    pub async fn latest_comic_number(&self) -> Result<u32> {
        let url = format!("{}/info.0.json", self.base_url);
        tracing::debug!("Fetching latest comic metadata from {}", url);

        let info: ComicInfo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(info.num)
    }

    pub async fn fetch_comic(&self, id: u32) -> Result<ComicRecord> {
        let url = format!("{}/{}/info.0.json", self.base_url, id);
        tracing::debug!("Fetching comic metadata from {}", url);

        let info: ComicInfo = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(ComicRecord {
            id: info.num,
            image_url: info.img,
            caption: info.alt,
        })
    }

    pub async fn fetch_random_comic(&self) -> Result<ComicRecord> {
        let last = self.latest_comic_number().await?;
        let id = random_comic_id(last);
        tracing::debug!("Picked comic {} out of {}", id, last);
        self.fetch_comic(id).await
    }

    /// Downloads the comic image into `dir`, named after the final path
    /// segment of the URL. An existing file of that name is overwritten.
    pub async fn download_image(&self, image_url: &str, dir: &Path) -> Result<PathBuf> {
        let filename = image_filename(image_url)?;
        tracing::debug!("Downloading {} as {}", image_url, filename);

        let response = self.client.get(image_url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let path = dir.join(filename);
        tokio::fs::write(&path, &bytes).await?;

        Ok(path)
    }
}

/// Uniform pick over all published comic ids. Ids start at 1.
pub fn random_comic_id(last_comic_number: u32) -> u32 {
    rand::thread_rng().gen_range(1..=last_comic_number.max(1))
}

fn image_filename(image_url: &str) -> Result<String> {
    let parsed = Url::parse(image_url).map_err(|e| PosterError::ProcessingError {
        message: format!("invalid image url '{}': {}", image_url, e),
    })?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PosterError::ProcessingError {
            message: format!("image url has no file name: {}", image_url),
        })
}
