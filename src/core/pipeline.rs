use crate::core::vk::VkClient;
use crate::core::xkcd::XkcdClient;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// The whole run: fetch a random comic, upload its image to the community
/// wall, publish a post referencing it. Strictly sequential; each step's
/// output feeds the next.
pub struct PostPipeline {
    xkcd: XkcdClient,
    vk: VkClient,
    group_id: i64,
    work_dir: PathBuf,
}

impl PostPipeline {
    pub fn new(xkcd: XkcdClient, vk: VkClient, group_id: i64, work_dir: PathBuf) -> Self {
        Self {
            xkcd,
            vk,
            group_id,
            work_dir,
        }
    }

    pub async fn run(&self) -> Result<i64> {
        tracing::info!("Fetching a random comic...");
        let comic = self.xkcd.fetch_random_comic().await?;
        tracing::info!("Got comic {}: {}", comic.id, comic.image_url);

        let image = TempImage::new(
            self.xkcd
                .download_image(&comic.image_url, &self.work_dir)
                .await?,
        );

        tracing::info!("Uploading {} to the community wall...", image.path().display());
        let uploaded = self
            .vk
            .upload_wall_photo(self.group_id, image.path(), &comic.caption)
            .await?;

        tracing::info!("Publishing wall post with {}...", uploaded.attachment());
        let post_id = self
            .vk
            .post_to_wall(self.group_id, &uploaded.attachment(), &comic.caption)
            .await?;

        tracing::info!("Published post {}", post_id);
        Ok(post_id)
    }
}

/// Scope guard for the downloaded image: the file is removed when the
/// guard drops, whether the run succeeded or aborted mid-pipeline.
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}
