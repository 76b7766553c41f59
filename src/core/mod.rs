pub mod pipeline;
pub mod vk;
pub mod xkcd;

pub use crate::domain::model::{ComicRecord, GroupList, UploadResult, UploadTicket};
pub use crate::utils::error::Result;
