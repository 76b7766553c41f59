pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{CliConfig, Credentials};
pub use crate::core::pipeline::PostPipeline;
pub use crate::core::{vk::VkClient, xkcd::XkcdClient};
pub use crate::utils::error::{PosterError, Result};
