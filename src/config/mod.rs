use crate::utils::error::{PosterError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use clap::Parser;
use std::env;

#[derive(Debug, Clone, Parser)]
#[command(name = "comics-poster")]
#[command(about = "Posts a random xkcd comic to a VK community wall")]
pub struct CliConfig {
    #[arg(long, default_value = "https://xkcd.com")]
    pub xkcd_url: String,

    #[arg(long, default_value = "https://api.vk.com/method")]
    pub vk_api_url: String,

    #[arg(long, default_value = ".", help = "Directory for the downloaded image")]
    pub work_dir: String,

    #[arg(long, help = "List administered community ids and exit")]
    pub list_groups: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("xkcd_url", &self.xkcd_url)?;
        validate_url("vk_api_url", &self.vk_api_url)?;
        validate_path("work_dir", &self.work_dir)?;
        Ok(())
    }
}

/// Credentials are read from the environment exactly once at startup and
/// passed by parameter from there on.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub group_id: i64,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let token = env::var("VK_ACCESS_TOKEN").map_err(|_| PosterError::MissingConfigError {
            field: "VK_ACCESS_TOKEN".to_string(),
        })?;
        let group = env::var("VK_GROUP_NAME").map_err(|_| PosterError::MissingConfigError {
            field: "VK_GROUP_NAME".to_string(),
        })?;
        Self::from_parts(token, &group)
    }

    pub fn from_parts(access_token: String, group: &str) -> Result<Self> {
        validate_non_empty_string("VK_ACCESS_TOKEN", &access_token)?;

        let group_id =
            group
                .trim()
                .parse::<i64>()
                .map_err(|_| PosterError::InvalidConfigValueError {
                    field: "VK_GROUP_NAME".to_string(),
                    value: group.to_string(),
                    reason: "must be an integer group id".to_string(),
                })?;

        Ok(Self {
            access_token,
            group_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_parse_integer_group_id() {
        let creds = Credentials::from_parts("token".to_string(), "12345").unwrap();
        assert_eq!(creds.group_id, 12345);
        assert_eq!(creds.access_token, "token");
    }

    #[test]
    fn credentials_reject_non_integer_group_id() {
        let err = Credentials::from_parts("token".to_string(), "my-group").unwrap_err();
        assert!(matches!(
            err,
            PosterError::InvalidConfigValueError { ref field, .. } if field == "VK_GROUP_NAME"
        ));
    }

    #[test]
    fn credentials_reject_empty_token() {
        let err = Credentials::from_parts("  ".to_string(), "123").unwrap_err();
        assert!(matches!(
            err,
            PosterError::InvalidConfigValueError { ref field, .. } if field == "VK_ACCESS_TOKEN"
        ));
    }

    #[test]
    fn cli_config_validation() {
        let config = CliConfig {
            xkcd_url: "https://xkcd.com".to_string(),
            vk_api_url: "https://api.vk.com/method".to_string(),
            work_dir: ".".to_string(),
            list_groups: false,
            verbose: false,
        };
        assert!(config.validate().is_ok());

        let broken = CliConfig {
            vk_api_url: "not a url".to_string(),
            ..config
        };
        assert!(broken.validate().is_err());
    }
}
