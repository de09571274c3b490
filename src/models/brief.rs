use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Target surface for the generated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    Instagram,
    Blog,
}

/// Campaign brief collected from the input form and forwarded verbatim to
/// the generation engine as the `data` object of a `generate` request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CampaignBrief {
    #[garde(skip)]
    pub platform: Platform,

    /// Target age band, e.g. "20s", "30s".
    #[garde(length(min = 1, max = 20))]
    pub age_group: String,

    #[garde(length(min = 1, max = 20))]
    pub gender: String,

    /// Customer concern the copy should speak to.
    #[garde(length(min = 1, max = 200))]
    pub concern: String,

    /// Free-text message from the shop owner.
    #[garde(length(max = 4000))]
    pub message: String,

    #[garde(length(max = 40))]
    pub phone: String,

    #[garde(length(max = 100))]
    pub region: String,

    #[garde(length(max = 200))]
    pub shop_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> CampaignBrief {
        CampaignBrief {
            platform: Platform::Instagram,
            age_group: "30s".to_string(),
            gender: "female".to_string(),
            concern: "pores".to_string(),
            message: "Loved how her skin cleared up".to_string(),
            phone: "010-1234-5678".to_string(),
            region: "Cheongju".to_string(),
            shop_name: "Gangnam branch".to_string(),
        }
    }

    #[test]
    fn test_valid_brief_passes() {
        assert!(brief().validate().is_ok());
    }

    #[test]
    fn test_empty_concern_rejected() {
        let mut b = brief();
        b.concern = String::new();
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_platform_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Platform::Instagram).unwrap(),
            "\"instagram\""
        );
        assert_eq!("blog".parse::<Platform>().unwrap(), Platform::Blog);
    }
}
