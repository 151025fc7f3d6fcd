use serde::{Deserialize, Serialize};

/// SearchAdvertisementByTitle input; a missing `title` decodes to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAdvertisementByTitleRequest {
    #[serde(default)]
    pub title: String,
}
