//! Tag domain entity and its transfer objects.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Tag domain entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Tag creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTag {
    #[validate(length(min = 2, max = 45, message = "Tag name must be 2 to 45 characters"))]
    #[schema(example = "spa")]
    pub name: String,
}

/// Tag rename request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTag {
    #[validate(length(min = 2, max = 45, message = "Tag name must be 2 to 45 characters"))]
    #[schema(example = "wellness")]
    pub name: String,
}

/// Tag as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReadTag {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "spa")]
    pub name: String,
}

impl From<Tag> for ReadTag {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

impl CreateTag {
    /// Canonical form of the submitted name
    pub fn normalized_name(&self) -> String {
        normalize_tag_name(&self.name)
    }
}

impl UpdateTag {
    pub fn normalized_name(&self) -> String {
        normalize_tag_name(&self.name)
    }
}

/// Tag names are stored trimmed with inner whitespace collapsed.
pub fn normalize_tag_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  spa   day "), "spa day");
        assert_eq!(normalize_tag_name("spa"), "spa");
    }
}
