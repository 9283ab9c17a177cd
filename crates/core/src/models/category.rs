//! Product categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::types::{CategoryId, slugify};

/// A product category as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating or updating a category from the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl CategoryInput {
    /// Build an input whose slug is derived from the name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            slug: slugify(name),
            description: None,
            image_url: None,
        }
    }

    /// Validate the category form.
    ///
    /// # Errors
    ///
    /// Returns an error when the name or the slug is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::required("name"));
        }
        if self.slug.trim().is_empty() {
            return Err(ValidationError::required("slug"));
        }
        Ok(())
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_named_derives_slug() {
        let input = CategoryInput::named(" Evening Wear ");
        assert_eq!(input.name, "Evening Wear");
        assert_eq!(input.slug, "evening-wear");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = CategoryInput::named("   ");
        assert_eq!(input.validate().unwrap_err().field, "name");
    }
}
