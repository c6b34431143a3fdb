use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Deepest allowed level. Roots are level 0.
pub const MAX_LEVEL: i32 = 3;

/// Category node with its materialized path (`shoes/sneakers`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// `null` for roots
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub level: i32,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public listing shape, without audit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCategory {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub level: i32,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<Category> for PublicCategory {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            parent_id: category.parent_id,
            level: category.level,
            path: category.path,
            description: category.description,
            is_active: category.is_active,
            sort_order: category.sort_order,
        }
    }
}

fn has_letter_or_digit(name: &str) -> Result<(), ValidationError> {
    if name.chars().any(char::is_alphanumeric) {
        Ok(())
    } else {
        Err(ValidationError::new("letter_or_digit")
            .with_message("Tên danh mục phải chứa ít nhất một chữ cái hoặc số".into()))
    }
}

/// `""` and `null` both mean "no parent".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| serde::de::Error::custom("parentId must be a valid id")),
    }
}

/// Body of `POST /categories`. Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategory {
    #[serde(default)]
    #[validate(
        length(min = 2, max = 60, message = "Tên danh mục phải có từ 2 đến 60 ký tự"),
        custom(function = "has_letter_or_digit")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_id: Option<Uuid>,

    #[validate(length(max = 500, message = "Mô tả không được vượt quá 500 ký tự"))]
    pub description: Option<String>,

    #[validate(range(
        min = 0,
        max = 9999,
        message = "Thứ tự sắp xếp phải nằm trong khoảng 0 đến 9999"
    ))]
    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,
}

impl CreateCategory {
    /// Trim the name and drop a blank description before validation.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

/// Query of the admin listing. `parentId` absent or empty selects roots.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// `true` or `false`; anything else is ignored
    pub is_active: Option<String>,
    pub parent_id: Option<String>,
}

/// Parsed listing filter passed to the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryFilter {
    pub is_active: Option<bool>,
    /// `None` selects root categories
    pub parent_id: Option<Uuid>,
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        self.is_active.is_none_or(|active| category.is_active == active)
            && category.parent_id == self.parent_id
    }
}
