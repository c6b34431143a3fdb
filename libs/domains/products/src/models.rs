use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

/// Default page size of the public listing
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// Wear condition of a second-hand item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProductCondition {
    NewLike,
    VeryGood,
    Good,
    /// Has visible defects; `defects` must describe them
    Fair,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

/// Moderation status. Products created by users are approved immediately.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Product listing stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Whole currency units
    pub price: i64,
    pub condition: ProductCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defects: Option<String>,
    #[serde(default)]
    pub defect_images: Vec<String>,
    pub images: Vec<String>,
    pub quantity: i32,
    pub seller_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<bool>,
    pub status: ProductStatus,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Visible to buyers: approved and still available.
    pub fn is_listed(&self) -> bool {
        self.status == ProductStatus::Approved && self.is_available
    }
}

/// Product with the category name and seller email resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_email: Option<String>,
}

fn all_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().all(|url| url.validate_url()) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Invalid URL".into()))
    }
}

/// Body of `POST /products`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(required(message = "Category ID is required"))]
    pub category_id: Option<Uuid>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub gender: Option<Gender>,
    pub style: Option<String>,
    #[validate(
        required(message = "Price is required"),
        range(min = 1, message = "Price must be greater than 0")
    )]
    pub price: Option<i64>,
    #[validate(required(message = "Condition is required"))]
    pub condition: Option<ProductCondition>,
    pub defects: Option<String>,
    #[validate(custom(function = "all_urls"))]
    pub defect_images: Vec<String>,
    #[validate(
        length(min = 1, message = "At least one image is required"),
        custom(function = "all_urls")
    )]
    pub images: Vec<String>,
    /// Defaults to 1
    #[validate(range(min = 0, message = "Quantity must be a non-negative integer"))]
    pub quantity: Option<i32>,
    pub authenticity: Option<bool>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateProduct {
    /// Trim text fields; blank optionals become `None`.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = trimmed(self.description);
        self.brand = trimmed(self.brand);
        self.size = trimmed(self.size);
        self.color = trimmed(self.color);
        self.material = trimmed(self.material);
        self.style = trimmed(self.style);
        self.defects = trimmed(self.defects);
        self
    }

    /// Field rules plus the condition/defects dependencies.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.condition == Some(ProductCondition::Fair) && self.defects.is_none() {
            errors.add(
                "defects",
                ValidationError::new("defects_required")
                    .with_message("Defects is required when condition is 'fair'".into()),
            );
        }
        if self.defects.is_some() && self.defect_images.is_empty() {
            errors.add(
                "defect_images",
                ValidationError::new("defect_images_required").with_message(
                    "At least one defect image is required when defects are specified".into(),
                ),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Normalize, validate and build an approved listing owned by `seller_id`.
    pub fn into_product(self, seller_id: Uuid) -> Result<Product, ValidationErrors> {
        let input = self.normalized();
        input.check()?;

        // check() reports each of these as required
        let (Some(category_id), Some(price), Some(condition)) =
            (input.category_id, input.price, input.condition)
        else {
            return Err(ValidationErrors::new());
        };

        let now = Utc::now();
        Ok(Product {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            category_id,
            brand: input.brand,
            size: input.size,
            color: input.color,
            material: input.material,
            gender: input.gender,
            style: input.style,
            price,
            condition,
            defects: input.defects,
            defect_images: input.defect_images,
            images: input.images,
            quantity: input.quantity.unwrap_or(1),
            seller_id,
            authenticity: input.authenticity,
            status: ProductStatus::Approved,
            is_available: true,
            created_at: now,
            updated_at: now,
        })
    }
}

/// `GET /products` query. Missing or non-numeric values use the defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 9
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        parse_or(self.page.as_deref(), 1)
    }

    pub fn limit(&self) -> i64 {
        parse_or(self.limit.as_deref(), DEFAULT_PAGE_SIZE)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: u64) -> Self {
        let per_page = limit.max(1) as u64;
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyProducts {
    pub products: Vec<Product>,
    pub total: usize,
}
