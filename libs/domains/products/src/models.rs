use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ProductError, ProductResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest `limit` or offset a query may carry; PostgreSQL binds both as BIGINT
pub const MAX_ROW_COUNT: u64 = i64::MAX as u64;

/// Rejects empty and whitespace-only text
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut err = ValidationError::new("finite");
        err.message = Some("must be a finite number".into());
        return Err(err);
    }
    Ok(())
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned on creation
    pub id: Uuid,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(
        range(min = 0.0, message = "must be greater than or equal to 0"),
        custom(function = "validate_finite")
    )]
    pub price: f64,
    pub description: Option<String>,
    /// Matched exactly by the `category` list filter
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a product about to be stored, already checked for presence
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
}

/// Request body for `POST /products`
///
/// Fields are optional at the type level; missing ones are reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(
        required(message = "name is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Smartphone")]
    pub name: Option<String>,
    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "must be greater than or equal to 0"),
        custom(function = "validate_finite")
    )]
    #[schema(example = 299.99)]
    pub price: Option<f64>,
    pub description: Option<String>,
    #[validate(
        required(message = "category is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "electronics")]
    pub category: Option<String>,
}

/// Request body for `PUT /products/{id}`
///
/// Omitted fields keep their value. `"description": null` clears the
/// description; `null` for any other field counts as omitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(
        range(min = 0.0, message = "must be greater than or equal to 0"),
        custom(function = "validate_finite")
    )]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(custom(function = "validate_not_blank"))]
    pub category: Option<String>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<CreateProduct> for NewProduct {
    type Error = ValidationErrors;

    fn try_from(input: CreateProduct) -> Result<Self, Self::Error> {
        input.validate()?;

        let CreateProduct {
            name: Some(name),
            price: Some(price),
            description,
            category: Some(category),
        } = input
        else {
            // validate() has already rejected missing fields
            return Err(ValidationErrors::new());
        };

        Ok(Self {
            name,
            price,
            description,
            category,
        })
    }
}

impl Product {
    /// Build a product with a fresh id and timestamps, then validate it.
    pub fn try_new(input: NewProduct) -> Result<Self, ValidationErrors> {
        let now = Utc::now();
        let product = Self {
            id: Uuid::now_v7(),
            name: input.name,
            price: input.price,
            description: input.description,
            category: input.category,
            created_at: now,
            updated_at: now,
        };

        product.validate()?;
        Ok(product)
    }

    /// Merge `update` into this product, bump `updated_at` and validate the result.
    pub fn with_update(mut self, update: UpdateProduct) -> Result<Self, ValidationErrors> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        self.updated_at = Utc::now();

        self.validate()?;
        Ok(self)
    }
}

/// Filters for listing products. Empty values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Substring of the product name
    pub name: Option<String>,
    /// Exact category
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn new(name: Option<String>, category: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            category: category.filter(|c| !c.is_empty()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| product.name.contains(name))
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
    }
}

/// 1-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        self.checked_offset().unwrap_or(u64::MAX)
    }

    /// `(page - 1) * limit`, or `None` when it does not fit in [`MAX_ROW_COUNT`]
    pub fn checked_offset(&self) -> Option<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|offset| *offset <= MAX_ROW_COUNT)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Query string of `GET /products`.
///
/// Values stay raw strings until [`parse`](Self::parse).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// 1-based page number (default 1)
    #[param(value_type = Option<u64>, minimum = 1)]
    pub page: Option<String>,
    /// Page size (default 10)
    #[param(value_type = Option<u64>, minimum = 1)]
    pub limit: Option<String>,
    /// Substring match on the product name
    pub name: Option<String>,
    /// Exact match on the category
    pub category: Option<String>,
}

impl ListProductsQuery {
    pub fn parse(self) -> ProductResult<(ProductFilter, Pagination)> {
        let pagination = Pagination {
            page: parse_positive("page", self.page.as_deref(), DEFAULT_PAGE)?,
            limit: parse_positive("limit", self.limit.as_deref(), DEFAULT_LIMIT)?,
        };

        if pagination.checked_offset().is_none() {
            return Err(ProductError::InvalidQuery(format!(
                "page {} with limit {} is out of range",
                pagination.page, pagination.limit
            )));
        }

        Ok((ProductFilter::new(self.name, self.category), pagination))
    }
}

fn parse_positive(key: &str, raw: Option<&str>, default: u64) -> ProductResult<u64> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(default);
    };

    match raw.parse::<u64>() {
        Ok(value) if (1..=MAX_ROW_COUNT).contains(&value) => Ok(value),
        _ => Err(ProductError::InvalidQuery(format!(
            "{} must be an integer between 1 and {}, got '{}'",
            key, MAX_ROW_COUNT, raw
        ))),
    }
}

/// One page of `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<Product>,
}

impl ProductPage {
    pub fn new(total_items: u64, pagination: Pagination, data: Vec<Product>) -> Self {
        Self {
            total_items,
            total_pages: total_items.div_ceil(pagination.limit.max(1)),
            current_page: pagination.page,
            data,
        }
    }
}
