//! Catalog items and the create/update payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item identifier as assigned by the remote catalog.
pub type ItemId = u64;

/// A catalog entry.
///
/// `id`, `title` and `price` are the only fields the client interprets. The
/// rest (brand, stock, thumbnails, ...) rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default, deserialize_with = "crate::lenient::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::lenient::null_as_default")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Returns a copy of this item with `patch` laid over it.
    ///
    /// Keys absent from `patch` keep their current value; the patch is a
    /// partial update, not a replacement.
    ///
    /// # Errors
    /// Returns an error if a patched `id`, `title` or `price` has the wrong
    /// JSON type (`null` is read as the field's default).
    pub fn merged_with(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut fields = self.extra.clone();
        fields.insert("id".to_string(), Value::from(self.id));
        fields.insert("title".to_string(), Value::from(self.title.clone()));
        fields.insert("price".to_string(), Value::from(self.price));
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(fields))
    }
}

/// Field values submitted when creating or editing an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    pub title: String,
    pub price: f64,
}

impl ItemFields {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price,
        }
    }

    /// Prefills the fields from an existing item (edit form).
    pub fn from_item(item: &Item) -> Self {
        Self::new(item.title.clone(), item.price)
    }

    /// Checks the required-field and non-negative-price rules.
    ///
    /// # Errors
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(())
    }
}

/// Client-side form validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingTitle,
    InvalidPrice,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingTitle => write!(f, "Please input the product name!"),
            ValidationError::InvalidPrice => write!(f, "Price must be a positive number"),
        }
    }
}

impl std::error::Error for ValidationError {}
