//! Product types as exchanged with the remote catalog.

use crate::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a product identifier was minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Assigned by the remote catalog (positive IDs)
    Remote,
    /// Generated on this device (negative IDs)
    Local,
}

impl Origin {
    /// Classify an identifier by its sign.
    pub fn of(id: ProductId) -> Self {
        if id < 0 {
            Origin::Local
        } else {
            Origin::Remote
        }
    }
}

/// Product category.
///
/// The form only offers the four known categories. The remote is free to
/// return anything else, which decodes into [`Category::Other`] so that a
/// listing never fails on an unexpected value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    Jewelery,
    MensClothing,
    WomensClothing,
    Other(String),
}

impl Category {
    /// Categories a user can pick.
    pub const KNOWN: [Category; 4] = [
        Category::Electronics,
        Category::Jewelery,
        Category::MensClothing,
        Category::WomensClothing,
    ];

    /// Wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Electronics => "electronics",
            Category::Jewelery => "jewelery",
            Category::MensClothing => "men's clothing",
            Category::WomensClothing => "women's clothing",
            Category::Other(value) => value,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Category::Electronics => "Electronics",
            Category::Jewelery => "Jewelery",
            Category::MensClothing => "Men's Clothing",
            Category::WomensClothing => "Women's Clothing",
            Category::Other(value) => value,
        }
    }

    /// Whether this is one of the [`Category::KNOWN`] values.
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "electronics" => Category::Electronics,
            "jewelery" => Category::Jewelery,
            "men's clothing" => Category::MensClothing,
            "women's clothing" => Category::WomensClothing,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Average review score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Build the canonical product for `id` from a submitted draft.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            title: draft.title,
            price: draft.price,
            description: draft.description,
            category: draft.category,
            image: draft.image,
            rating: None,
        }
    }

    /// Builder-style method to attach a rating.
    pub fn with_rating(mut self, rating: Option<Rating>) -> Self {
        self.rating = rating;
        self
    }

    pub fn origin(&self) -> Origin {
        Origin::of(self.id)
    }
}

/// The user-editable fields of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: String,
}

impl ProductDraft {
    pub fn new(
        title: impl Into<String>,
        price: f64,
        description: impl Into<String>,
        category: impl Into<Category>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price,
            description: description.into(),
            category: category.into(),
            image: image.into(),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
        }
    }
}
