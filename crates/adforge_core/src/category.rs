//! Listing categories.

use serde::{Deserialize, Serialize};

/// Marketplace listing categories.
///
/// Each category drives its own structured input form and prompt details.
///
/// # Examples
///
/// ```
/// use adforge_core::Category;
/// use std::str::FromStr;
///
/// assert_eq!(format!("{}", Category::Electronics), "electronics");
/// assert_eq!(Category::from_str("auto").unwrap(), Category::Auto);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Phones, consoles, laptops and similar
    Electronics,
    /// Cars and other vehicles
    Auto,
    /// Offered services (repair, tutoring, etc.)
    Services,
    /// Clothing and apparel
    Clothing,
}

impl Category {
    /// Whether a photo attachment is accepted for this category.
    pub fn supports_photo(&self) -> bool {
        matches!(self, Category::Electronics | Category::Clothing)
    }
}
