//! Per-category listing forms and validation.

use crate::{Category, Photo};
use adforge_error::{FormError, FormErrorKind};
use serde::{Deserialize, Serialize};

/// Condition of an electronics item.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ElectronicsCondition {
    /// Perfect, like new
    Ideal,
    /// Good, visible wear
    Normal,
    /// Broken, for parts
    Broken,
}

impl Default for ElectronicsCondition {
    fn default() -> Self {
        ElectronicsCondition::Normal
    }
}

/// Structured input for an electronics listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElectronicsData {
    /// Model name, e.g. "iPhone 13 Pro 256GB"
    #[serde(default)]
    pub model: String,
    /// Memory, color, processor and similar specs
    #[serde(default)]
    pub specs: String,
    /// Item condition
    #[serde(default)]
    pub condition: ElectronicsCondition,
    /// Included accessories, box, receipt
    #[serde(default)]
    pub kit: String,
    /// Optional listing photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    /// Optional asking price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Structured input for a vehicle listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutoData {
    /// Make and model, e.g. "Toyota Camry"
    #[serde(default)]
    pub make_model: String,
    /// Production year
    #[serde(default)]
    pub year: String,
    /// Mileage in kilometers
    #[serde(default)]
    pub mileage: String,
    /// Body or mechanical nuances worth disclosing
    #[serde(default)]
    pub nuances: String,
    /// Optional asking price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Structured input for a services listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServicesData {
    /// Kind of service offered
    #[serde(default)]
    pub service_type: String,
    /// Experience summary
    #[serde(default)]
    pub experience: String,
    /// Key benefit for the customer
    #[serde(default)]
    pub benefit: String,
    /// Optional rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Structured input for a clothing listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClothingData {
    /// Item type, e.g. "winter jacket"
    #[serde(default)]
    pub item_type: String,
    /// Size
    #[serde(default)]
    pub size: String,
    /// Condition, free-form
    #[serde(default)]
    pub condition: String,
    /// Brand
    #[serde(default)]
    pub brand: String,
    /// Optional listing photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    /// Optional asking price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// A complete category-tagged listing form.
///
/// # Examples
///
/// ```
/// use adforge_core::{Category, ElectronicsData, ListingDetails};
///
/// let details = ListingDetails::Electronics(ElectronicsData {
///     model: "PlayStation 5".to_string(),
///     specs: "825GB, white".to_string(),
///     ..Default::default()
/// });
/// assert_eq!(details.category(), Category::Electronics);
/// assert!(details.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "lowercase")]
pub enum ListingDetails {
    /// Electronics form
    Electronics(ElectronicsData),
    /// Vehicle form
    Auto(AutoData),
    /// Services form
    Services(ServicesData),
    /// Clothing form
    Clothing(ClothingData),
}

impl ListingDetails {
    /// The category this form belongs to.
    pub fn category(&self) -> Category {
        match self {
            ListingDetails::Electronics(_) => Category::Electronics,
            ListingDetails::Auto(_) => Category::Auto,
            ListingDetails::Services(_) => Category::Services,
            ListingDetails::Clothing(_) => Category::Clothing,
        }
    }

    /// Optional asking price, any category.
    pub fn price(&self) -> Option<&str> {
        match self {
            ListingDetails::Electronics(d) => d.price.as_deref(),
            ListingDetails::Auto(d) => d.price.as_deref(),
            ListingDetails::Services(d) => d.price.as_deref(),
            ListingDetails::Clothing(d) => d.price.as_deref(),
        }
    }

    /// Photo attachment, if the category carries one.
    pub fn photo(&self) -> Option<&Photo> {
        match self {
            ListingDetails::Electronics(d) => d.photo.as_ref(),
            ListingDetails::Clothing(d) => d.photo.as_ref(),
            _ => None,
        }
    }

    /// Return a copy with any photo payload removed.
    ///
    /// Used before persisting state or posting records where large base64
    /// blobs are unwelcome.
    pub fn without_photo(&self) -> ListingDetails {
        match self {
            ListingDetails::Electronics(d) => ListingDetails::Electronics(ElectronicsData {
                photo: None,
                ..d.clone()
            }),
            ListingDetails::Clothing(d) => ListingDetails::Clothing(ClothingData {
                photo: None,
                ..d.clone()
            }),
            other => other.clone(),
        }
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<String> {
        fn blank(value: &str) -> bool {
            value.trim().is_empty()
        }

        let mut missing = Vec::new();
        match self {
            ListingDetails::Electronics(d) => {
                if blank(&d.model) {
                    missing.push("model".to_string());
                }
                if blank(&d.specs) {
                    missing.push("specs".to_string());
                }
            }
            ListingDetails::Auto(d) => {
                if blank(&d.make_model) {
                    missing.push("make_model".to_string());
                }
                if blank(&d.year) {
                    missing.push("year".to_string());
                }
                if blank(&d.mileage) {
                    missing.push("mileage".to_string());
                }
            }
            ListingDetails::Services(d) => {
                if blank(&d.service_type) {
                    missing.push("service_type".to_string());
                }
                if blank(&d.experience) {
                    missing.push("experience".to_string());
                }
                if blank(&d.benefit) {
                    missing.push("benefit".to_string());
                }
            }
            ListingDetails::Clothing(d) => {
                if blank(&d.item_type) {
                    missing.push("item_type".to_string());
                }
                if blank(&d.size) {
                    missing.push("size".to_string());
                }
                if blank(&d.condition) {
                    missing.push("condition".to_string());
                }
            }
        }
        missing
    }

    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrorKind::MissingFields`] naming every empty required
    /// field.
    pub fn validate(&self) -> Result<(), FormError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::new(FormErrorKind::MissingFields(missing)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electronics_requires_model_and_specs() {
        let details = ListingDetails::Electronics(ElectronicsData::default());
        let missing = details.missing_fields();
        assert_eq!(missing, vec!["model".to_string(), "specs".to_string()]);
        assert!(details.validate().is_err());
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let details = ListingDetails::Auto(AutoData {
            make_model: "  ".to_string(),
            year: "2018".to_string(),
            mileage: "145000".to_string(),
            ..Default::default()
        });
        assert_eq!(details.missing_fields(), vec!["make_model".to_string()]);
    }

    #[test]
    fn services_requires_all_three_fields() {
        let details = ListingDetails::Services(ServicesData {
            service_type: "Ремонт стиральных машин".to_string(),
            experience: "10 лет".to_string(),
            benefit: "Гарантия на работу".to_string(),
            price: None,
        });
        assert!(details.validate().is_ok());
    }

    #[test]
    fn without_photo_strips_only_the_photo() {
        let details = ListingDetails::Clothing(ClothingData {
            item_type: "Куртка".to_string(),
            size: "M".to_string(),
            condition: "Отличное".to_string(),
            brand: "Uniqlo".to_string(),
            photo: Some(Photo {
                mime: "image/png".to_string(),
                data: "QUJD".to_string(),
            }),
            price: Some("3000".to_string()),
        });
        let stripped = details.without_photo();
        assert!(stripped.photo().is_none());
        match stripped {
            ListingDetails::Clothing(d) => {
                assert_eq!(d.item_type, "Куртка");
                assert_eq!(d.price.as_deref(), Some("3000"));
            }
            _ => panic!("category changed"),
        }
    }

    #[test]
    fn auto_never_carries_a_photo() {
        let details = ListingDetails::Auto(AutoData::default());
        assert!(details.photo().is_none());
    }
}
