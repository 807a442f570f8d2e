//! Core data types for the adforge listing copy generator.
//!
//! This crate provides the foundation data types used across all adforge
//! interfaces: listing categories, tones, per-category item forms, photo
//! attachments, and the generated ad payloads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ad;
mod category;
mod listing;
mod photo;
mod request;
mod tone;

pub use ad::{GeneratedAd, OptimizedAd, clean_text};
pub use category::Category;
pub use listing::{
    AutoData, ClothingData, ElectronicsCondition, ElectronicsData, ListingDetails, ServicesData,
};
pub use photo::Photo;
pub use request::{AdRequest, OptimizeRequest};
pub use tone::Tone;
