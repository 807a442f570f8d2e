//! Detail block rendering for listing forms.

use adforge_core::{ElectronicsCondition, ListingDetails};

/// Render the item detail block included in both prompts.
///
/// One line per filled field; the price line is omitted when the seller left
/// it empty.
pub fn details_block(details: &ListingDetails) -> String {
    let price_line = details
        .price()
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("Price: {}\n", p))
        .unwrap_or_default();

    match details {
        ListingDetails::Electronics(d) => {
            let condition = match d.condition {
                ElectronicsCondition::Ideal => "Perfect/Like New",
                ElectronicsCondition::Normal => "Good/Normal",
                ElectronicsCondition::Broken => "Broken/For parts",
            };
            format!(
                "Category: Electronics\nModel: {}\n{}Specs/Memory: {}\nCondition: {}\nKit/Accessories: {}",
                d.model, price_line, d.specs, condition, d.kit
            )
        }
        ListingDetails::Auto(d) => format!(
            "Category: Automobiles\nMake/Model: {}\n{}Year: {}\nMileage: {}\nBody Nuances/Issues: {}",
            d.make_model, price_line, d.year, d.mileage, d.nuances
        ),
        ListingDetails::Services(d) => format!(
            "Category: Services\nService Type: {}\n{}Experience: {}\nKey Benefit: {}",
            d.service_type, price_line, d.experience, d.benefit
        ),
        ListingDetails::Clothing(d) => format!(
            "Category: Clothing/Apparel\nItem Type: {}\n{}Brand: {}\nSize: {}\nCondition: {}",
            d.item_type, price_line, d.brand, d.size, d.condition
        ),
    }
}
