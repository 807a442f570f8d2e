//! Prompt construction for ad generation and SEO optimization.
//!
//! Everything here is a pure function from structured listing data to prompt
//! text. The system instruction and the per-tone registers are fixed product
//! copy; the detail block is rebuilt from the form on every request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod details;
mod schema;

pub use details::details_block;
pub use schema::{generation_schema, optimization_schema};

use adforge_core::{AdRequest, OptimizeRequest, Tone};

/// Fixed system instruction for ad generation.
///
/// Sent as the provider's system prompt on every generation call.
pub const SYSTEM_INSTRUCTION: &str = r#"Act as a top-tier professional copywriter specializing in Russian classifieds (Avito, Youla).
Your task is to write high-converting ad copy AND provide a smart, actionable tip to help the user sell faster.

**CRITICAL GUIDELINES FOR AD TEXT:**
1. **Format**: Use valid Markdown. Use **bold** for the title and key features. Use bullet points (-) for lists.
2. **Structure**: Hook -> Body (Benefits > Features) -> Details (Bulleted list) -> Reason for selling -> CTA.
3. **Language**: Natural, spoken Russian. Avoid "robot" phrases.
4. **Tone**: Adapt strictly to the requested tone.

**CRITICAL GUIDELINES FOR SMART TIP:**
Provide a short, specific piece of advice (1 sentence) based on the item category and condition.
- **Auto**: Suggest photos of documents, specific angles, or mentioning maintenance history.
- **Electronics**: Suggest showing battery health, specific ports, or serial number.
- **Clothing**: Suggest photos of tags, material close-ups, or fit details.
- **Services**: Suggest adding a portfolio link or offering a free consultation.
Example: "Сфотографируйте бирку с составом ткани — это снимает 30% вопросов покупателей.""#;

/// Note appended to the prompt when a photo rides along with the request.
pub const PHOTO_NOTE: &str =
    "\n\n[System Note: An image is provided. Analyze it to add specific visual details to the description.]";

/// Per-tone instruction line injected into the generation prompt.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Aggressive => {
            r#"TONE: Energetic, assertive, "Sales" focus. Use phrases like "Успей купить", "Торга нет"."#
        }
        Tone::Polite => "TONE: Friendly, sincere, trustworthy. Focus on care and history.",
        Tone::Brief => "TONE: Minimalist, dry, strict facts. List format preferred.",
        Tone::Restrained => "TONE: Calm, objective, professional. Balanced assessment.",
        Tone::Natural => {
            "TONE: Ultra-realistic private seller. Casual, lower-case where appropriate, simple sentences."
        }
    }
}

/// Build the generation prompt for a draft request.
///
/// The photo note is appended by the caller once it has decided the photo is
/// actually going over the wire.
///
/// # Examples
///
/// ```
/// use adforge_core::{AdRequest, ElectronicsData, ListingDetails, Tone};
/// use adforge_prompt::generation_prompt;
///
/// let request = AdRequest {
///     details: ListingDetails::Electronics(ElectronicsData {
///         model: "iPhone 13".to_string(),
///         specs: "256GB".to_string(),
///         ..Default::default()
///     }),
///     tone: Tone::Brief,
///     model: None,
/// };
/// let prompt = generation_prompt(&request);
/// assert!(prompt.contains("iPhone 13"));
/// assert!(prompt.contains("TONE: Minimalist"));
/// ```
pub fn generation_prompt(request: &AdRequest) -> String {
    let details = details_block(&request.details);

    format!(
        "Write a classified ad in Russian for the following item:\n\n{}\n\n{}\n\nFormat the text using Markdown. Make it visually appealing with bold headers and bulleted lists.",
        details,
        tone_instruction(request.tone)
    )
}

/// Build the SEO optimization prompt for an existing ad.
pub fn optimization_prompt(request: &OptimizeRequest) -> String {
    let details = details_block(&request.details);

    format!(
        r#"Act as an expert SEO-marketer for Avito/Youla.

Your Goal:
Increase the search visibility of this ad by organically integrating high-frequency keywords.

Input:
1. Item Details: {}
2. Current Ad Text: {}

Task:
1. Identify 5-8 relevant, high-traffic keywords for this specific item.
2. Rewrite the "Current Ad Text" to include these keywords naturally.
3. KEEP the original tone and Markdown structure.
4. Return the result in JSON format."#,
        details, request.current_text
    )
}
