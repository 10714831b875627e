//! Price and rating formatting helpers.

use shopview_core::Rating;

/// Format a price with two decimals (e.g., "$19.99").
pub fn fmt_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Compact rating for table cells: "★ 4.1 (12)".
pub fn fmt_rating(rating: &Rating) -> String {
    format!("★ {:.1} ({})", rating.rate, rating.count)
}

/// Five-slot star bar for the detail panel, rounded to the nearest star.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
pub fn fmt_stars(rate: f64) -> String {
    let filled = rate.clamp(0.0, 5.0).round() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
