//! Reduce raw listings to the photo gallery and price figures the app shows.

use crate::vehicles::types::{Listing, ListingSummary};

/// Colour value meaning "no colour filter".
pub const ANY_COLOR: &str = "Todas";

/// Translate a Portuguese colour name to the English name Auto.dev expects.
///
/// Returns `None` for the "any colour" choice; names without a mapping are
/// forwarded unchanged.
pub fn color_filter(color: &str) -> Option<String> {
    let color = color.trim();
    if color.is_empty() || color == ANY_COLOR {
        return None;
    }
    let english = match color {
        "Preto" => "Black",
        "Branco" => "White",
        "Prata" => "Silver",
        "Cinza" => "Gray",
        "Azul" => "Blue",
        "Vermelho" => "Red",
        "Verde" => "Green",
        "Amarelo" => "Yellow",
        "Laranja" => "Orange",
        "Rosa" => "Pink",
        "Roxo" => "Purple",
        "Marrom" => "Brown",
        "Bege" => "Beige",
        "Dourado" => "Gold",
        other => other,
    };
    Some(english.to_string())
}

/// Collect unique photos (first-seen order) and one price per listing.
pub fn summarize(listings: &[Listing]) -> ListingSummary {
    let mut photos: Vec<String> = Vec::new();
    let mut prices = Vec::new();

    for listing in listings {
        for url in listing.photos() {
            if !photos.iter().any(|seen| seen == url) {
                photos.push(url.to_string());
            }
        }
        if let Some(price) = listing.effective_price() {
            prices.push(price);
        }
    }

    let average_price = if prices.is_empty() {
        None
    } else {
        let sum: f64 = prices.iter().filter_map(|p| p.as_f64()).sum();
        Some((sum / prices.len() as f64).round() as i64)
    };

    ListingSummary {
        photos,
        prices,
        average_price,
    }
}
