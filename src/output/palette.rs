use crate::catalog::CategoryResolver;

const DEFAULT_ACCENT: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);

fn accent_for_code(code: &str) -> Option<(u8, u8, u8)> {
    let rgb = match code {
        "normal" => (0xA8, 0xA8, 0x78),
        "fighting" => (0xC0, 0x30, 0x28),
        "flying" => (0xA8, 0x90, 0xF0),
        "poison" => (0xA0, 0x40, 0xA0),
        "ground" => (0xE0, 0xC0, 0x68),
        "rock" => (0xB8, 0xA0, 0x38),
        "bug" => (0xA8, 0xB8, 0x20),
        "ghost" => (0x70, 0x58, 0x98),
        "steel" => (0xB8, 0xB8, 0xD0),
        "fire" => (0xF0, 0x80, 0x30),
        "water" => (0x68, 0x90, 0xF0),
        "grass" => (0x78, 0xC8, 0x50),
        "electric" => (0xF8, 0xD0, 0x30),
        "psychic" => (0xF8, 0x58, 0x88),
        "ice" => (0x98, 0xD8, 0xD8),
        "dragon" => (0x70, 0x38, 0xF8),
        "dark" => (0x70, 0x58, 0x48),
        "fairy" => (0xEE, 0x99, 0xAC),
        _ => return None,
    };
    Some(rgb)
}

/// Accent color for a category, given either its localized label or its
/// upstream code. Unknown categories are white.
pub fn accent_for(category: &str) -> (u8, u8, u8) {
    CategoryResolver::code_for_label(category)
        .and_then(accent_for_code)
        .or_else(|| accent_for_code(&category.to_lowercase()))
        .unwrap_or(DEFAULT_ACCENT)
}

/// `#RRGGBB` form of [`accent_for`]
pub fn accent_hex(category: &str) -> String {
    let (r, g, b) = accent_for(category);
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}
