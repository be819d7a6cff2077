//! File-system safe tokens and XML attribute escaping.

fn slugify(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect()
}

/// `Simon The Beggar` -> `simon_the_beggar`; `npc` when nothing usable is left.
pub fn slugify_name(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        "npc".to_string()
    } else {
        slug
    }
}

/// `Kazordoon Mines` -> `kazordoon_mines`; `unknown` for missing or unusable cities.
pub fn slugify_city(city: &str) -> String {
    let slug = slugify(city);
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

pub fn xml_escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
