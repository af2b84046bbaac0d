//! Maps free-text category labels (from the classifier or the roster sheet)
//! onto the fixed [`Category`] taxonomy.

use crate::domain::model::Category;

/// Ordered alias table. The first entry whose alias equals, or is contained
/// in, the label wins; entry order is therefore part of the contract.
pub const CATEGORY_ALIASES: [(Category, &[&str]); 10] = [
    (
        Category::Games,
        &["game", "games", "gaming", "video games", "esports"],
    ),
    (
        Category::Social,
        &["social", "community", "messaging", "chat"],
    ),
    (
        Category::Entertainment,
        &["entertainment", "media", "music", "video", "streaming"],
    ),
    (
        Category::Productivity,
        &["productivity", "tools", "workspace", "notes", "calendar", "tasks"],
    ),
    (
        Category::Lifestyle,
        &["lifestyle", "home", "shopping", "dating"],
    ),
    (
        Category::HealthAndFitness,
        &["health", "fitness", "wellness", "workout", "gym", "nutrition"],
    ),
    (
        Category::Education,
        &["education", "learning", "course", "school", "training"],
    ),
    (
        Category::Business,
        &["business", "b2b", "enterprise", "crm", "sales", "marketing"],
    ),
    (
        Category::Finance,
        &[
            "finance", "fintech", "bank", "banking", "payments", "wallet", "credit", "investing",
        ],
    ),
    (
        Category::Utilities,
        &["utilities", "utility", "security", "vpn", "scanner", "file", "storage"],
    ),
];

/// Trims, collapses inner whitespace and title-cases every word:
/// `"  video   GAMES "` becomes `"Video Games"`.
pub fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_to_canonical_category(raw_label: &str) -> Option<Category> {
    let key = title_case(raw_label).to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(category) = Category::ALL
        .into_iter()
        .find(|c| c.label().to_lowercase() == key)
    {
        return Some(category);
    }

    CATEGORY_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| key.contains(alias)))
        .map(|(category, _)| *category)
}
