use crate::core::roster::Roster;
use crate::domain::model::{Category, Creator};
use url::Url;

/// Polynomial rolling hash over the seed's code points:
/// `hash = (hash * 31 + code_point) mod 2^32`, starting from 0.
pub fn seed_hash(seed: &str) -> u32 {
    seed.chars()
        .fold(0u32, |hash, ch| hash.wrapping_mul(31).wrapping_add(ch as u32))
}

/// Lowercased host + path + query of the website. Scheme and fragment are
/// left out so they never change which creator is picked.
pub fn selection_seed(website: &Url) -> String {
    let mut seed = String::new();
    seed.push_str(website.host_str().unwrap_or_default());
    seed.push_str(website.path());
    if let Some(query) = website.query().filter(|q| !q.is_empty()) {
        seed.push('?');
        seed.push_str(query);
    }
    seed.to_lowercase()
}

/// Picks one creator of `category` for `seed`. Stable for a fixed roster
/// snapshot; `None` when the category has no creators.
pub fn pick_creator<'a>(roster: &'a Roster, category: Category, seed: &str) -> Option<&'a Creator> {
    let creators = roster.creators(category);
    if creators.is_empty() {
        return None;
    }
    let index = seed_hash(seed) as usize % creators.len();
    creators.get(index)
}
