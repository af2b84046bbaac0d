//! Text rendering for a match card and its outreach message.

use crate::domain::model::Category;
use url::Url;

pub fn format_outreach(brand_host: &str, category: Category, creator_first_name: &str) -> String {
    [
        format!("Hi {}!", creator_first_name),
        String::new(),
        format!(
            "I’m reaching out from {}. We’re in {} and I think your audience is a strong fit.",
            brand_host, category
        ),
        "Would you be open to a quick collaboration idea?".to_string(),
        String::new(),
        "If yes, what are your rates and availability for the next 2 weeks?".to_string(),
        String::new(),
        "Thanks!".to_string(),
        "—".to_string(),
    ]
    .join("\n")
}

pub fn confidence_label(confidence: f64) -> &'static str {
    if confidence >= 0.75 {
        "High"
    } else if confidence >= 0.55 {
        "Medium"
    } else {
        "Low"
    }
}

/// Host of the brand's website without a leading `www.`.
pub fn brand_host(website: &Url) -> String {
    let host = website.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn price_text(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${}", p),
        None => "—".to_string(),
    }
}
