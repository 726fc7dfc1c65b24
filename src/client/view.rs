use serde::Serialize;
use time::{macros::format_description, PrimitiveDateTime};

use super::profile::{ExploreLink, FieldValue, Profile};
use crate::users::User;

const DEFAULT_FIELD_ICON: &str = "fas fa-info-circle";
const HIDDEN_FIELDS: [&str; 4] = ["userType", "profilePicture", "createdAt", "lastUpdated"];
const CURRENCY_FIELDS: [&str; 3] = ["budget", "fundingNeeded", "rate"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayField {
    pub key: String,
    pub label: String,
    pub icon: &'static str,
    pub value: String,
    /// Set when the value should render as a link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Everything the dashboard renders, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: String,
    pub title_icon: &'static str,
    pub welcome: String,
    pub display_name: String,
    pub picture: Option<String>,
    /// Shown in place of a picture.
    pub initials: Option<String>,
    pub fields: Vec<DisplayField>,
    pub explore_text: &'static str,
    pub explore_icon: &'static str,
    pub explore_link: &'static str,
}

impl DashboardView {
    pub fn build(user: Option<&User>, profile: &Profile) -> Self {
        let role = profile.user_type;
        let display_name = user
            .map(|u| u.name.trim())
            .filter(|n| !n.is_empty())
            .or_else(|| profile.name())
            .unwrap_or("User")
            .to_string();

        let picture = user
            .and_then(|u| u.profile_picture.clone())
            .filter(|p| !p.is_empty())
            .or_else(|| profile.profile_picture.as_ref().map(|p| p.id.clone()));
        let initials = match picture {
            Some(_) => None,
            None => Some(initials(&display_name)).filter(|s| !s.is_empty()),
        };

        let ordered = role
            .fields()
            .iter()
            .copied()
            .chain(
                profile
                    .fields
                    .keys()
                    .map(String::as_str)
                    .filter(|k| !role.fields().contains(k)),
            );
        let fields = ordered
            .filter_map(|key| {
                let value = profile.fields.get(key)?;
                if HIDDEN_FIELDS.contains(&key) || value.is_empty() {
                    return None;
                }
                Some(DisplayField {
                    key: key.to_string(),
                    label: label_for(key),
                    icon: icon_for(key),
                    value: format_value(key, value),
                    href: match (key, value) {
                        ("website", FieldValue::Text(url)) => Some(url.clone()),
                        _ => None,
                    },
                })
            })
            .collect();

        let ExploreLink { text, icon, link } = role.explore();
        Self {
            title: format!("{} Profile", role.display_name()),
            title_icon: role.icon(),
            welcome: format!("Welcome back, {display_name}!"),
            display_name,
            picture,
            initials,
            fields,
            explore_text: text,
            explore_icon: icon,
            explore_link: link,
        }
    }
}

/// First letter of up to two words, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn label_for(key: &str) -> String {
    let known = match key {
        "investmentAreas" => Some("Investment Areas"),
        "consultationPreference" => Some("Consultation Preference"),
        "ideaTitle" => Some("Idea Title"),
        "ideaCategory" => Some("Idea Category"),
        "fundingNeeded" => Some("Funding Needed"),
        "ideaDescription" => Some("Idea Description"),
        "targetMarket" => Some("Target Market"),
        "skillsNeeded" => Some("Skills Needed"),
        "projectDuration" => Some("Project Duration"),
        "consultationTime" => Some("Consultation Time"),
        "projectDescription" => Some("Project Description"),
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

pub fn icon_for(key: &str) -> &'static str {
    match key {
        "name" => "fas fa-user",
        "email" => "fas fa-envelope",
        "phone" => "fas fa-phone",
        "budget" | "rate" | "fundingNeeded" => "fas fa-dollar-sign",
        "location" => "fas fa-map-marker-alt",
        "bio" => "fas fa-info-circle",
        "skills" => "fas fa-cogs",
        "experience" => "fas fa-calendar-alt",
        "availability" => "fas fa-clock",
        "certifications" => "fas fa-certificate",
        "website" => "fas fa-globe",
        "investmentAreas" => "fas fa-tags",
        "consultationPreference" => "fas fa-comments",
        "ideaTitle" => "fas fa-star",
        "ideaCategory" => "fas fa-folder",
        "ideaDescription" => "fas fa-align-left",
        "targetMarket" => "fas fa-bullseye",
        "skillsNeeded" => "fas fa-search",
        "projectDuration" => "fas fa-hourglass-half",
        "consultationTime" => "fas fa-calendar-check",
        "projectDescription" => "fas fa-clipboard-list",
        "urgency" => "fas fa-exclamation-triangle",
        _ => DEFAULT_FIELD_ICON,
    }
}

pub fn format_value(key: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::List(items) => items.join(", "),
        FieldValue::Files(files) => files
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Text(text) if CURRENCY_FIELDS.contains(&key) => {
            format_currency(text).unwrap_or_else(|| text.clone())
        }
        FieldValue::Text(text) if key == "consultationTime" => {
            format_consultation_time(text).unwrap_or_else(|| text.clone())
        }
        FieldValue::Text(text) => text.clone(),
    }
}

/// `"1234.50"` → `"USD 1,234"`. Only the leading integer part counts.
pub fn format_currency(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let digits = match digits.trim_start_matches('0') {
        "" => "0",
        d => d,
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    Some(format!("USD {sign}{grouped}"))
}

/// `"2024-06-01T14:30"` → `"6/1/2024, 2:30:00 PM"`.
pub fn format_consultation_time(raw: &str) -> Option<String> {
    let with_secs = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let without_secs = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let dt = PrimitiveDateTime::parse(raw.trim(), with_secs)
        .or_else(|_| PrimitiveDateTime::parse(raw.trim(), without_secs))
        .ok()?;

    let (hour12, meridiem) = match dt.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    Some(format!(
        "{}/{}/{}, {}:{:02}:{:02} {}",
        u8::from(dt.month()),
        dt.day(),
        dt.year(),
        hour12,
        dt.minute(),
        dt.second(),
        meridiem
    ))
}
