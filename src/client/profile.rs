use std::{collections::BTreeMap, fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Marketplace persona a profile is built for. Unrelated to the account's
/// server-side `Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketRole {
    Investor,
    IdeaPitcher,
    SkilledWorker,
    Hirer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreLink {
    pub text: &'static str,
    pub icon: &'static str,
    pub link: &'static str,
}

impl MarketRole {
    pub const ALL: [MarketRole; 4] = [
        Self::Investor,
        Self::IdeaPitcher,
        Self::SkilledWorker,
        Self::Hirer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Investor => "investor",
            Self::IdeaPitcher => "idea-pitcher",
            Self::SkilledWorker => "skilled-worker",
            Self::Hirer => "hirer",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Investor => "Investor",
            Self::IdeaPitcher => "Idea Pitcher",
            Self::SkilledWorker => "Skilled Worker",
            Self::Hirer => "Hirer",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Investor => "fas fa-chart-line",
            Self::IdeaPitcher => "fas fa-lightbulb",
            Self::SkilledWorker => "fas fa-tools",
            Self::Hirer => "fas fa-handshake",
        }
    }

    /// Form fields in the order the form presents them.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Investor => &[
                "name",
                "email",
                "phone",
                "budget",
                "investmentAreas",
                "consultationPreference",
                "location",
                "bio",
            ],
            Self::IdeaPitcher => &[
                "name",
                "email",
                "phone",
                "ideaTitle",
                "ideaCategory",
                "fundingNeeded",
                "ideaDescription",
                "targetMarket",
                "documents",
                "video",
            ],
            Self::SkilledWorker => &[
                "name",
                "email",
                "phone",
                "skills",
                "experience",
                "rate",
                "location",
                "availability",
                "bio",
                "certifications",
                "website",
                "portfolio",
            ],
            Self::Hirer => &[
                "name",
                "email",
                "phone",
                "skillsNeeded",
                "budget",
                "location",
                "projectDuration",
                "consultationTime",
                "projectDescription",
                "urgency",
            ],
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Investor => &["name", "email", "phone", "budget", "location"],
            Self::IdeaPitcher => &[
                "name",
                "email",
                "phone",
                "ideaTitle",
                "ideaCategory",
                "fundingNeeded",
            ],
            Self::SkilledWorker => &["name", "email", "phone", "skills", "experience", "rate"],
            Self::Hirer => &["name", "email", "phone", "budget", "projectDescription"],
        }
    }

    pub fn explore(self) -> ExploreLink {
        match self {
            Self::Investor => ExploreLink {
                text: "Explore Ideas",
                icon: "fas fa-lightbulb",
                link: "explore-idea.html",
            },
            Self::IdeaPitcher => ExploreLink {
                text: "Explore Investors",
                icon: "fas fa-chart-line",
                link: "explore-investors.html",
            },
            Self::SkilledWorker => ExploreLink {
                text: "Explore Clients",
                icon: "fas fa-handshake",
                link: "explore-clients.html",
            },
            Self::Hirer => ExploreLink {
                text: "Explore Skills",
                icon: "fas fa-tools",
                link: "explore-skill.html",
            },
        }
    }
}

impl fmt::Display for MarketRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile type: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for MarketRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Reference to an uploaded file. The bytes live elsewhere; a profile only
/// carries this metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRef {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl UploadRef {
    pub fn validate_image(&self) -> Result<(), &'static str> {
        if self.size > MAX_IMAGE_BYTES {
            return Err("File size must be less than 5MB");
        }
        if !self.content_type.starts_with("image/") {
            return Err("Please select a valid image file");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Files(Vec<UploadRef>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Files(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// Locally persisted, role-shaped profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_type: MarketRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<UploadRef>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Profile {
    pub fn new(user_type: MarketRole) -> Self {
        Self {
            user_type,
            profile_picture: None,
            created_at: None,
            last_updated: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FieldValue::as_text)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name").map(str::trim).filter(|s| !s.is_empty())
    }

    /// Overlays the draft's text inputs on the profile.
    pub fn apply_draft(&mut self, draft: &Draft) {
        for (key, value) in &draft.0 {
            self.fields
                .insert(key.clone(), FieldValue::Text(value.clone()));
        }
    }
}

/// Unsubmitted text inputs of a role's form, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(pub BTreeMap<String, String>);

impl Draft {
    /// Text fields with a value; file and list inputs are not drafted.
    pub fn from_profile(profile: &Profile) -> Self {
        Self(
            profile
                .fields
                .iter()
                .filter_map(|(k, v)| match v {
                    FieldValue::Text(s) if !s.is_empty() => Some((k.clone(), s.clone())),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: &'static str,
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?\d{7,15}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    let clean: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&clean)
}

pub fn is_valid_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok()
}

/// Checks required fields, then the shape of email, phone and website.
/// Returns every problem found, one per field.
pub fn validate_profile(profile: &Profile) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message| {
        errors.push(FieldError {
            field: field.to_string(),
            message,
        })
    };

    for &field in profile.user_type.required_fields() {
        let value = profile.fields.get(field);
        if value.map_or(true, FieldValue::is_empty) {
            fail(field, "This field is required");
            continue;
        }
        let text = value.and_then(FieldValue::as_text).unwrap_or_default();
        match field {
            "email" if !is_valid_email(text) => fail(field, "Please enter a valid email address"),
            "phone" if !is_valid_phone(text) => fail(field, "Please enter a valid phone number"),
            _ => {}
        }
    }

    if let Some(picture) = &profile.profile_picture {
        if let Err(message) = picture.validate_image() {
            fail("profilePicture", message);
        }
    }

    if let Some(site) = profile.text("website").filter(|s| !s.is_empty()) {
        if !is_valid_url(site) {
            fail("website", "Please enter a valid URL");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
