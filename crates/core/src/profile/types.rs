//! Profile and contact types.

use serde::{Deserialize, Serialize};

use crate::config::{ProfileConfig, SearchConfig};

/// Contact fields used by drivers when filling application forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Candidate attributes the listings are scored against.
///
/// Skills and keywords are stored lowercased and de-duplicated, preserving
/// the configured order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Profile {
    pub fn new(
        skills: impl IntoIterator<Item = impl AsRef<str>>,
        experience_years: u32,
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            skills: normalize_terms(skills),
            experience_years,
            keywords: normalize_terms(keywords),
            contact: ContactInfo::default(),
        }
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = contact;
        self
    }

    /// Build the run profile from the `[profile]` and `[search]` sections.
    pub fn from_config(profile: &ProfileConfig, search: &SearchConfig) -> Self {
        Self::new(&profile.skills, profile.experience_years, &search.keywords).with_contact(
            ContactInfo {
                name: profile.name.clone(),
                email: profile.email.clone(),
                phone: profile.phone.clone(),
            },
        )
    }
}

fn normalize_terms(terms: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}
