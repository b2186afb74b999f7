use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named top-level grouping of resume content.
///
/// Declaration order is the canonical section order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Headline,
    Summary,
    KeyAchievements,
    Experience,
    Education,
    Awards,
    Skills,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Headline,
        SectionKey::Summary,
        SectionKey::KeyAchievements,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Awards,
        SectionKey::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Headline => "headline",
            SectionKey::Summary => "summary",
            SectionKey::KeyAchievements => "key_achievements",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Awards => "awards",
            SectionKey::Skills => "skills",
        }
    }

    /// Prose sections are opt-in; everything else renders unless disabled.
    pub fn enabled_by_default(&self) -> bool {
        !matches!(self, SectionKey::Summary | SectionKey::KeyAchievements)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown section '{s}'"))
    }
}

/// List items that carry a caller-assigned, stable `id`.
pub trait HasId {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub date_start: String,
    /// `None` means the role is ongoing.
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Experience {
    pub fn is_current(&self) -> bool {
        self.date_end
            .as_deref()
            .map(|d| d.trim().is_empty() || d.eq_ignore_ascii_case("present"))
            .unwrap_or(true)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_resume_date(&self.date_start)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        if self.is_current() {
            return None;
        }
        self.date_end.as_deref().and_then(parse_resume_date)
    }

    /// Tags compare trimmed and ASCII case-insensitively.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags
            .iter()
            .any(|own| tags.iter().any(|t| t.trim().eq_ignore_ascii_case(own.trim())))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HasId for Experience {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Education {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Award {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub enabled: bool,
    pub order: i32,
}

/// The single source of truth for a person's professional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMaster {
    pub id: String,
    pub owner: String,
    #[serde(default)]
    pub contacts: Contacts,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub key_achievements: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub sections: BTreeMap<SectionKey, SectionConfig>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ResumeMaster {
    /// An empty master with every section at its default enablement, in canonical order.
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        let sections = SectionKey::ALL
            .iter()
            .enumerate()
            .map(|(order, key)| {
                (
                    *key,
                    SectionConfig {
                        enabled: key.enabled_by_default(),
                        order: order as i32,
                    },
                )
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            owner: owner.into(),
            contacts: Contacts::default(),
            headline: String::new(),
            summary: Vec::new(),
            key_achievements: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            awards: Vec::new(),
            skills: Skills::default(),
            sections,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Resets one section to its empty representation.
    pub fn clear_section(&mut self, key: SectionKey) {
        match key {
            SectionKey::Headline => self.headline.clear(),
            SectionKey::Summary => self.summary.clear(),
            SectionKey::KeyAchievements => self.key_achievements.clear(),
            SectionKey::Experience => self.experience.clear(),
            SectionKey::Education => self.education.clear(),
            SectionKey::Awards => self.awards.clear(),
            SectionKey::Skills => self.skills = Skills::default(),
        }
    }

    /// Returns the enabled sections sorted by their configured `order`.
    /// Sections without a config fall back to their default enablement and sort last.
    pub fn enabled_sections(&self) -> Vec<SectionKey> {
        let mut keyed: Vec<(i32, SectionKey)> = SectionKey::ALL
            .into_iter()
            .filter(|key| {
                self.sections
                    .get(key)
                    .map(|c| c.enabled)
                    .unwrap_or_else(|| key.enabled_by_default())
            })
            .map(|key| {
                let order = self.sections.get(&key).map(|c| c.order).unwrap_or(i32::MAX);
                (order, key)
            })
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, key)| key).collect()
    }
}

/// Parses the date formats used on resumes: `YYYY`, `YYYY-MM` and `YYYY-MM-DD`.
/// Partial dates resolve to the first day of the period.
pub fn parse_resume_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    let mut parts = raw.splitn(2, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
