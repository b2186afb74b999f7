//! Variant documents: transformation recipes over the master resume.
//!
//! Rules and overrides keep their loose `{type, value}` / `{path, operation, value}`
//! wire shape, but are decoded into typed values at the deserialization boundary.
//! A known kind or path with a mis-shaped payload is rejected there; unknown kinds
//! and paths are carried verbatim and ignored during resolution.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::resume::SectionKey;

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum VariantRule {
    IncludeTags(Vec<String>),
    ExcludeTags(Vec<String>),
    MaxBullets(usize),
    /// Section names in the desired order. Unknown names are skipped when composing.
    SectionOrder(Vec<String>),
    DateRange(DateBounds),
    Unrecognized(RawRule),
}

impl TryFrom<RawRule> for VariantRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let kind = raw.kind.clone();
        let rule = match kind.as_str() {
            "include_tags" => VariantRule::IncludeTags(decode_rule(&raw, "a list of tags")?),
            "exclude_tags" => VariantRule::ExcludeTags(decode_rule(&raw, "a list of tags")?),
            "max_bullets" => VariantRule::MaxBullets(decode_rule(&raw, "a non-negative integer")?),
            "section_order" => {
                VariantRule::SectionOrder(decode_rule(&raw, "a list of section names")?)
            }
            "date_range" => VariantRule::DateRange(decode_rule(
                &raw,
                "an object with optional 'start' and 'end'",
            )?),
            _ => VariantRule::Unrecognized(raw),
        };
        Ok(rule)
    }
}

fn decode_rule<T: serde::de::DeserializeOwned>(raw: &RawRule, expected: &str) -> Result<T, String> {
    serde_json::from_value(raw.value.clone())
        .map_err(|_| format!("Rule '{}' expects {expected}, got {}", raw.kind, raw.value))
}

impl From<VariantRule> for RawRule {
    fn from(rule: VariantRule) -> Self {
        let (kind, value) = match rule {
            VariantRule::IncludeTags(tags) => ("include_tags", Value::from(tags)),
            VariantRule::ExcludeTags(tags) => ("exclude_tags", Value::from(tags)),
            VariantRule::MaxBullets(n) => ("max_bullets", Value::from(n)),
            VariantRule::SectionOrder(order) => ("section_order", Value::from(order)),
            VariantRule::DateRange(bounds) => (
                "date_range",
                serde_json::to_value(bounds).unwrap_or(Value::Null),
            ),
            VariantRule::Unrecognized(raw) => return raw,
        };
        RawRule {
            kind: kind.to_string(),
            value,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Overrides
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOperation {
    Set,
    Add,
    Remove,
    Move,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOverride {
    pub path: String,
    pub operation: OverrideOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Addresses an item inside an ordered list: by position, or by id / exact text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Index(usize),
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    pub from: ItemRef,
    pub to: usize,
}

/// Plain-string lists an override can edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextList {
    Summary,
    KeyAchievements,
    PrimarySkills,
    SecondarySkills,
    /// `experience.<id>.bullets`
    Bullets(String),
}

impl TextList {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "summary" => Some(TextList::Summary),
            "key_achievements" => Some(TextList::KeyAchievements),
            "skills.primary" => Some(TextList::PrimarySkills),
            "skills.secondary" => Some(TextList::SecondarySkills),
            _ => path
                .strip_prefix("experience.")
                .and_then(|rest| rest.strip_suffix(".bullets"))
                .filter(|id| !id.is_empty())
                .map(|id| TextList::Bullets(id.to_string())),
        }
    }

    fn path(&self) -> String {
        match self {
            TextList::Summary => "summary".to_string(),
            TextList::KeyAchievements => "key_achievements".to_string(),
            TextList::PrimarySkills => "skills.primary".to_string(),
            TextList::SecondarySkills => "skills.secondary".to_string(),
            TextList::Bullets(id) => format!("experience.{id}.bullets"),
        }
    }
}

/// Record lists whose items carry an `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordList {
    Experience,
    Education,
    Awards,
}

impl RecordList {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "experience" => Some(RecordList::Experience),
            "education" => Some(RecordList::Education),
            "awards" => Some(RecordList::Awards),
            _ => None,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            RecordList::Experience => "experience",
            RecordList::Education => "education",
            RecordList::Awards => "awards",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    Set(Vec<String>),
    Add(String),
    Remove(ItemRef),
    Move(MoveSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordEdit {
    Remove(String),
    Move(MoveSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOverride", into = "RawOverride")]
pub enum VariantOverride {
    /// `experience_order` + `set`: preferred experience ordering by id.
    ExperienceOrder(Vec<String>),
    Headline(String),
    Text { list: TextList, edit: TextEdit },
    Records { list: RecordList, edit: RecordEdit },
    Unrecognized(RawOverride),
}

impl VariantOverride {
    pub fn path(&self) -> String {
        match self {
            VariantOverride::ExperienceOrder(_) => "experience_order".to_string(),
            VariantOverride::Headline(_) => "headline".to_string(),
            VariantOverride::Text { list, .. } => list.path(),
            VariantOverride::Records { list, .. } => list.path().to_string(),
            VariantOverride::Unrecognized(raw) => raw.path.clone(),
        }
    }

    pub fn operation(&self) -> OverrideOperation {
        match self {
            VariantOverride::ExperienceOrder(_)
            | VariantOverride::Headline(_)
            | VariantOverride::Text {
                edit: TextEdit::Set(_),
                ..
            } => OverrideOperation::Set,
            VariantOverride::Text {
                edit: TextEdit::Add(_),
                ..
            } => OverrideOperation::Add,
            VariantOverride::Text {
                edit: TextEdit::Remove(_),
                ..
            }
            | VariantOverride::Records {
                edit: RecordEdit::Remove(_),
                ..
            } => OverrideOperation::Remove,
            VariantOverride::Text {
                edit: TextEdit::Move(_),
                ..
            }
            | VariantOverride::Records {
                edit: RecordEdit::Move(_),
                ..
            } => OverrideOperation::Move,
            VariantOverride::Unrecognized(raw) => raw.operation,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    raw: &RawOverride,
    expected: &str,
) -> Result<T, String> {
    let value = raw.value.clone().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|_| {
        format!(
            "Override '{}' ({:?}) expects {expected}",
            raw.path, raw.operation
        )
    })
}

impl TryFrom<RawOverride> for VariantOverride {
    type Error = String;

    fn try_from(raw: RawOverride) -> Result<Self, Self::Error> {
        use OverrideOperation::*;

        let unsupported = || {
            format!(
                "Operation {:?} is not supported on path '{}'",
                raw.operation, raw.path
            )
        };

        if raw.path == "experience_order" {
            return match raw.operation {
                Set => Ok(VariantOverride::ExperienceOrder(decode(
                    &raw,
                    "a list of experience ids",
                )?)),
                _ => Err(unsupported()),
            };
        }

        if raw.path == "headline" {
            return match raw.operation {
                Set => Ok(VariantOverride::Headline(decode(&raw, "a string")?)),
                _ => Err(unsupported()),
            };
        }

        if let Some(list) = TextList::from_path(&raw.path) {
            let edit = match raw.operation {
                Set => TextEdit::Set(decode(&raw, "a list of strings")?),
                Add => TextEdit::Add(decode(&raw, "a string")?),
                Remove => TextEdit::Remove(decode(&raw, "an index or the item text")?),
                Move => TextEdit::Move(decode(&raw, "an object with 'from' and 'to'")?),
            };
            return Ok(VariantOverride::Text { list, edit });
        }

        if let Some(list) = RecordList::from_path(&raw.path) {
            let edit = match raw.operation {
                Remove => RecordEdit::Remove(decode(&raw, "an item id")?),
                Move => RecordEdit::Move(decode(&raw, "an object with 'from' and 'to'")?),
                Set | Add => return Err(unsupported()),
            };
            return Ok(VariantOverride::Records { list, edit });
        }

        Ok(VariantOverride::Unrecognized(raw))
    }
}

impl From<VariantOverride> for RawOverride {
    fn from(o: VariantOverride) -> Self {
        let path = o.path();
        let operation = o.operation();
        let value = match o {
            VariantOverride::ExperienceOrder(ids) => Value::from(ids),
            VariantOverride::Headline(text) => Value::from(text),
            VariantOverride::Text { edit, .. } => match edit {
                TextEdit::Set(items) => Value::from(items),
                TextEdit::Add(item) => Value::from(item),
                TextEdit::Remove(item) => serde_json::to_value(item).unwrap_or(Value::Null),
                TextEdit::Move(spec) => serde_json::to_value(spec).unwrap_or(Value::Null),
            },
            VariantOverride::Records { edit, .. } => match edit {
                RecordEdit::Remove(id) => Value::from(id),
                RecordEdit::Move(spec) => serde_json::to_value(spec).unwrap_or(Value::Null),
            },
            VariantOverride::Unrecognized(raw) => return raw,
        };
        RawOverride {
            path,
            operation,
            value: Some(value),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Variant
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSetting {
    pub enabled: bool,
}

/// A named, derived view of the master. Stores instructions only, never content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub rules: Vec<VariantRule>,
    #[serde(default)]
    pub overrides: Vec<VariantOverride>,
    #[serde(rename = "sectionSettings", default)]
    /// Key order is the variant's own section order.
    pub section_settings: IndexMap<SectionKey, SectionSetting>,
    #[serde(rename = "templateId", default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            rules: Vec::new(),
            overrides: Vec::new(),
            section_settings: IndexMap::new(),
            template_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copies the recipe under a fresh id and name.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Records an override edit. A `set` replaces an earlier `set` on the same path
    /// in place; every other operation is appended.
    pub fn upsert_override(&mut self, edit: VariantOverride) {
        if edit.operation() == OverrideOperation::Set {
            let path = edit.path();
            if let Some(existing) = self
                .overrides
                .iter_mut()
                .find(|o| o.operation() == OverrideOperation::Set && o.path() == path)
            {
                *existing = edit;
                return;
            }
        }
        self.overrides.push(edit);
    }
}
