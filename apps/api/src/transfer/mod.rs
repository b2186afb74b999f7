//! Section import/export: moves a single master section in and out of a
//! portable `{section, data, exportedAt}` document.
//!
//! This is the only place externally authored content enters the master, so it is
//! the only part of the pipeline that validates and can fail. Validation runs
//! up front; once it passes, merging cannot fail.

pub mod handlers;
pub mod validation;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::resume::{Award, Education, Experience, HasId, ResumeMaster, SectionKey, Skills};
use crate::transfer::validation::validate_import_data;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Section mismatch: expected '{expected}', document contains '{found}'")]
    SectionMismatch {
        expected: SectionKey,
        found: SectionKey,
    },

    #[error("Invalid import data: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Malformed section data: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
    Replace,
}

/// Self-describing single-section document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionExportData {
    pub section: SectionKey,
    pub data: Value,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
}

impl SectionExportData {
    /// `resume-<section>-<YYYY-MM-DD>.json`
    pub fn file_name(&self) -> String {
        format!(
            "resume-{}-{}.json",
            self.section,
            self.exported_at.date_naive().format("%Y-%m-%d")
        )
    }
}

/// Typed content of one section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Headline(String),
    Summary(Vec<String>),
    KeyAchievements(Vec<String>),
    Experience(Vec<Experience>),
    Education(Vec<Education>),
    Awards(Vec<Award>),
    Skills(Skills),
}

impl SectionData {
    pub fn from_master(master: &ResumeMaster, key: SectionKey) -> Self {
        match key {
            SectionKey::Headline => SectionData::Headline(master.headline.clone()),
            SectionKey::Summary => SectionData::Summary(master.summary.clone()),
            SectionKey::KeyAchievements => {
                SectionData::KeyAchievements(master.key_achievements.clone())
            }
            SectionKey::Experience => SectionData::Experience(master.experience.clone()),
            SectionKey::Education => SectionData::Education(master.education.clone()),
            SectionKey::Awards => SectionData::Awards(master.awards.clone()),
            SectionKey::Skills => SectionData::Skills(master.skills.clone()),
        }
    }

    pub fn decode(key: SectionKey, data: &Value) -> Result<Self, serde_json::Error> {
        let data = data.clone();
        Ok(match key {
            SectionKey::Headline => SectionData::Headline(serde_json::from_value(data)?),
            SectionKey::Summary => SectionData::Summary(serde_json::from_value(data)?),
            SectionKey::KeyAchievements => {
                SectionData::KeyAchievements(serde_json::from_value(data)?)
            }
            SectionKey::Experience => SectionData::Experience(serde_json::from_value(data)?),
            SectionKey::Education => SectionData::Education(serde_json::from_value(data)?),
            SectionKey::Awards => SectionData::Awards(serde_json::from_value(data)?),
            SectionKey::Skills => SectionData::Skills(serde_json::from_value(data)?),
        })
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            SectionData::Headline(v) => serde_json::to_value(v),
            SectionData::Summary(v) | SectionData::KeyAchievements(v) => serde_json::to_value(v),
            SectionData::Experience(v) => serde_json::to_value(v),
            SectionData::Education(v) => serde_json::to_value(v),
            SectionData::Awards(v) => serde_json::to_value(v),
            SectionData::Skills(v) => serde_json::to_value(v),
        }
    }
}

pub fn export_section(
    master: &ResumeMaster,
    key: SectionKey,
) -> Result<SectionExportData, TransferError> {
    let data = SectionData::from_master(master, key).to_value()?;
    Ok(SectionExportData {
        section: key,
        data,
        exported_at: Utc::now(),
    })
}

/// Validates a raw document and checks it carries the section the caller asked for.
pub fn parse_import(raw: &Value, expected: SectionKey) -> Result<SectionExportData, TransferError> {
    let declared = raw
        .get("section")
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<SectionKey>().ok());
    if let Some(found) = declared {
        if found != expected {
            return Err(TransferError::SectionMismatch { expected, found });
        }
    }

    let errors = validate_import_data(raw);
    if !errors.is_empty() {
        return Err(TransferError::Invalid(errors));
    }

    Ok(serde_json::from_value(raw.clone())?)
}

/// Applies an already-parsed section document and returns the updated master.
/// The input master is never modified.
pub fn import_section(
    master: &ResumeMaster,
    expected: SectionKey,
    import: &SectionExportData,
    mode: ImportMode,
) -> Result<ResumeMaster, TransferError> {
    if import.section != expected {
        return Err(TransferError::SectionMismatch {
            expected,
            found: import.section,
        });
    }
    let data = SectionData::decode(import.section, &import.data)?;

    let mut updated = master.clone();
    let added = match mode {
        ImportMode::Replace => replace_section(&mut updated, data),
        ImportMode::Merge => merge_section(&mut updated, data),
    };
    updated.touch();

    info!("Imported section '{expected}' ({mode:?}): {added} item(s) written");
    Ok(updated)
}

/// `parse_import` followed by `import_section`.
pub fn import_single_section(
    master: &ResumeMaster,
    raw: &Value,
    expected: SectionKey,
    mode: ImportMode,
) -> Result<ResumeMaster, TransferError> {
    let import = parse_import(raw, expected)?;
    import_section(master, expected, &import, mode)
}

pub fn clear_section_data(master: &ResumeMaster, key: SectionKey) -> ResumeMaster {
    let mut updated = master.clone();
    updated.clear_section(key);
    updated.touch();
    updated
}

fn replace_section(master: &mut ResumeMaster, data: SectionData) -> usize {
    match data {
        SectionData::Headline(v) => {
            master.headline = v;
            1
        }
        SectionData::Summary(v) => {
            master.summary = v;
            master.summary.len()
        }
        SectionData::KeyAchievements(v) => {
            master.key_achievements = v;
            master.key_achievements.len()
        }
        SectionData::Experience(v) => {
            master.experience = v;
            master.experience.len()
        }
        SectionData::Education(v) => {
            master.education = v;
            master.education.len()
        }
        SectionData::Awards(v) => {
            master.awards = v;
            master.awards.len()
        }
        SectionData::Skills(v) => {
            master.skills = v;
            1
        }
    }
}

/// List sections gain the non-colliding items; scalar and object sections are replaced.
fn merge_section(master: &mut ResumeMaster, data: SectionData) -> usize {
    match data {
        SectionData::Summary(v) => merge_text(&mut master.summary, v),
        SectionData::KeyAchievements(v) => merge_text(&mut master.key_achievements, v),
        SectionData::Experience(v) => merge_records(&mut master.experience, v),
        SectionData::Education(v) => merge_records(&mut master.education, v),
        SectionData::Awards(v) => merge_records(&mut master.awards, v),
        scalar @ (SectionData::Headline(_) | SectionData::Skills(_)) => {
            replace_section(master, scalar)
        }
    }
}

fn merge_records<T: HasId>(existing: &mut Vec<T>, incoming: Vec<T>) -> usize {
    let mut ids: HashSet<String> = existing.iter().map(|item| item.id().to_string()).collect();
    let before = existing.len();
    for item in incoming {
        if ids.insert(item.id().to_string()) {
            existing.push(item);
        }
    }
    existing.len() - before
}

fn merge_text(existing: &mut Vec<String>, incoming: Vec<String>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|s| normalize_text(s)).collect();
    let before = existing.len();
    for item in incoming {
        if seen.insert(normalize_text(&item)) {
            existing.push(item);
        }
    }
    existing.len() - before
}

/// Case- and whitespace-insensitive form used to detect duplicate prose.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
