//! Variant resolution: master + variant recipe → renderable resume.
//!
//! Pipeline: rules filter content, overrides edit the filtered document, then
//! the section composer applies enablement and ordering. Every stage is a pure
//! function of its inputs; callers recompute on each change instead of caching.

pub mod handlers;
pub mod overrides;
pub mod rules;
pub mod sections;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::resume::{ResumeMaster, SectionKey};
use crate::models::variant::Variant;

/// Ephemeral projection of the master for one variant. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResume {
    pub master: ResumeMaster,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    pub resolved: ResumeMaster,
    /// Enabled sections in render order.
    pub sections: Vec<SectionKey>,
}

pub fn resolve(master: &ResumeMaster, variant: Option<&Variant>) -> ResolvedResume {
    resolve_at(master, variant, Utc::now().date_naive())
}

/// `resolve` with an explicit "today" for date-range rules on ongoing roles.
pub fn resolve_at(
    master: &ResumeMaster,
    variant: Option<&Variant>,
    today: NaiveDate,
) -> ResolvedResume {
    let Some(variant) = variant else {
        return ResolvedResume {
            master: master.clone(),
            variant: None,
            resolved: master.clone(),
            sections: master.enabled_sections(),
        };
    };

    let filtered = rules::evaluate_rules(master, &variant.rules, today);
    let overridden = overrides::apply_overrides(&filtered, &variant.overrides);
    let resolved = sections::compose(master, variant, overridden);

    debug!(
        "Resolved variant '{}': {} experience entries, sections {:?}",
        variant.name,
        resolved.resolved.experience.len(),
        resolved.sections
    );
    resolved
}
