//! Section Composer: decides which sections render and in what order.
//!
//! Enablement precedence: variant explicit → master explicit → built-in default.
//! Order precedence: variant `section_order` rule → `sectionSettings` key order as sent →
//! master `order` ascending. Sections the chosen order does not mention are
//! appended in master order so nothing becomes unreachable.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::models::resume::{ResumeMaster, SectionConfig, SectionKey};
use crate::models::variant::{SectionSetting, Variant, VariantRule};
use crate::resolution::ResolvedResume;

pub fn effective_enabled(
    key: SectionKey,
    variant_settings: &IndexMap<SectionKey, SectionSetting>,
    master_sections: &BTreeMap<SectionKey, SectionConfig>,
) -> bool {
    if let Some(setting) = variant_settings.get(&key) {
        return setting.enabled;
    }
    if let Some(config) = master_sections.get(&key) {
        return config.enabled;
    }
    key.enabled_by_default()
}

/// All sections sorted by the master's configured `order`; unconfigured ones last.
pub fn master_order(master: &ResumeMaster) -> Vec<SectionKey> {
    let mut keyed: Vec<(i32, SectionKey)> = SectionKey::ALL
        .into_iter()
        .map(|key| {
            let order = master.sections.get(&key).map(|c| c.order).unwrap_or(i32::MAX);
            (order, key)
        })
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, key)| key).collect()
}

/// The last `section_order` rule, if any, with unknown names and repeats dropped.
fn rule_order(rules: &[VariantRule]) -> Option<Vec<SectionKey>> {
    let names = rules.iter().rev().find_map(|rule| match rule {
        VariantRule::SectionOrder(names) => Some(names),
        _ => None,
    })?;

    let mut order = Vec::new();
    for key in names.iter().filter_map(|name| name.parse::<SectionKey>().ok()) {
        if !order.contains(&key) {
            order.push(key);
        }
    }
    Some(order)
}

/// Full section order for a variant, covering every section exactly once.
pub fn section_order(master: &ResumeMaster, variant: &Variant) -> Vec<SectionKey> {
    let mut order = rule_order(&variant.rules).unwrap_or_else(|| {
        if variant.section_settings.is_empty() {
            Vec::new()
        } else {
            variant.section_settings.keys().copied().collect()
        }
    });

    for key in master_order(master) {
        if !order.contains(&key) {
            order.push(key);
        }
    }
    order
}

/// Builds the renderable document: disabled sections are emptied and dropped
/// from `sections`, enabled ones are renumbered in their resolved order.
pub fn compose(master: &ResumeMaster, variant: &Variant, content: ResumeMaster) -> ResolvedResume {
    let sections: Vec<SectionKey> = section_order(master, variant)
        .into_iter()
        .filter(|key| effective_enabled(*key, &variant.section_settings, &master.sections))
        .collect();

    let mut resolved = content;
    for key in SectionKey::ALL {
        if !sections.contains(&key) {
            resolved.clear_section(key);
        }
    }
    resolved.sections = sections
        .iter()
        .enumerate()
        .map(|(order, key)| {
            (
                *key,
                SectionConfig {
                    enabled: true,
                    order: order as i32,
                },
            )
        })
        .collect();

    ResolvedResume {
        master: master.clone(),
        variant: Some(variant.clone()),
        resolved,
        sections,
    }
}
