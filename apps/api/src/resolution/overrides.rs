//! Override Applicator: replays a variant's override list over rule-filtered content.
//!
//! Overrides run strictly in order, each against the document left by the previous
//! one. A later `set` therefore supersedes an earlier `set` on the same path, while
//! `add` edits accumulate. Targets that do not exist (filtered-out experience,
//! stale ids, out-of-range indices) and unrecognized paths are no-ops.

use tracing::debug;

use crate::models::resume::{HasId, ResumeMaster};
use crate::models::variant::{
    ItemRef, MoveSpec, RecordEdit, RecordList, TextEdit, TextList, VariantOverride,
};

pub fn apply_overrides(filtered: &ResumeMaster, overrides: &[VariantOverride]) -> ResumeMaster {
    let mut doc = filtered.clone();
    for edit in overrides {
        apply_override(&mut doc, edit);
    }
    doc
}

fn apply_override(doc: &mut ResumeMaster, edit: &VariantOverride) {
    match edit {
        VariantOverride::ExperienceOrder(ids) => {
            let current = std::mem::take(&mut doc.experience);
            doc.experience = order_by_ids(current, ids);
        }
        VariantOverride::Headline(text) => doc.headline = text.clone(),
        VariantOverride::Text { list, edit } => {
            let create = matches!(edit, TextEdit::Set(_) | TextEdit::Add(_));
            if let Some(items) = text_list_mut(doc, list, create) {
                apply_text_edit(items, edit);
            }
        }
        VariantOverride::Records { list, edit } => match list {
            RecordList::Experience => apply_record_edit(&mut doc.experience, edit),
            RecordList::Education => apply_record_edit(&mut doc.education, edit),
            RecordList::Awards => apply_record_edit(&mut doc.awards, edit),
        },
        VariantOverride::Unrecognized(raw) => {
            debug!("Ignoring override on unrecognized path '{}'", raw.path);
        }
    }
}

/// Reorders `items` so the listed ids come first, in the listed order. Items the
/// list does not mention follow in their existing relative order; unknown and
/// repeated ids are skipped.
pub fn order_by_ids<T: HasId>(items: Vec<T>, ids: &[String]) -> Vec<T> {
    let mut remaining: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for id in ids {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| item.id() == id.as_str()));
        if let Some(slot) = slot {
            ordered.extend(slot.take());
        }
    }

    ordered.extend(remaining.into_iter().flatten());
    ordered
}

fn text_list_mut<'a>(
    doc: &'a mut ResumeMaster,
    list: &TextList,
    create: bool,
) -> Option<&'a mut Vec<String>> {
    match list {
        TextList::Summary => Some(&mut doc.summary),
        TextList::KeyAchievements => Some(&mut doc.key_achievements),
        TextList::PrimarySkills => Some(&mut doc.skills.primary),
        TextList::SecondarySkills => {
            if create {
                Some(doc.skills.secondary.get_or_insert_with(Vec::new))
            } else {
                doc.skills.secondary.as_mut()
            }
        }
        TextList::Bullets(experience_id) => doc
            .experience
            .iter_mut()
            .find(|e| &e.id == experience_id)
            .map(|e| &mut e.bullets),
    }
}

fn apply_text_edit(items: &mut Vec<String>, edit: &TextEdit) {
    match edit {
        TextEdit::Set(values) => *items = values.clone(),
        TextEdit::Add(value) => items.push(value.clone()),
        TextEdit::Remove(target) => {
            if let Some(index) = text_position(items, target) {
                items.remove(index);
            }
        }
        TextEdit::Move(spec) => {
            let from = text_position(items, &spec.from);
            move_item(items, from, spec);
        }
    }
}

fn apply_record_edit<T: HasId>(items: &mut Vec<T>, edit: &RecordEdit) {
    match edit {
        RecordEdit::Remove(id) => items.retain(|item| item.id() != id.as_str()),
        RecordEdit::Move(spec) => {
            let from = match &spec.from {
                ItemRef::Index(i) => Some(*i).filter(|i| *i < items.len()),
                ItemRef::Key(id) => items.iter().position(|item| item.id() == id.as_str()),
            };
            move_item(items, from, spec);
        }
    }
}

fn text_position(items: &[String], target: &ItemRef) -> Option<usize> {
    match target {
        ItemRef::Index(i) => Some(*i).filter(|i| *i < items.len()),
        ItemRef::Key(text) => items.iter().position(|item| item.trim() == text.trim()),
    }
}

/// Extract-then-reinsert. A destination past the end lands on the last slot.
fn move_item<T>(items: &mut Vec<T>, from: Option<usize>, spec: &MoveSpec) {
    let Some(from) = from else {
        return;
    };
    let item = items.remove(from);
    let to = spec.to.min(items.len());
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience};
    use crate::models::variant::{OverrideOperation, RawOverride};

    fn exp(id: &str) -> Experience {
        Experience {
            id: id.to_string(),
            company: format!("{id} Corp"),
            title: "Engineer".to_string(),
            location: String::new(),
            date_start: "2020-01".to_string(),
            date_end: None,
            bullets: vec![format!("{id} shipped"), format!("{id} scaled")],
            tags: vec![],
        }
    }

    fn master() -> ResumeMaster {
        let mut master = ResumeMaster::new("Ada");
        master.headline = "Engineer".to_string();
        master.summary = vec!["First".to_string(), "Second".to_string()];
        master.experience = vec![exp("e1"), exp("e2"), exp("e3")];
        master.education = vec![
            Education {
                id: "ed1".to_string(),
                degree: "BSc".to_string(),
                school: "MIT".to_string(),
                location: String::new(),
                year: None,
            },
            Education {
                id: "ed2".to_string(),
                degree: "MSc".to_string(),
                school: "ETH".to_string(),
                location: String::new(),
                year: None,
            },
        ];
        master
    }

    fn order(ids: &[&str]) -> VariantOverride {
        VariantOverride::ExperienceOrder(ids.iter().map(|s| s.to_string()).collect())
    }

    fn summary(edit: TextEdit) -> VariantOverride {
        VariantOverride::Text {
            list: TextList::Summary,
            edit,
        }
    }

    fn exp_ids(doc: &ResumeMaster) -> Vec<&str> {
        doc.experience.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_full_permutation_reorders() {
        let doc = apply_overrides(&master(), &[order(&["e3", "e1", "e2"])]);
        assert_eq!(exp_ids(&doc), vec!["e3", "e1", "e2"]);
    }

    #[test]
    fn test_partial_order_appends_remainder_in_original_order() {
        let doc = apply_overrides(&master(), &[order(&["e3"])]);
        assert_eq!(exp_ids(&doc), vec!["e3", "e1", "e2"]);
    }

    #[test]
    fn test_stale_and_repeated_ids_are_skipped() {
        let doc = apply_overrides(&master(), &[order(&["gone", "e2", "e2"])]);
        assert_eq!(exp_ids(&doc), vec!["e2", "e1", "e3"]);
    }

    #[test]
    fn test_later_set_supersedes_earlier_set() {
        let doc = apply_overrides(&master(), &[order(&["e3"]), order(&["e2", "e1"])]);
        assert_eq!(exp_ids(&doc), vec!["e2", "e1", "e3"]);

        let doc = apply_overrides(
            &master(),
            &[
                VariantOverride::Headline("Backend Engineer".to_string()),
                VariantOverride::Headline("Platform Engineer".to_string()),
            ],
        );
        assert_eq!(doc.headline, "Platform Engineer");
    }

    #[test]
    fn test_adds_accumulate() {
        let doc = apply_overrides(
            &master(),
            &[
                summary(TextEdit::Add("Third".to_string())),
                summary(TextEdit::Add("Fourth".to_string())),
            ],
        );
        assert_eq!(doc.summary, vec!["First", "Second", "Third", "Fourth"]);
    }

    #[test]
    fn test_set_after_add_replaces_list() {
        let doc = apply_overrides(
            &master(),
            &[
                summary(TextEdit::Add("Third".to_string())),
                summary(TextEdit::Set(vec!["Only".to_string()])),
            ],
        );
        assert_eq!(doc.summary, vec!["Only"]);
    }

    #[test]
    fn test_remove_by_index_and_text() {
        let doc = apply_overrides(&master(), &[summary(TextEdit::Remove(ItemRef::Index(0)))]);
        assert_eq!(doc.summary, vec!["Second"]);

        let doc = apply_overrides(
            &master(),
            &[summary(TextEdit::Remove(ItemRef::Key("Second".to_string())))],
        );
        assert_eq!(doc.summary, vec!["First"]);
    }

    #[test]
    fn test_out_of_range_remove_is_noop() {
        let doc = apply_overrides(&master(), &[summary(TextEdit::Remove(ItemRef::Index(9)))]);
        assert_eq!(doc.summary, master().summary);
    }

    #[test]
    fn test_move_text_item() {
        let doc = apply_overrides(
            &master(),
            &[summary(TextEdit::Move(MoveSpec {
                from: ItemRef::Index(1),
                to: 0,
            }))],
        );
        assert_eq!(doc.summary, vec!["Second", "First"]);
    }

    #[test]
    fn test_move_record_by_id_clamps_destination() {
        let doc = apply_overrides(
            &master(),
            &[VariantOverride::Records {
                list: RecordList::Experience,
                edit: RecordEdit::Move(MoveSpec {
                    from: ItemRef::Key("e1".to_string()),
                    to: 99,
                }),
            }],
        );
        assert_eq!(exp_ids(&doc), vec!["e2", "e3", "e1"]);
    }

    #[test]
    fn test_remove_record_by_id() {
        let doc = apply_overrides(
            &master(),
            &[VariantOverride::Records {
                list: RecordList::Education,
                edit: RecordEdit::Remove("ed1".to_string()),
            }],
        );
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.education[0].id, "ed2");
    }

    #[test]
    fn test_bullet_edit_targets_one_experience() {
        let doc = apply_overrides(
            &master(),
            &[VariantOverride::Text {
                list: TextList::Bullets("e2".to_string()),
                edit: TextEdit::Add("e2 mentored".to_string()),
            }],
        );
        assert_eq!(doc.experience[1].bullets.len(), 3);
        assert_eq!(doc.experience[0].bullets.len(), 2);
    }

    #[test]
    fn test_bullet_edit_on_missing_experience_is_noop() {
        let base = master();
        let doc = apply_overrides(
            &base,
            &[VariantOverride::Text {
                list: TextList::Bullets("filtered-out".to_string()),
                edit: TextEdit::Set(vec![]),
            }],
        );
        assert_eq!(doc, base);
    }

    #[test]
    fn test_secondary_skills_created_on_add_only() {
        let remove = apply_overrides(
            &master(),
            &[VariantOverride::Text {
                list: TextList::SecondarySkills,
                edit: TextEdit::Remove(ItemRef::Index(0)),
            }],
        );
        assert!(remove.skills.secondary.is_none());

        let add = apply_overrides(
            &master(),
            &[VariantOverride::Text {
                list: TextList::SecondarySkills,
                edit: TextEdit::Add("Go".to_string()),
            }],
        );
        assert_eq!(add.skills.secondary, Some(vec!["Go".to_string()]));
    }

    #[test]
    fn test_unrecognized_path_is_noop() {
        let base = master();
        let doc = apply_overrides(
            &base,
            &[VariantOverride::Unrecognized(RawOverride {
                path: "projects".to_string(),
                operation: OverrideOperation::Add,
                value: None,
            })],
        );
        assert_eq!(doc, base);
    }
}
