//! Rule Evaluator: applies a variant's declarative rules to master content.
//!
//! Rules compose by intersection: an experience survives only if it passes every
//! applicable rule. Tag rules union their sets across repeats; scalar rules
//! (`max_bullets`, `date_range`) take the last value. `section_order` and
//! unrecognized kinds never filter.

use chrono::{Datelike, NaiveDate};

use crate::models::resume::{parse_resume_date, Experience, ResumeMaster};
use crate::models::variant::{DateBounds, VariantRule};

/// The effective rule values after folding a variant's rule list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub max_bullets: Option<usize>,
    pub date_range: Option<DateBounds>,
}

impl RuleSet {
    pub fn from_rules(rules: &[VariantRule]) -> Self {
        let mut set = RuleSet::default();
        for rule in rules {
            match rule {
                VariantRule::IncludeTags(tags) => set.include_tags.extend(tags.iter().cloned()),
                VariantRule::ExcludeTags(tags) => set.exclude_tags.extend(tags.iter().cloned()),
                VariantRule::MaxBullets(n) => set.max_bullets = Some(*n),
                VariantRule::DateRange(bounds) => set.date_range = Some(bounds.clone()),
                VariantRule::SectionOrder(_) | VariantRule::Unrecognized(_) => {}
            }
        }
        set
    }

    fn keeps(&self, experience: &Experience, today: NaiveDate) -> bool {
        // An empty include set is the identity, not "match nothing".
        if !self.include_tags.is_empty() && !experience.has_any_tag(&self.include_tags) {
            return false;
        }
        if experience.has_any_tag(&self.exclude_tags) {
            return false;
        }
        match &self.date_range {
            Some(bounds) => overlaps_range(experience, bounds, today),
            None => true,
        }
    }
}

/// Applies `rules` to the master's experience list and returns the filtered document.
/// Every other section passes through untouched.
pub fn evaluate_rules(
    master: &ResumeMaster,
    rules: &[VariantRule],
    today: NaiveDate,
) -> ResumeMaster {
    let set = RuleSet::from_rules(rules);
    let mut filtered = master.clone();
    filtered.experience = filter_experience(&master.experience, &set, today);
    filtered
}

/// Filters and truncates an experience list. Surviving items keep their relative order.
pub fn filter_experience(
    experience: &[Experience],
    set: &RuleSet,
    today: NaiveDate,
) -> Vec<Experience> {
    experience
        .iter()
        .filter(|e| set.keeps(e, today))
        .cloned()
        .map(|mut e| {
            if let Some(n) = set.max_bullets {
                e.bullets.truncate(n);
            }
            e
        })
        .collect()
}

/// Interval overlap between an experience and inclusive range bounds.
///
/// Ongoing roles run until `today`, or indefinitely when the range has no end.
/// Dates that fail to parse never exclude an item.
fn overlaps_range(experience: &Experience, bounds: &DateBounds, today: NaiveDate) -> bool {
    let range_start = bounds.start.as_deref().and_then(parse_resume_date);
    let range_end = bounds.end.as_deref().and_then(end_of_period);

    let Some(item_start) = experience.start_date() else {
        return true;
    };
    if let Some(range_end) = range_end {
        if item_start > range_end {
            return false;
        }
    }

    let item_end = if experience.is_current() {
        if range_end.is_none() {
            return true;
        }
        today
    } else {
        match experience.date_end.as_deref().and_then(end_of_period) {
            Some(end) => end,
            None => return true,
        }
    };

    range_start.map_or(true, |start| item_end >= start)
}

/// Last day covered by a partial date: `2020` → Dec 31, `2020-06` → Jun 30.
fn end_of_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let first = parse_resume_date(raw)?;
    match raw.matches('-').count() {
        0 => NaiveDate::from_ymd_opt(first.year(), 12, 31),
        1 => {
            let next_month = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            };
            next_month.and_then(|d| d.pred_opt())
        }
        _ => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::variant::RawRule;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn exp(id: &str, tags: &[&str], start: &str, end: Option<&str>, bullets: usize) -> Experience {
        Experience {
            id: id.to_string(),
            company: format!("{id} Corp"),
            title: "Engineer".to_string(),
            location: String::new(),
            date_start: start.to_string(),
            date_end: end.map(str::to_string),
            bullets: (0..bullets).map(|i| format!("{id} bullet {i}")).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    fn ids(list: &[Experience]) -> Vec<&str> {
        list.iter().map(|e| e.id.as_str()).collect()
    }

    fn sample() -> Vec<Experience> {
        vec![
            exp("e1", &["eng"], "2020-01", None, 4),
            exp("e2", &["sales"], "2016-01", Some("2019-12"), 3),
        ]
    }

    fn run(list: &[Experience], rules: &[VariantRule]) -> Vec<Experience> {
        filter_experience(list, &RuleSet::from_rules(rules), today())
    }

    #[test]
    fn test_include_tags_keeps_matching() {
        let result = run(&sample(), &[VariantRule::IncludeTags(tags(&["eng"]))]);
        assert_eq!(ids(&result), vec!["e1"]);
    }

    #[test]
    fn test_empty_include_is_identity() {
        let result = run(&sample(), &[VariantRule::IncludeTags(vec![])]);
        assert_eq!(result, sample());
    }

    #[test]
    fn test_include_unknown_tag_filters_everything() {
        let result = run(&sample(), &[VariantRule::IncludeTags(tags(&["design"]))]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let result = run(
            &sample(),
            &[
                VariantRule::IncludeTags(tags(&["eng"])),
                VariantRule::ExcludeTags(tags(&["eng"])),
            ],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_repeated_include_rules_union() {
        let result = run(
            &sample(),
            &[
                VariantRule::IncludeTags(tags(&["eng"])),
                VariantRule::IncludeTags(tags(&["sales"])),
            ],
        );
        assert_eq!(ids(&result), vec!["e1", "e2"]);
    }

    #[test]
    fn test_max_bullets_truncates_without_reordering() {
        let result = run(&sample(), &[VariantRule::MaxBullets(2)]);
        assert_eq!(result[0].bullets, vec!["e1 bullet 0", "e1 bullet 1"]);
        assert_eq!(result[1].bullets.len(), 2);
    }

    #[test]
    fn test_max_bullets_zero_clears_bullets() {
        let result = run(&sample(), &[VariantRule::MaxBullets(0)]);
        assert!(result.iter().all(|e| e.bullets.is_empty()));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_max_bullets_nested_takes_minimum() {
        let once = run(&sample(), &[VariantRule::MaxBullets(1)]);
        let twice = run(&once, &[VariantRule::MaxBullets(3)]);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_last_max_bullets_wins() {
        let result = run(
            &sample(),
            &[VariantRule::MaxBullets(1), VariantRule::MaxBullets(3)],
        );
        assert_eq!(result[0].bullets.len(), 3);
    }

    #[test]
    fn test_date_range_drops_roles_ended_before_start() {
        let result = run(
            &sample(),
            &[VariantRule::DateRange(DateBounds {
                start: Some("2020-06".to_string()),
                end: None,
            })],
        );
        assert_eq!(ids(&result), vec!["e1"]);
    }

    #[test]
    fn test_date_range_end_month_is_inclusive() {
        let list = vec![exp("e3", &[], "2019-12-15", Some("2020-03"), 1)];
        let result = run(
            &list,
            &[VariantRule::DateRange(DateBounds {
                start: Some("2010".to_string()),
                end: Some("2019-12".to_string()),
            })],
        );
        assert_eq!(ids(&result), vec!["e3"]);
    }

    #[test]
    fn test_ongoing_role_overlaps_open_ended_future_range() {
        let result = run(
            &sample(),
            &[VariantRule::DateRange(DateBounds {
                start: Some("2030-01".to_string()),
                end: None,
            })],
        );
        assert_eq!(ids(&result), vec!["e1"]);
    }

    #[test]
    fn test_ongoing_role_runs_until_today_for_closed_range() {
        let result = run(
            &sample(),
            &[VariantRule::DateRange(DateBounds {
                start: Some("2030-01".to_string()),
                end: Some("2030-12".to_string()),
            })],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_last_date_range_wins() {
        let result = run(
            &sample(),
            &[
                VariantRule::DateRange(DateBounds {
                    start: Some("2021".to_string()),
                    end: None,
                }),
                VariantRule::DateRange(DateBounds {
                    start: Some("2015".to_string()),
                    end: Some("2017".to_string()),
                }),
            ],
        );
        assert_eq!(ids(&result), vec!["e2"]);
    }

    #[test]
    fn test_unparsable_dates_are_kept() {
        let list = vec![exp("e9", &[], "sometime", Some("later"), 1)];
        let result = run(
            &list,
            &[VariantRule::DateRange(DateBounds {
                start: Some("2020".to_string()),
                end: Some("2021".to_string()),
            })],
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_section_order_and_unknown_rules_do_not_filter() {
        let result = run(
            &sample(),
            &[
                VariantRule::SectionOrder(tags(&["skills"])),
                VariantRule::Unrecognized(RawRule {
                    kind: "keyword_boost".to_string(),
                    value: serde_json::Value::Null,
                }),
            ],
        );
        assert_eq!(result, sample());
    }

    #[test]
    fn test_evaluate_rules_leaves_other_sections() {
        let mut master = ResumeMaster::new("Ada");
        master.experience = sample();
        master.summary = vec!["Builder".to_string()];

        let rules = [VariantRule::IncludeTags(tags(&["sales"]))];
        let filtered = evaluate_rules(&master, &rules, today());
        assert_eq!(ids(&filtered.experience), vec!["e2"]);
        assert_eq!(filtered.summary, master.summary);
    }

    #[test]
    fn test_end_of_period() {
        assert_eq!(end_of_period("2020"), NaiveDate::from_ymd_opt(2020, 12, 31));
        assert_eq!(end_of_period("2024-02"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(end_of_period("2023-12"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(end_of_period("2023-05-07"), NaiveDate::from_ymd_opt(2023, 5, 7));
    }
}
