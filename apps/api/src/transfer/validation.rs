use std::collections::HashSet;

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::models::resume::{HasId, ResumeMaster, SectionKey};

/// Structural check of an externally authored section document.
///
/// Returns every problem found rather than stopping at the first, so the caller
/// can show them all at once. An empty list means the document is well-formed.
pub fn validate_import_data(raw: &Value) -> Vec<String> {
    let Some(object) = raw.as_object() else {
        return vec!["Import data must be a JSON object".to_string()];
    };

    let mut errors = Vec::new();

    let section = match object.get("section") {
        None => {
            errors.push("Missing required field 'section'".to_string());
            None
        }
        Some(Value::String(name)) => match name.parse::<SectionKey>() {
            Ok(key) => Some(key),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        Some(_) => {
            errors.push("'section' must be a string".to_string());
            None
        }
    };

    match object.get("exportedAt") {
        None => errors.push("Missing required field 'exportedAt'".to_string()),
        Some(Value::String(ts)) if DateTime::parse_from_rfc3339(ts).is_ok() => {}
        Some(_) => errors.push("'exportedAt' must be an ISO-8601 timestamp".to_string()),
    }

    match (object.get("data"), section) {
        (None, _) => errors.push("Missing required field 'data'".to_string()),
        (Some(data), Some(key)) => validate_section_data(key, data, &mut errors),
        (Some(_), None) => {}
    }

    errors
}

fn validate_section_data(key: SectionKey, data: &Value, errors: &mut Vec<String>) {
    match key {
        SectionKey::Headline => {
            if !data.is_string() {
                errors.push("headline data must be a string".to_string());
            }
        }
        SectionKey::Summary | SectionKey::KeyAchievements => {
            string_list(data, key.as_str(), errors);
        }
        SectionKey::Experience => records(
            data,
            "experience",
            &["id", "company", "title", "date_start"],
            errors,
            |entry, label, errors| {
                optional_string(entry, "date_end", label, errors);
                optional_string(entry, "location", label, errors);
                if let Some(bullets) = entry.get("bullets") {
                    string_list(bullets, &format!("{label}.bullets"), errors);
                }
                if let Some(tags) = entry.get("tags") {
                    string_list(tags, &format!("{label}.tags"), errors);
                }
            },
        ),
        SectionKey::Education => records(
            data,
            "education",
            &["id", "degree", "school"],
            errors,
            |entry, label, errors| {
                optional_string(entry, "year", label, errors);
                optional_string(entry, "location", label, errors);
            },
        ),
        SectionKey::Awards => records(
            data,
            "awards",
            &["id", "title"],
            errors,
            |entry, label, errors| {
                optional_string(entry, "date", label, errors);
                optional_string(entry, "description", label, errors);
            },
        ),
        SectionKey::Skills => {
            let Some(skills) = data.as_object() else {
                errors.push("skills data must be an object".to_string());
                return;
            };
            if let Some(primary) = skills.get("primary") {
                string_list(primary, "skills.primary", errors);
            }
            match skills.get("secondary") {
                None | Some(Value::Null) => {}
                Some(secondary) => string_list(secondary, "skills.secondary", errors),
            }
        }
    }
}

fn string_list(value: &Value, label: &str, errors: &mut Vec<String>) {
    let Some(items) = value.as_array() else {
        errors.push(format!("{label} must be a list of strings"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
            errors.push(format!("{label}[{i}] must be a string"));
        }
    }
}

fn optional_string(entry: &Map<String, Value>, field: &str, label: &str, errors: &mut Vec<String>) {
    match entry.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{label}.{field} must be a string")),
    }
}

fn records<F>(data: &Value, section: &str, required: &[&str], errors: &mut Vec<String>, extra: F)
where
    F: Fn(&Map<String, Value>, &str, &mut Vec<String>),
{
    let Some(items) = data.as_array() else {
        errors.push(format!("{section} data must be a list"));
        return;
    };

    let mut seen_ids = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let label = format!("{section}[{i}]");
        let Some(entry) = item.as_object() else {
            errors.push(format!("{label} must be an object"));
            continue;
        };

        for field in required {
            match entry.get(*field) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(Value::String(_)) => errors.push(format!("{label}.{field} must not be empty")),
                Some(_) => errors.push(format!("{label}.{field} must be a string")),
                None => errors.push(format!("{label} is missing '{field}'")),
            }
        }

        if let Some(id) = entry.get("id").and_then(Value::as_str) {
            check_unique(&mut seen_ids, id, &label, errors);
        }

        extra(entry, &label, errors);
    }
}

fn check_unique(seen: &mut HashSet<String>, id: &str, label: &str, errors: &mut Vec<String>) {
    if !seen.insert(id.to_string()) {
        errors.push(format!("{label}.id '{id}' appears more than once"));
    }
}

fn typed_records<T: HasId>(items: &[T], section: &str, errors: &mut Vec<String>) {
    let mut seen_ids = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let label = format!("{section}[{i}]");
        if item.id().trim().is_empty() {
            errors.push(format!("{label}.id must not be empty"));
            continue;
        }
        check_unique(&mut seen_ids, item.id(), &label, errors);
    }
}

/// Id checks over a whole master: every experience, education and award entry
/// needs a non-empty id that is unique within its list.
pub fn validate_master_records(master: &ResumeMaster) -> Vec<String> {
    let mut errors = Vec::new();
    typed_records(&master.experience, "experience", &mut errors);
    typed_records(&master.education, "education", &mut errors);
    typed_records(&master.awards, "awards", &mut errors);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TS: &str = "2024-05-01T10:00:00Z";

    #[test]
    fn test_valid_experience_document() {
        let raw = json!({
            "section": "experience",
            "exportedAt": TS,
            "data": [{
                "id": "e1", "company": "Acme", "title": "SRE",
                "date_start": "2020-01", "date_end": null,
                "bullets": ["Cut paging by 40%"], "tags": ["ops"]
            }]
        });
        assert!(validate_import_data(&raw).is_empty());
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            validate_import_data(&json!([1, 2])),
            vec!["Import data must be a JSON object"]
        );
    }

    #[test]
    fn test_reports_all_missing_top_level_keys() {
        let errors = validate_import_data(&json!({}));
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("'section'")));
        assert!(errors.iter().any(|e| e.contains("'data'")));
        assert!(errors.iter().any(|e| e.contains("'exportedAt'")));
    }

    #[test]
    fn test_unknown_section_name() {
        let errors = validate_import_data(&json!({
            "section": "projects", "exportedAt": TS, "data": []
        }));
        assert_eq!(errors, vec!["Unknown section 'projects'"]);
    }

    #[test]
    fn test_bad_timestamp() {
        let errors = validate_import_data(&json!({
            "section": "headline", "exportedAt": "yesterday", "data": "Engineer"
        }));
        assert_eq!(errors, vec!["'exportedAt' must be an ISO-8601 timestamp"]);
    }

    #[test]
    fn test_experience_entry_problems_are_collected() {
        let errors = validate_import_data(&json!({
            "section": "experience",
            "exportedAt": TS,
            "data": [
                {"id": "e1", "company": "Acme", "date_start": "2020"},
                {"id": "e1", "company": 7, "title": "Dev", "date_start": "2021", "bullets": [1]},
                "not an object"
            ]
        }));

        assert!(errors.contains(&"experience[0] is missing 'title'".to_string()));
        assert!(errors.contains(&"experience[1].company must be a string".to_string()));
        assert!(errors.contains(&"experience[1].id 'e1' appears more than once".to_string()));
        assert!(errors.contains(&"experience[1].bullets[0] must be a string".to_string()));
        assert!(errors.contains(&"experience[2] must be an object".to_string()));
    }

    #[test]
    fn test_summary_must_be_strings() {
        let errors = validate_import_data(&json!({
            "section": "summary", "exportedAt": TS, "data": ["ok", {"no": 1}]
        }));
        assert_eq!(errors, vec!["summary[1] must be a string"]);
    }

    #[test]
    fn test_skills_shape() {
        let ok = validate_import_data(&json!({
            "section": "skills", "exportedAt": TS,
            "data": {"primary": ["Rust"], "secondary": null}
        }));
        assert!(ok.is_empty());

        let bad = validate_import_data(&json!({
            "section": "skills", "exportedAt": TS, "data": ["Rust"]
        }));
        assert_eq!(bad, vec!["skills data must be an object"]);
    }

    #[test]
    fn test_master_records_need_unique_ids() {
        let mut master = ResumeMaster::new("Ada");
        master.experience = serde_json::from_value(json!([
            {"id": "e1", "company": "Acme", "title": "SRE", "date_start": "2020"},
            {"id": "e1", "company": "Initech", "title": "Dev", "date_start": "2018"}
        ]))
        .unwrap();
        master.awards = serde_json::from_value(json!([{"id": " ", "title": "Best"}])).unwrap();

        assert_eq!(
            validate_master_records(&master),
            vec![
                "experience[1].id 'e1' appears more than once",
                "awards[0].id must not be empty"
            ]
        );
        assert!(validate_master_records(&ResumeMaster::new("Ada")).is_empty());
    }

    #[test]
    fn test_education_requires_school() {
        let errors = validate_import_data(&json!({
            "section": "education", "exportedAt": TS,
            "data": [{"id": "ed1", "degree": "BSc", "school": "  "}]
        }));
        assert_eq!(errors, vec!["education[0].school must not be empty"]);
    }
}
