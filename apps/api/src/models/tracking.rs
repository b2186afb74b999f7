use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
}

/// A tracked job application. `variant_id` and `cover_letter_id` are lookups only
/// and may point at documents that no longer exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields for creating or updating a job application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationInput {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub cover_letter_id: Option<String>,
}

impl JobApplication {
    pub fn create(input: JobApplicationInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            company: input.company,
            position: input.position,
            status: input.status,
            applied_date: input.applied_date,
            notes: input.notes,
            variant_id: input.variant_id,
            cover_letter_id: input.cover_letter_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: JobApplicationInput) {
        self.company = input.company;
        self.position = input.position;
        self.status = input.status;
        self.applied_date = input.applied_date;
        self.notes = input.notes;
        self.variant_id = input.variant_id;
        self.cover_letter_id = input.cover_letter_id;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub variant_id: Option<String>,
}

impl CoverLetter {
    pub fn create(input: CoverLetterInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            content: input.content,
            variant_id: input.variant_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: CoverLetterInput) {
        self.title = input.title;
        self.content = input.content;
        self.variant_id = input.variant_id;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_defaults_to_saved() {
        let input: JobApplicationInput =
            serde_json::from_value(json!({"company": "Acme", "position": "SRE"})).unwrap();
        let job = JobApplication::create(input);
        assert_eq!(job.status, ApplicationStatus::Saved);
        assert!(job.variant_id.is_none());
    }

    #[test]
    fn test_job_wire_names_are_camel_case() {
        let input: JobApplicationInput = serde_json::from_value(json!({
            "company": "Acme",
            "position": "SRE",
            "variantId": "v1",
            "coverLetterId": "c1"
        }))
        .unwrap();
        let value = serde_json::to_value(JobApplication::create(input)).unwrap();
        assert_eq!(value["variantId"], json!("v1"));
        assert_eq!(value["coverLetterId"], json!("c1"));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_apply_replaces_fields() {
        let mut letter = CoverLetter::create(CoverLetterInput {
            title: "Draft".to_string(),
            content: String::new(),
            variant_id: Some("v1".to_string()),
        });
        letter.apply(CoverLetterInput {
            title: "Final".to_string(),
            content: "Dear team".to_string(),
            variant_id: None,
        });
        assert_eq!(letter.title, "Final");
        assert!(letter.variant_id.is_none());
    }
}
