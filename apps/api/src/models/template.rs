use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::SectionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    SingleColumn,
    TwoColumn,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Normal,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Classic,
    Modern,
    Minimal,
    Bold,
}

/// Presentation options. Recognized keys are closed enums; anything else is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorScheme>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSectionConfig {
    #[serde(default)]
    pub use_variant_sections: bool,
    #[serde(default)]
    pub enabled_sections: Vec<SectionKey>,
}

/// Layout-only description of how a resolved resume is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub styles: TemplateStyles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_config: Option<TemplateSectionConfig>,
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    layout: Layout,
    colors: ColorScheme,
    spacing: Spacing,
) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        thumbnail: None,
        styles: TemplateStyles {
            layout: Some(layout),
            font_size: Some(FontSize::Medium),
            spacing: Some(spacing),
            colors: Some(colors),
            extra: BTreeMap::new(),
        },
        section_config: Some(TemplateSectionConfig {
            use_variant_sections: true,
            enabled_sections: Vec::new(),
        }),
    }
}

/// Templates that ship with the application and are always selectable.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        builtin(
            "classic",
            "Classic",
            "Single column, serif headings",
            Layout::SingleColumn,
            ColorScheme::Classic,
            Spacing::Normal,
        ),
        builtin(
            "modern",
            "Modern",
            "Two columns with accent colour",
            Layout::TwoColumn,
            ColorScheme::Modern,
            Spacing::Normal,
        ),
        builtin(
            "compact",
            "Compact",
            "Sidebar layout tuned for one page",
            Layout::Sidebar,
            ColorScheme::Minimal,
            Spacing::Compact,
        ),
    ]
}

/// Weak-reference lookup; a dangling id yields `None`.
pub fn find_template<'a>(templates: &'a [Template], id: Option<&str>) -> Option<&'a Template> {
    let id = id?;
    templates.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_styles_keep_unknown_keys() {
        let styles: TemplateStyles = serde_json::from_value(json!({
            "layout": "two-column",
            "fontSize": "small",
            "headerStyle": "underline"
        }))
        .unwrap();

        assert_eq!(styles.layout, Some(Layout::TwoColumn));
        assert_eq!(styles.font_size, Some(FontSize::Small));
        assert_eq!(styles.extra["headerStyle"], json!("underline"));
    }

    #[test]
    fn test_unrecognized_option_is_rejected() {
        let result: Result<TemplateStyles, _> =
            serde_json::from_value(json!({"spacing": "cosmic"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let templates = builtin_templates();
        let mut ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_dangling_template_id_is_none() {
        let templates = builtin_templates();
        assert!(find_template(&templates, Some("modern")).is_some());
        assert!(find_template(&templates, Some("deleted")).is_none());
        assert!(find_template(&templates, None).is_none());
    }
}
