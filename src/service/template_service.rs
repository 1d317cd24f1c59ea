// services/template_service.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single form field inside a template section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Field lists plus optionally nested named sub-groups. Groups can nest
/// to any depth, so the forms render recursively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSection {
    #[serde(default)]
    pub mandatory: Vec<TemplateField>,
    #[serde(default)]
    pub optional: Vec<TemplateField>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, TemplateSection>,
}

impl TemplateSection {
    pub fn field_count(&self) -> usize {
        let nested: usize = self.groups.values().map(|g| g.field_count()).sum();
        self.mandatory.len() + self.optional.len() + nested
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub admin: TemplateSection,
    pub field: TemplateSection,
}

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_fields: usize,
    pub field_fields: usize,
}

/// All report templates, read once at startup. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: BTreeMap<String, ReportTemplate>,
}

impl TemplateStore {
    pub fn load(dir: &str) -> Result<Self, String> {
        let path = Path::new(dir);
        if !path.is_dir() {
            return Err(format!("Template directory not found: {}", dir));
        }

        let mut templates = BTreeMap::new();

        let entries = fs::read_dir(path)
            .map_err(|e| format!("Failed to read template directory {}: {}", dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read template entry: {}", e))?;
            let file_path = entry.path();

            if file_path.extension() != Some(std::ffi::OsStr::new("json")) {
                continue;
            }

            let content = fs::read_to_string(&file_path)
                .map_err(|e| format!("Failed to read {}: {}", file_path.display(), e))?;

            let template: ReportTemplate = serde_json::from_str(&content)
                .map_err(|e| format!("Malformed template {}: {}", file_path.display(), e))?;

            if templates.contains_key(&template.key) {
                return Err(format!(
                    "Duplicate template key '{}' in {}",
                    template.key,
                    file_path.display()
                ));
            }

            templates.insert(template.key.clone(), template);
        }

        if templates.is_empty() {
            return Err(format!("No report templates found in {}", dir));
        }

        tracing::info!("Loaded {} report templates from {}", templates.len(), dir);

        Ok(Self { templates })
    }

    pub fn get(&self, key: &str) -> Option<&ReportTemplate> {
        self.templates.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.templates
            .values()
            .map(|t| TemplateSummary {
                key: t.key.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
                admin_fields: t.admin.field_count(),
                field_fields: t.field.field_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "key": "residential_valuation",
        "name": "Residential Valuation",
        "description": "Standard dwelling house valuation",
        "admin": {
            "mandatory": [
                {"name": "client_name", "label": "Client name", "kind": "text"}
            ],
            "optional": [
                {"name": "client_phone", "label": "Client phone", "kind": "text"}
            ]
        },
        "field": {
            "mandatory": [
                {"name": "inspection_date", "label": "Inspection date", "kind": "date"}
            ],
            "groups": {
                "site": {
                    "mandatory": [
                        {"name": "plot_size", "label": "Plot size (sqm)", "kind": "number"},
                        {"name": "topography", "label": "Topography", "kind": "select",
                         "options": ["flat", "sloping", "steep"]}
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn template_parses_with_nested_groups() {
        let template: ReportTemplate = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(template.key, "residential_valuation");
        assert_eq!(template.admin.field_count(), 2);
        assert_eq!(template.field.field_count(), 3);
        let site = template.field.groups.get("site").unwrap();
        assert_eq!(site.mandatory[1].options.len(), 3);
    }

    #[test]
    fn malformed_template_is_an_error() {
        let result = serde_json::from_str::<ReportTemplate>("{\"key\": \"only_a_key\"}");
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_directory_and_rejects_bad_files() {
        let dir = std::env::temp_dir().join(format!("report-templates-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("residential.json"), SAMPLE).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::load(dir.to_str().unwrap()).unwrap();
        assert!(store.contains("residential_valuation"));
        assert_eq!(store.summaries().len(), 1);
        assert!(store.get("missing_key").is_none());

        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        assert!(TemplateStore::load(dir.to_str().unwrap()).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_directory_is_a_startup_error() {
        let dir = std::env::temp_dir().join(format!("report-templates-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert!(TemplateStore::load(dir.to_str().unwrap()).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
