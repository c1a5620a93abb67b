use serde::{Deserialize, Serialize};

/// Contact block of the document. `linkedin` / `github` are empty when not supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personal {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub organization: String,
    pub role: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institute: String,
    pub year: String,
    pub cgpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// Normalized résumé content for one generation cycle.
///
/// Built by the extractor, mutated only by enrichment (summary, skills and item
/// descriptions), then read by the renderer for as many template switches as needed.
/// List sections keep the order the groups had in the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    pub personal: Personal,
    pub about: String,
    pub skills: String,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
}

impl DocumentModel {
    /// Filename handed to the export sink: whitespace runs become `_`.
    pub fn export_filename(&self) -> String {
        let stem = self
            .personal
            .full_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("{stem}_Resume.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_collapses_whitespace() {
        let mut model = DocumentModel::default();
        model.personal.full_name = "Ada   Lovelace\tKing".to_string();
        assert_eq!(model.export_filename(), "Ada_Lovelace_King_Resume.pdf");
    }

    #[test]
    fn test_personal_serializes_camel_case() {
        let personal = Personal {
            full_name: "Ada".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&personal).unwrap();
        assert_eq!(json["fullName"], "Ada");
        assert!(json.get("full_name").is_none());
    }
}
