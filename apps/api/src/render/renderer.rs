//! Template substitution: one pass over the template, driven by a placeholder → value map.
//!
//! - only the first occurrence of each known token is replaced
//! - unknown tokens are left exactly as written
//! - inserted values are never scanned again, so user text cannot inject tokens

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::DocumentModel;
use crate::render::formatter::{
    escape_html, format_achievements, format_certifications, format_education,
    format_experience, format_projects, format_skills,
};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("valid token regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    FullName,
    Email,
    Phone,
    Linkedin,
    Github,
    Summary,
    Skills,
    Education,
    Projects,
    Experience,
    Certifications,
    Achievements,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Placeholder::FullName,
        Placeholder::Email,
        Placeholder::Phone,
        Placeholder::Linkedin,
        Placeholder::Github,
        Placeholder::Summary,
        Placeholder::Skills,
        Placeholder::Education,
        Placeholder::Projects,
        Placeholder::Experience,
        Placeholder::Certifications,
        Placeholder::Achievements,
    ];

    /// Name between the braces, e.g. `FULL_NAME` for `{{FULL_NAME}}`.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::FullName => "FULL_NAME",
            Placeholder::Email => "EMAIL",
            Placeholder::Phone => "PHONE",
            Placeholder::Linkedin => "LINKEDIN",
            Placeholder::Github => "GITHUB",
            Placeholder::Summary => "SUMMARY",
            Placeholder::Skills => "SKILLS",
            Placeholder::Education => "EDUCATION",
            Placeholder::Projects => "PROJECTS",
            Placeholder::Experience => "EXPERIENCE",
            Placeholder::Certifications => "CERTIFICATIONS",
            Placeholder::Achievements => "ACHIEVEMENTS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Placeholder::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Computes the markup for every placeholder from the model.
pub fn placeholder_values(model: &DocumentModel) -> HashMap<Placeholder, String> {
    let personal = &model.personal;
    HashMap::from([
        (Placeholder::FullName, escape_html(&personal.full_name)),
        (Placeholder::Email, escape_html(&personal.email)),
        (Placeholder::Phone, escape_html(&personal.phone)),
        (Placeholder::Linkedin, escape_html(&personal.linkedin)),
        (Placeholder::Github, escape_html(&personal.github)),
        (Placeholder::Summary, escape_html(&model.about)),
        (Placeholder::Skills, format_skills(&model.skills)),
        (Placeholder::Education, format_education(&model.education)),
        (Placeholder::Projects, format_projects(&model.projects)),
        (Placeholder::Experience, format_experience(&model.experience)),
        (
            Placeholder::Certifications,
            format_certifications(&model.certifications),
        ),
        (
            Placeholder::Achievements,
            format_achievements(&model.achievements),
        ),
    ])
}

/// Applies `values` to `template` in a single left-to-right pass.
pub fn substitute(template: &str, values: &HashMap<Placeholder, String>) -> String {
    let mut used = HashSet::new();
    TOKEN_RE
        .replace_all(template, |caps: &Captures| {
            let whole = caps[0].to_string();
            let Some(placeholder) = Placeholder::from_name(&caps[1]) else {
                return whole;
            };
            if !used.insert(placeholder) {
                return whole;
            }
            values.get(&placeholder).cloned().unwrap_or(whole)
        })
        .into_owned()
}

/// Pure transform of template content over the model; safe to repeat for re-renders.
pub fn render_document(template: &str, model: &DocumentModel) -> String {
    substitute(template, &placeholder_values(model))
}
