//! Form → DocumentModel. Pure and synchronous: no enrichment happens here.

use crate::form::sections::{FormState, SectionGroup};
use crate::models::{
    Achievement, Certification, DocumentModel, Education, Experience, Personal, Project,
    SectionKind,
};

pub fn extract(form: &FormState) -> DocumentModel {
    DocumentModel {
        personal: Personal {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            linkedin: form.linkedin.trim().to_string(),
            github: form.github.trim().to_string(),
        },
        about: form.about.trim().to_string(),
        skills: form.skills.trim().to_string(),
        projects: collect(form, SectionKind::Project, |g| Project {
            name: field(g, "name"),
            description: field(g, "description"),
        }),
        experience: collect(form, SectionKind::Experience, |g| Experience {
            organization: field(g, "organization"),
            role: field(g, "role"),
            duration: field(g, "duration"),
            description: field(g, "description"),
        }),
        education: collect(form, SectionKind::Education, |g| Education {
            degree: field(g, "degree"),
            institute: field(g, "institute"),
            year: field(g, "year"),
            cgpa: field(g, "cgpa"),
        }),
        certifications: collect(form, SectionKind::Certification, |g| Certification {
            name: field(g, "name"),
            issuer: field(g, "issuer"),
            year: field(g, "year"),
        }),
        achievements: collect(form, SectionKind::Achievement, |g| Achievement {
            title: field(g, "title"),
            description: field(g, "description"),
        }),
    }
}

/// A group only becomes a record when its primary field has content.
fn collect<T>(form: &FormState, kind: SectionKind, map: impl Fn(&SectionGroup) -> T) -> Vec<T> {
    form.sections
        .groups(kind)
        .iter()
        .filter(|g| !g.value(kind.primary_field()).trim().is_empty())
        .map(map)
        .collect()
}

fn field(group: &SectionGroup, name: &str) -> String {
    group.value(name).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut FormState, kind: SectionKind, values: &[(&str, &str)]) {
        let id = form.sections.add_section(kind).id;
        for (name, value) in values {
            form.sections
                .set_field(id, name, value.to_string())
                .unwrap();
        }
    }

    #[test]
    fn test_static_fields_are_trimmed() {
        let form = FormState {
            full_name: "  Ada Lovelace ".to_string(),
            linkedin: " linkedin.com/in/ada ".to_string(),
            skills: "\nRust, Go\n".to_string(),
            ..Default::default()
        };
        let model = extract(&form);
        assert_eq!(model.personal.full_name, "Ada Lovelace");
        assert_eq!(model.personal.linkedin, "linkedin.com/in/ada");
        assert_eq!(model.skills, "Rust, Go");
    }

    #[test]
    fn test_groups_with_empty_primary_field_are_dropped() {
        let mut form = FormState::default();
        fill(&mut form, SectionKind::Project, &[("name", "Alpha"), ("description", "a")]);
        fill(&mut form, SectionKind::Project, &[("name", "   "), ("description", "orphan")]);
        fill(&mut form, SectionKind::Project, &[("name", "Gamma")]);
        fill(&mut form, SectionKind::Certification, &[("issuer", "Nobody")]);

        let model = extract(&form);
        let names: Vec<_> = model.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
        assert!(model.certifications.is_empty());
        // The default education group is still blank.
        assert!(model.education.is_empty());
    }

    #[test]
    fn test_order_follows_the_form() {
        let mut form = FormState::default();
        for org in ["First", "Second", "Third"] {
            fill(&mut form, SectionKind::Experience, &[("organization", org)]);
        }
        let middle = form.sections.groups(SectionKind::Experience)[1].id;
        form.sections.remove(middle);

        let model = extract(&form);
        let orgs: Vec<_> = model
            .experience
            .iter()
            .map(|e| e.organization.as_str())
            .collect();
        assert_eq!(orgs, vec!["First", "Third"]);
    }

    #[test]
    fn test_experience_without_description_is_kept() {
        let mut form = FormState::default();
        fill(
            &mut form,
            SectionKind::Experience,
            &[("organization", "Acme"), ("role", "Engineer")],
        );
        let model = extract(&form);
        assert_eq!(model.experience.len(), 1);
        assert_eq!(model.experience[0].description, "");
        assert_eq!(model.experience[0].role, "Engineer");
    }

    #[test]
    fn test_education_uses_degree_as_primary_only() {
        let mut form = FormState::default();
        let id = form.sections.groups(SectionKind::Education)[0].id;
        form.sections
            .set_field(id, "degree", "B.Tech".to_string())
            .unwrap();
        let model = extract(&form);
        assert_eq!(model.education.len(), 1);
        assert_eq!(model.education[0].institute, "");
    }
}
