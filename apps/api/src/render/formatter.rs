//! Block formatters: each turns one part of the model into the markup that replaces a
//! block placeholder. Optional sections return "" when empty so no heading is emitted.

use std::fmt::Write;

use crate::models::{Achievement, Certification, Education, Experience, Project};

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A colon anywhere means the grouped `Domain: items` form (one line per domain).
/// A flat skill containing a colon is indistinguishable from a group line.
pub fn format_skills(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    if !text.contains(':') {
        return format!("<p>{}</p>", escape_html(text));
    }

    text.lines()
        .filter_map(|line| {
            // Later colons stay in the items, e.g. "Languages: C++: advanced".
            let (domain, items) = line.split_once(':')?;
            let (domain, items) = (domain.trim(), items.trim());
            if domain.is_empty() || items.is_empty() {
                return None;
            }
            Some(format!(
                "<p><strong>{}:</strong> {}</p>",
                escape_html(domain),
                escape_html(items)
            ))
        })
        .collect()
}

/// Education is mandatory, so every record is shown even with blank subfields.
pub fn format_education(list: &[Education]) -> String {
    list.iter()
        .map(|e| {
            format!(
                "<p><strong>{}</strong><br>{} | {} | {}</p>",
                escape_html(&e.degree),
                escape_html(&e.institute),
                escape_html(&e.year),
                escape_html(&e.cgpa)
            )
        })
        .collect()
}

pub fn format_projects(list: &[Project]) -> String {
    section("Projects", list, |out, p| {
        let _ = write!(out, "<h3>{}</h3>", escape_html(&p.name));
        push_paragraph(out, &p.description);
    })
}

pub fn format_experience(list: &[Experience]) -> String {
    section("Experience", list, |out, e| {
        let heading = if e.role.is_empty() {
            escape_html(&e.organization)
        } else {
            format!("{} &mdash; {}", escape_html(&e.organization), escape_html(&e.role))
        };
        let _ = write!(out, "<h3>{heading}</h3>");
        if !e.duration.is_empty() {
            let _ = write!(out, "<span class=\"meta\">{}</span>", escape_html(&e.duration));
        }
        push_paragraph(out, &e.description);
    })
}

pub fn format_certifications(list: &[Certification]) -> String {
    section("Certifications", list, |out, c| {
        let _ = write!(out, "<p><strong>{}</strong>", escape_html(&c.name));
        if !c.issuer.is_empty() {
            let _ = write!(out, " &mdash; {}", escape_html(&c.issuer));
        }
        if !c.year.is_empty() {
            let _ = write!(out, " ({})", escape_html(&c.year));
        }
        out.push_str("</p>");
    })
}

pub fn format_achievements(list: &[Achievement]) -> String {
    section("Achievements", list, |out, a| {
        let _ = write!(out, "<p><strong>{}</strong>", escape_html(&a.title));
        if !a.description.is_empty() {
            let _ = write!(out, "<br>{}", escape_html(&a.description));
        }
        out.push_str("</p>");
    })
}

fn section<T>(title: &str, list: &[T], item: impl Fn(&mut String, &T)) -> String {
    if list.is_empty() {
        return String::new();
    }
    let mut out = format!("<section><h2>{title}</h2>");
    for entry in list {
        out.push_str("<div class=\"item\">");
        item(&mut out, entry);
        out.push_str("</div>");
    }
    out.push_str("</section>");
    out
}

fn push_paragraph(out: &mut String, text: &str) {
    if !text.is_empty() {
        let _ = write!(out, "<p>{}</p>", escape_html(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_skills_render_as_one_paragraph() {
        assert_eq!(
            format_skills("Go, Rust, Leadership"),
            "<p>Go, Rust, Leadership</p>"
        );
    }

    #[test]
    fn test_grouped_skills_render_one_paragraph_per_domain() {
        let html = format_skills("Languages: Go, Rust\nSoft: Leadership");
        assert_eq!(
            html,
            "<p><strong>Languages:</strong> Go, Rust</p><p><strong>Soft:</strong> Leadership</p>"
        );
        assert_eq!(html.matches("<p>").count(), 2);
    }

    #[test]
    fn test_grouped_skills_skip_incomplete_lines() {
        let html = format_skills("Languages: Rust\nno colon here\n: orphan\nTools:   \n");
        assert_eq!(html, "<p><strong>Languages:</strong> Rust</p>");
    }

    #[test]
    fn test_grouped_skills_keep_text_after_second_colon() {
        let html = format_skills("Languages: C++: advanced");
        assert_eq!(html, "<p><strong>Languages:</strong> C++: advanced</p>");
    }

    #[test]
    fn test_empty_skills() {
        assert_eq!(format_skills(""), "");
    }

    #[test]
    fn test_education_shows_blank_subfields() {
        let html = format_education(&[Education {
            degree: "B.Sc".to_string(),
            institute: "Cambridge".to_string(),
            ..Default::default()
        }]);
        assert_eq!(html, "<p><strong>B.Sc</strong><br>Cambridge |  | </p>");
    }

    #[test]
    fn test_experience_without_description_has_no_paragraph() {
        let html = format_experience(&[Experience {
            organization: "Acme".to_string(),
            role: "Engineer".to_string(),
            duration: "2020-2023".to_string(),
            description: String::new(),
        }]);
        assert!(html.contains("<h2>Experience</h2>"));
        assert!(html.contains("<h3>Acme &mdash; Engineer</h3>"));
        assert!(html.contains("<span class=\"meta\">2020-2023</span>"));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_empty_optional_sections_emit_nothing() {
        assert_eq!(format_projects(&[]), "");
        assert_eq!(format_experience(&[]), "");
        assert_eq!(format_certifications(&[]), "");
        assert_eq!(format_achievements(&[]), "");
    }

    #[test]
    fn test_certifications_section() {
        let html = format_certifications(&[Certification {
            name: "CKA".to_string(),
            issuer: "CNCF".to_string(),
            year: "2024".to_string(),
        }]);
        assert_eq!(
            html,
            "<section><h2>Certifications</h2><div class=\"item\"><p><strong>CKA</strong> &mdash; CNCF (2024)</p></div></section>"
        );
    }

    #[test]
    fn test_projects_keep_order() {
        let html = format_projects(&[
            Project {
                name: "Alpha".to_string(),
                description: "first".to_string(),
            },
            Project {
                name: "Beta".to_string(),
                description: "second".to_string(),
            },
        ]);
        let alpha = html.find("Alpha").unwrap();
        let beta = html.find("Beta").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = format_achievements(&[Achievement {
            title: "<script>alert(1)</script>".to_string(),
            description: "Tom & Jerry".to_string(),
        }]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(!html.contains("<script>"));
    }
}
