use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The repeatable résumé sections a user can add groups for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Project,
    Certification,
    Achievement,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Project,
        SectionKind::Certification,
        SectionKind::Achievement,
    ];

    /// Input names of a group, in the order they appear in the form.
    /// The first one is the primary field.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &["organization", "role", "duration", "description"],
            SectionKind::Education => &["degree", "institute", "year", "cgpa"],
            SectionKind::Project => &["name", "description"],
            SectionKind::Certification => &["name", "issuer", "year"],
            SectionKind::Achievement => &["title", "description"],
        }
    }

    pub fn primary_field(self) -> &'static str {
        self.fields()[0]
    }

    pub fn field_index(self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| *f == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Project => "project",
            SectionKind::Certification => "certification",
            SectionKind::Achievement => "achievement",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown section kind '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_fields() {
        assert_eq!(SectionKind::Experience.primary_field(), "organization");
        assert_eq!(SectionKind::Education.primary_field(), "degree");
        assert_eq!(SectionKind::Project.primary_field(), "name");
        assert_eq!(SectionKind::Certification.primary_field(), "name");
        assert_eq!(SectionKind::Achievement.primary_field(), "title");
    }

    #[test]
    fn test_parse_round_trips_display() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.to_string().parse::<SectionKind>().unwrap(), kind);
        }
        assert!("publication".parse::<SectionKind>().is_err());
    }

    #[test]
    fn test_field_index() {
        assert_eq!(SectionKind::Education.field_index("year"), Some(2));
        assert_eq!(SectionKind::Project.field_index("year"), None);
    }
}
