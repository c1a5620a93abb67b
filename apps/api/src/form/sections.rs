//! Repeatable Section Manager: the list-like input groups of the form.
//!
//! Groups of one kind are kept in insertion order. Removing a group never touches
//! its siblings, and a fresh manager starts with a single empty Education group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::SectionKind;

#[derive(Debug, Error, PartialEq)]
pub enum SectionError {
    #[error("Section group {0} not found")]
    GroupNotFound(Uuid),

    #[error("Unknown field '{field}' for {kind} section")]
    UnknownField { kind: SectionKind, field: String },
}

/// Identifies one group; returned by `add_section` and used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHandle {
    pub id: Uuid,
    pub kind: SectionKind,
}

/// One input group. `values` is parallel to `kind.fields()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub id: Uuid,
    pub kind: SectionKind,
    pub values: Vec<String>,
}

impl SectionGroup {
    fn new(kind: SectionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            values: vec![String::new(); kind.fields().len()],
        }
    }

    /// Raw (untrimmed) value of a field, or "" for a name the kind does not have.
    pub fn value(&self, field: &str) -> &str {
        self.kind
            .field_index(field)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn handle(&self) -> SectionHandle {
        SectionHandle {
            id: self.id,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionManager {
    groups: BTreeMap<SectionKind, Vec<SectionGroup>>,
}

impl Default for SectionManager {
    fn default() -> Self {
        let mut manager = Self {
            groups: BTreeMap::new(),
        };
        manager.add_section(SectionKind::Education);
        manager
    }
}

impl SectionManager {
    /// Appends an empty group after the existing groups of `kind`.
    pub fn add_section(&mut self, kind: SectionKind) -> SectionHandle {
        let group = SectionGroup::new(kind);
        let handle = group.handle();
        self.groups.entry(kind).or_default().push(group);
        handle
    }

    /// Detaches a group. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: Uuid) -> bool {
        for groups in self.groups.values_mut() {
            if let Some(pos) = groups.iter().position(|g| g.id == id) {
                groups.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn set_field(&mut self, id: Uuid, field: &str, value: String) -> Result<(), SectionError> {
        let group = self
            .groups
            .values_mut()
            .flat_map(|groups| groups.iter_mut())
            .find(|g| g.id == id)
            .ok_or(SectionError::GroupNotFound(id))?;

        let index = group
            .kind
            .field_index(field)
            .ok_or_else(|| SectionError::UnknownField {
                kind: group.kind,
                field: field.to_string(),
            })?;

        group.values[index] = value;
        Ok(())
    }

    /// Groups of one kind in document order.
    pub fn groups(&self, kind: SectionKind) -> &[SectionGroup] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, id: Uuid) -> Option<&SectionGroup> {
        self.groups
            .values()
            .flat_map(|groups| groups.iter())
            .find(|g| g.id == id)
    }
}

/// Everything the user has typed so far: static fields plus the repeatable groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub about: String,
    pub skills: String,
    pub sections: SectionManager,
}

/// Partial update of the static fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticFieldsPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub about: Option<String>,
    pub skills: Option<String>,
}

impl FormState {
    pub fn apply(&mut self, patch: StaticFieldsPatch) {
        let StaticFieldsPatch {
            full_name,
            email,
            phone,
            linkedin,
            github,
            about,
            skills,
        } = patch;

        let targets = [
            (full_name, &mut self.full_name),
            (email, &mut self.email),
            (phone, &mut self.phone),
            (linkedin, &mut self.linkedin),
            (github, &mut self.github),
            (about, &mut self.about),
            (skills, &mut self.skills),
        ];
        for (value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_manager_has_single_education_group() {
        let manager = SectionManager::default();
        assert_eq!(manager.groups(SectionKind::Education).len(), 1);
        for kind in [
            SectionKind::Experience,
            SectionKind::Project,
            SectionKind::Certification,
            SectionKind::Achievement,
        ] {
            assert!(manager.groups(kind).is_empty());
        }
    }

    #[test]
    fn test_add_section_appends_in_order() {
        let mut manager = SectionManager::default();
        let a = manager.add_section(SectionKind::Project);
        let b = manager.add_section(SectionKind::Project);
        let ids: Vec<_> = manager
            .groups(SectionKind::Project)
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(a.kind, SectionKind::Project);
    }

    #[test]
    fn test_remove_keeps_siblings_and_their_data() {
        let mut manager = SectionManager::default();
        let first = manager.add_section(SectionKind::Experience);
        let middle = manager.add_section(SectionKind::Experience);
        let last = manager.add_section(SectionKind::Experience);
        manager
            .set_field(first.id, "organization", "Acme".to_string())
            .unwrap();
        manager
            .set_field(last.id, "organization", "Globex".to_string())
            .unwrap();

        assert!(manager.remove(middle.id));
        assert!(!manager.remove(middle.id));

        let groups = manager.groups(SectionKind::Experience);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].value("organization"), "Acme");
        assert_eq!(groups[1].value("organization"), "Globex");
        assert_eq!(manager.groups(SectionKind::Education).len(), 1);
    }

    #[test]
    fn test_set_field_rejects_unknown_field_and_group() {
        let mut manager = SectionManager::default();
        let handle = manager.add_section(SectionKind::Achievement);
        assert_eq!(
            manager.set_field(handle.id, "issuer", "x".to_string()),
            Err(SectionError::UnknownField {
                kind: SectionKind::Achievement,
                field: "issuer".to_string()
            })
        );
        let missing = Uuid::new_v4();
        assert_eq!(
            manager.set_field(missing, "title", "x".to_string()),
            Err(SectionError::GroupNotFound(missing))
        );
    }

    #[test]
    fn test_education_group_can_be_removed_entirely() {
        let mut manager = SectionManager::default();
        let id = manager.groups(SectionKind::Education)[0].id;
        assert!(manager.remove(id));
        assert!(manager.groups(SectionKind::Education).is_empty());
    }

    #[test]
    fn test_apply_patch_only_touches_supplied_fields() {
        let mut form = FormState {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        form.apply(StaticFieldsPatch {
            email: Some("lovelace@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(form.full_name, "Ada");
        assert_eq!(form.email, "lovelace@example.com");
    }
}
