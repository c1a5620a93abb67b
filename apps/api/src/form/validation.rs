use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::sections::FormState;
use crate::models::SectionKind;

/// Shown as a blocking alert, separately from the inline field errors.
pub const EDUCATION_REQUIRED_ALERT: &str = "At least one education entry is required";

/// A form input that can carry an inline error. Declaration order is form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "group", rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    About,
    Skills,
    EducationYear(Uuid),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::FullName => f.write_str("full_name"),
            FieldId::Email => f.write_str("email"),
            FieldId::Phone => f.write_str("phone"),
            FieldId::About => f.write_str("about"),
            FieldId::Skills => f.write_str("skills"),
            FieldId::EducationYear(group) => write!(f, "education_year:{group}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldId,
    pub message: String,
}

/// Result of one rule for one field: `None` means the field is fine and its error
/// (if any) should be cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome {
    pub field: FieldId,
    pub error: Option<&'static str>,
}

impl FieldOutcome {
    fn ok(field: FieldId) -> Self {
        Self { field, error: None }
    }

    fn fail(field: FieldId, message: &'static str) -> Self {
        Self {
            field,
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Field to focus and scroll into view.
    pub first_invalid_field: Option<FieldId>,
    pub errors: Vec<FieldError>,
    pub alert: Option<String>,
    #[serde(skip)]
    pub checked: Vec<FieldId>,
}

type Rule = fn(&FormState) -> Vec<FieldOutcome>;

/// Every rule runs on every validation; the first failure in this order wins focus.
const RULES: &[Rule] = &[
    check_full_name,
    check_email,
    check_phone,
    check_about,
    check_skills,
    check_education_years,
];

// Same grammar browsers apply to <input type="email">.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

static YEAR_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{4}$").expect("valid year regex"));

fn check_full_name(form: &FormState) -> Vec<FieldOutcome> {
    vec![required(FieldId::FullName, &form.full_name, "Name is required")]
}

fn check_email(form: &FormState) -> Vec<FieldOutcome> {
    let email = form.email.trim();
    let outcome = if email.is_empty() {
        FieldOutcome::fail(FieldId::Email, "Email is required")
    } else if !EMAIL_RE.is_match(email) {
        FieldOutcome::fail(FieldId::Email, "Enter a valid email address")
    } else {
        FieldOutcome::ok(FieldId::Email)
    };
    vec![outcome]
}

fn check_phone(form: &FormState) -> Vec<FieldOutcome> {
    let phone = form.phone.trim();
    let outcome = if phone.is_empty() {
        FieldOutcome::fail(FieldId::Phone, "Phone number is required")
    } else if !PHONE_RE.is_match(phone) {
        FieldOutcome::fail(FieldId::Phone, "Phone number must be exactly 10 digits")
    } else {
        FieldOutcome::ok(FieldId::Phone)
    };
    vec![outcome]
}

fn check_about(form: &FormState) -> Vec<FieldOutcome> {
    vec![required(
        FieldId::About,
        &form.about,
        "Professional summary is required",
    )]
}

fn check_skills(form: &FormState) -> Vec<FieldOutcome> {
    let outcome = if form.skills.trim().is_empty() {
        FieldOutcome::fail(FieldId::Skills, "Skills are required")
    } else if !form.skills.contains(',') {
        FieldOutcome::fail(FieldId::Skills, "Enter skills separated by commas")
    } else {
        FieldOutcome::ok(FieldId::Skills)
    };
    vec![outcome]
}

/// Year format is only checked on groups that count as an education entry.
fn check_education_years(form: &FormState) -> Vec<FieldOutcome> {
    form.sections
        .groups(SectionKind::Education)
        .iter()
        .filter(|g| is_qualifying_education(g.value("degree"), g.value("institute")))
        .map(|g| {
            let field = FieldId::EducationYear(g.id);
            let year = g.value("year").trim();
            if !year.is_empty() && !YEAR_SPAN_RE.is_match(year) {
                FieldOutcome::fail(field, "Year format should be YYYY-YYYY")
            } else {
                FieldOutcome::ok(field)
            }
        })
        .collect()
}

fn required(field: FieldId, value: &str, message: &'static str) -> FieldOutcome {
    if value.trim().is_empty() {
        FieldOutcome::fail(field, message)
    } else {
        FieldOutcome::ok(field)
    }
}

fn is_qualifying_education(degree: &str, institute: &str) -> bool {
    !degree.trim().is_empty() && !institute.trim().is_empty()
}

fn has_education_entry(form: &FormState) -> bool {
    form.sections
        .groups(SectionKind::Education)
        .iter()
        .any(|g| is_qualifying_education(g.value("degree"), g.value("institute")))
}

/// Runs all rules against the form. Nothing downstream may run unless `valid` is true.
pub fn validate(form: &FormState) -> ValidationReport {
    let outcomes: Vec<FieldOutcome> = RULES.iter().flat_map(|rule| rule(form)).collect();

    let errors: Vec<FieldError> = outcomes
        .iter()
        .filter_map(|o| {
            o.error.map(|message| FieldError {
                field: o.field,
                message: message.to_string(),
            })
        })
        .collect();

    let alert = (!has_education_entry(form)).then(|| EDUCATION_REQUIRED_ALERT.to_string());

    ValidationReport {
        valid: errors.is_empty() && alert.is_none(),
        first_invalid_field: errors.first().map(|e| e.field),
        errors,
        alert,
        checked: outcomes.iter().map(|o| o.field).collect(),
    }
}

/// Inline errors currently displayed for a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    shown: BTreeMap<FieldId, String>,
}

impl FieldErrors {
    /// Returns whether anything changed.
    pub fn show(&mut self, field: FieldId, message: &str) -> bool {
        if self.shown.get(&field).map(String::as_str) == Some(message) {
            return false;
        }
        self.shown.insert(field, message.to_string());
        true
    }

    /// Returns whether anything changed.
    pub fn hide(&mut self, field: FieldId) -> bool {
        self.shown.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Shows or hides each checked field, and drops errors of fields the run did not
    /// reach (removed groups, groups that no longer count as an education entry).
    pub fn apply(&mut self, report: &ValidationReport) {
        for field in &report.checked {
            match report.errors.iter().find(|e| e.field == *field) {
                Some(error) => {
                    self.show(*field, &error.message);
                }
                None => {
                    self.hide(*field);
                }
            }
        }
        self.shown.retain(|field, _| report.checked.contains(field));
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.shown.get(&field).map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<FieldError> {
        self.shown
            .iter()
            .map(|(field, message)| FieldError {
                field: *field,
                message: message.clone(),
            })
            .collect()
    }
}
