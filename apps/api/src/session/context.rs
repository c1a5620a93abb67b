//! Per-user session: the form being edited plus the last generated model and markup.
//!
//! State sits behind an async `RwLock` that is only ever held for short, synchronous
//! sections. Generation is serialized separately through the `busy` flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::Instant;
use uuid::Uuid;

use crate::ats::CheckOutcome;
use crate::form::sections::FormState;
use crate::form::validation::{FieldError, FieldErrors};
use crate::models::DocumentModel;
use crate::render::DEFAULT_TEMPLATE;

#[derive(Debug, Clone)]
pub struct SessionState {
    pub form: FormState,
    pub field_errors: FieldErrors,
    /// Exactly one template is selected at any time.
    pub template: String,
    /// Retained after a successful generate so a template switch can re-render it.
    pub model: Option<DocumentModel>,
    pub markup: Option<String>,
    pub ats: Option<CheckOutcome>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            field_errors: FieldErrors::default(),
            template: DEFAULT_TEMPLATE.to_string(),
            model: None,
            markup: None,
            ats: None,
        }
    }
}

pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    state: RwLock<SessionState>,
    busy: AtomicBool,
    opened: Instant,
    /// Milliseconds after `opened` of the last lookup through the store.
    last_seen_ms: AtomicU64,
}

/// Held for the duration of one generate; dropping it frees the session again.
pub struct GenerationGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: RwLock::new(SessionState::default()),
            busy: AtomicBool::new(false),
            opened: Instant::now(),
            last_seen_ms: AtomicU64::new(0),
        }
    }

    pub fn touch(&self) {
        let elapsed = u64::try_from(self.opened.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_seen_ms.store(elapsed, Ordering::Relaxed);
    }

    pub fn idle_for(&self) -> Duration {
        let last_seen = Duration::from_millis(self.last_seen_ms.load(Ordering::Relaxed));
        self.opened.elapsed().saturating_sub(last_seen)
    }

    /// `None` while another generate holds the session.
    pub fn try_begin_generation(&self) -> Option<GenerationGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GenerationGuard { busy: &self.busy })
    }

    pub fn is_generating(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().await
    }

    pub async fn view(&self) -> SessionView {
        let state = self.read().await;
        SessionView {
            id: self.id,
            created_at: self.created_at,
            form: state.form.clone(),
            field_errors: state.field_errors.to_vec(),
            template: state.template.clone(),
            has_preview: state.markup.is_some(),
            generating: self.is_generating(),
            ats: state.ats.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub form: FormState,
    pub field_errors: Vec<FieldError>,
    pub template: String,
    pub has_preview: bool,
    pub generating: bool,
    pub ats: Option<CheckOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionKind;

    #[tokio::test]
    async fn test_fresh_session() {
        let session = Session::new();
        let view = session.view().await;
        assert_eq!(view.template, "simple-ats");
        assert!(!view.has_preview);
        assert!(!view.generating);
        assert_eq!(view.form.sections.groups(SectionKind::Education).len(), 1);
    }

    #[test]
    fn test_guard_serializes_generation() {
        let session = Session::new();
        let guard = session.try_begin_generation();
        assert!(guard.is_some());
        assert!(session.is_generating());
        assert!(session.try_begin_generation().is_none());

        drop(guard);
        assert!(!session.is_generating());
        assert!(session.try_begin_generation().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_resets_idle_time() {
        let session = Session::new();
        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(session.idle_for(), Duration::from_secs(90));

        session.touch();
        assert_eq!(session.idle_for(), Duration::ZERO);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(session.idle_for(), Duration::from_secs(5));
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn fails_midway(session: &Session) -> Result<(), &'static str> {
            let _guard = session.try_begin_generation().ok_or("busy")?;
            Err("invalid form")
        }

        let session = Session::new();
        assert_eq!(fails_midway(&session), Err("invalid form"));
        assert!(!session.is_generating());
    }
}
