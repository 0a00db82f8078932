use super::storage::KeyValueStore;
use crate::error::Result;
use crate::models::{SessionRecord, DAY_CEILING};
use chrono::{DateTime, Local};
use tracing::debug;

pub const ACTIVE_PORTAL_KEY: &str = "activePortal";

const FIELD_LAST_QUESTION: &str = "lastQuestion";
const FIELD_LAST_ANSWER: &str = "lastAnswer";
const FIELD_RESUME_CODE: &str = "resumeCode";
const FIELD_NOTES: &str = "notes";
const FIELD_DAY: &str = "day";
const FIELD_UPDATED_AT: &str = "updatedAt";

/// Store key for one field of a portal's record: `portal.<id>.<field>`
pub fn record_key(portal_id: &str, field: &str) -> String {
    format!("portal.{}.{}", portal_id, field)
}

/// Typed access to session records kept in a key-value store.
pub struct RecordStore {
    inner: Box<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(inner: Box<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// `None` when nothing was ever stored for the portal
    pub fn load(&self, portal_id: &str) -> Option<SessionRecord> {
        let field = |name: &str| self.inner.get(&record_key(portal_id, name));

        let last_question = field(FIELD_LAST_QUESTION);
        let last_answer = field(FIELD_LAST_ANSWER);
        let resume_code = field(FIELD_RESUME_CODE);
        let notes = field(FIELD_NOTES);
        let day_raw = field(FIELD_DAY);
        let updated_raw = field(FIELD_UPDATED_AT);

        if last_question.is_none()
            && last_answer.is_none()
            && resume_code.is_none()
            && notes.is_none()
            && day_raw.is_none()
            && updated_raw.is_none()
        {
            return None;
        }

        let day = day_raw
            .and_then(|d| d.trim().parse::<u32>().ok())
            .map(|d| d.clamp(1, DAY_CEILING))
            .unwrap_or(1);

        let updated_at = updated_raw
            .and_then(|ts| DateTime::parse_from_rfc3339(ts.trim()).ok())
            .map(|ts| ts.with_timezone(&Local));

        Some(SessionRecord {
            last_question,
            last_answer,
            resume_code,
            notes,
            day,
            updated_at,
        })
    }

    pub fn save(&mut self, portal_id: &str, record: &SessionRecord) -> Result<()> {
        debug!(portal = portal_id, day = record.day, "saving session record");

        self.put(portal_id, FIELD_LAST_QUESTION, record.last_question.as_deref())?;
        self.put(portal_id, FIELD_LAST_ANSWER, record.last_answer.as_deref())?;
        self.put(portal_id, FIELD_RESUME_CODE, record.resume_code.as_deref())?;
        self.put(portal_id, FIELD_NOTES, record.notes.as_deref())?;
        self.put(portal_id, FIELD_DAY, Some(&record.day.to_string()))?;
        let updated = record.updated_at.map(|ts| ts.to_rfc3339());
        self.put(portal_id, FIELD_UPDATED_AT, updated.as_deref())?;
        Ok(())
    }

    /// Delete every `portal.<id>.*` key
    pub fn remove(&mut self, portal_id: &str) -> Result<()> {
        let prefix = record_key(portal_id, "");
        let keys: Vec<String> = self
            .inner
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();
        for key in keys {
            self.inner.remove(&key)?;
        }
        Ok(())
    }

    pub fn active_portal(&self) -> Option<String> {
        self.inner
            .get(ACTIVE_PORTAL_KEY)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn set_active_portal(&mut self, portal_id: &str) -> Result<()> {
        self.inner.set(ACTIVE_PORTAL_KEY, portal_id)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }

    fn put(&mut self, portal_id: &str, field: &str, value: Option<&str>) -> Result<()> {
        let key = record_key(portal_id, field);
        match value {
            Some(v) => self.inner.set(&key, v),
            None => self.inner.remove(&key),
        }
    }
}
