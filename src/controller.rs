use crate::api::{AnswerService, AskRequest, AskResponse};
use crate::error::{PortalError, Result};
use crate::models::{Message, Portal, SessionRecord};
use crate::speech::{Speech, SpeechCaps};
use crate::store::RecordStore;
use chrono::Local;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Shown in place of an answer whenever the service call fails.
pub const REMOTE_FAILURE_NOTICE: &str = "Sorry, the portal could not be reached. Please try again.";

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub user_id: Option<String>,
    pub session_id: String,
    pub mode: String,
    pub advance_day: bool,
    pub auto_speak: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            user_id: None,
            session_id: Uuid::new_v4().to_string(),
            mode: "chat".to_string(),
            advance_day: true,
            auto_speak: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// The stored exchange was shown without a request
    Restored,
    Answered,
    Failed,
    /// A newer request or a portal switch superseded this one
    Stale,
}

/// A question that has been shown and is waiting for its answer.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    generation: u64,
    portal_id: String,
    question: String,
    request: AskRequest,
}

impl PendingQuestion {
    pub fn request(&self) -> &AskRequest {
        &self.request
    }
}

pub struct PortalController {
    portals: Vec<Portal>,
    active: Option<String>,
    transcript: Vec<Message>,
    answers: Arc<dyn AnswerService>,
    records: RecordStore,
    speech: Arc<dyn Speech>,
    options: ControllerOptions,
    generation: u64,
}

impl PortalController {
    /// The persisted active portal is restored when it is still configured.
    /// Its transcript stays empty until `select_portal` is called.
    pub fn new(
        portals: Vec<Portal>,
        answers: Arc<dyn AnswerService>,
        records: RecordStore,
        speech: Arc<dyn Speech>,
        options: ControllerOptions,
    ) -> Self {
        let active = records
            .active_portal()
            .filter(|id| portals.iter().any(|p| &p.id == id));

        Self {
            portals,
            active,
            transcript: Vec::new(),
            answers,
            records,
            speech,
            options,
            generation: 0,
        }
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn portal(&self, id: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.id == id)
    }

    pub fn active_portal(&self) -> Option<&Portal> {
        self.active.as_deref().and_then(|id| self.portal(id))
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn record(&self, portal_id: &str) -> Option<SessionRecord> {
        self.records.load(portal_id)
    }

    pub fn speech_caps(&self) -> SpeechCaps {
        self.speech.available()
    }

    /// Switch to a portal, showing its saved exchange or asking its
    /// starting prompt when it has none.
    pub async fn select_portal(&mut self, id: &str) -> Result<SubmitOutcome> {
        let portal = self
            .portal(id)
            .cloned()
            .ok_or_else(|| PortalError::UnknownPortal(id.to_string()))?;

        self.records.set_active_portal(&portal.id)?;
        self.active = Some(portal.id.clone());
        self.transcript.clear();
        self.generation += 1;

        let saved = self.records.load(&portal.id);
        if let Some((question, answer)) = saved.as_ref().and_then(|r| r.last_exchange()) {
            debug!(portal = %portal.id, "restoring saved exchange");
            self.transcript.push(Message::user(question));
            self.transcript.push(Message::bot(answer));
            return Ok(SubmitOutcome::Restored);
        }

        debug!(portal = %portal.id, "no saved exchange, asking starting prompt");
        self.submit(&portal.start_prompt).await
    }

    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome> {
        let Some(pending) = self.prepare_submit(text)? else {
            return Ok(SubmitOutcome::Ignored);
        };
        let result = self.answers.ask(pending.request()).await;
        Ok(self.finish_submit(pending, result).await)
    }

    /// Show the question and build its request. `None` for blank input.
    pub fn prepare_submit(&mut self, text: &str) -> Result<Option<PendingQuestion>> {
        let question = text.trim();
        if question.is_empty() {
            return Ok(None);
        }

        let portal = self
            .active_portal()
            .cloned()
            .ok_or(PortalError::NoActivePortal)?;

        self.transcript.push(Message::user(question));
        self.generation += 1;

        let record = self.records.load(&portal.id).unwrap_or_default();
        let context = json!({
            "portal": { "id": portal.id, "title": portal.title },
            "day": record.day,
            "notes": record.notes,
        });

        let request = AskRequest {
            question: question.to_string(),
            portal_id: Some(portal.id.clone()),
            resume_code: record.resume_code,
            user_id: self.options.user_id.clone(),
            session_id: Some(self.options.session_id.clone()),
            mode: Some(self.options.mode.clone()),
            context: Some(context.to_string()),
        };

        Ok(Some(PendingQuestion {
            generation: self.generation,
            portal_id: portal.id,
            question: question.to_string(),
            request,
        }))
    }

    /// Apply the service result for `pending`. Only the most recently
    /// prepared question is applied; older ones come back `Stale`.
    pub async fn finish_submit(
        &mut self,
        pending: PendingQuestion,
        result: Result<AskResponse>,
    ) -> SubmitOutcome {
        if pending.generation != self.generation
            || self.active.as_deref() != Some(pending.portal_id.as_str())
        {
            debug!(
                generation = pending.generation,
                current = self.generation,
                "discarding superseded answer"
            );
            return SubmitOutcome::Stale;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(portal = %pending.portal_id, error = %e, "answer service call failed");
                self.transcript
                    .push(Message::error_notice(REMOTE_FAILURE_NOTICE));
                return SubmitOutcome::Failed;
            }
        };

        self.transcript.push(Message::bot(response.answer.as_str()));

        let existing = self.records.load(&pending.portal_id);
        let first_answer = existing
            .as_ref()
            .and_then(|r| r.last_answer.as_ref())
            .is_none();
        let mut record = existing.unwrap_or_default();
        record.last_question = Some(pending.question);
        record.last_answer = Some(response.answer.clone());
        record.updated_at = Some(Local::now());
        if let Some(code) = response.next_resume_code {
            record.resume_code = Some(code);
        }
        if self.options.advance_day && !first_answer {
            record.advance_day();
        }

        if let Err(e) = self.records.save(&pending.portal_id, &record) {
            warn!(portal = %pending.portal_id, error = %e, "failed to save session record");
        }

        if self.options.auto_speak {
            self.speech.speak(&response.answer).await;
        }

        SubmitOutcome::Answered
    }

    /// Capture one spoken question and submit it.
    pub async fn listen_and_submit(&mut self) -> Result<SubmitOutcome> {
        if !self.speech.available().input {
            debug!("speech input unavailable");
            return Ok(SubmitOutcome::Ignored);
        }
        match self.speech.listen().await {
            Some(heard) => self.submit(&heard).await,
            None => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Replace the journal notes of the active portal. Blank text clears them.
    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        let portal_id = self
            .active
            .clone()
            .ok_or(PortalError::NoActivePortal)?;

        let mut record = self.records.load(&portal_id).unwrap_or_default();
        let notes = notes.trim();
        record.notes = if notes.is_empty() {
            None
        } else {
            Some(notes.to_string())
        };
        self.records.save(&portal_id, &record)
    }

    pub fn reset_portal(&mut self, id: &str) -> Result<()> {
        if self.portal(id).is_none() {
            return Err(PortalError::UnknownPortal(id.to_string()));
        }
        self.records.remove(id)?;
        if self.active.as_deref() == Some(id) {
            self.transcript.clear();
            self.generation += 1;
        }
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.records.clear()?;
        self.active = None;
        self.transcript.clear();
        self.generation += 1;
        Ok(())
    }
}
