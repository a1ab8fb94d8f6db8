//! The conversation engine.
//!
//! Finite-state orchestrator for one feedback dialogue. Each accepted
//! submission runs the pipeline: call the AI workflow with the latest
//! user message, normalize the reply, merge the extracted fragment into
//! the ticket draft, persist, and decide the next state.
//!
//! # Failure containment
//!
//! A failed workflow call never kills the session: it degrades to a
//! canned apology turn and the dialogue stays open. Per-turn persistence
//! failures are logged and swallowed (the in-memory conversation wins
//! over durability); only a store failure while finalizing propagates,
//! since it may mean the report was not actually recorded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::conversation::{protocol, ConversationSession, SessionState};
use crate::domain::foundation::{ReporterId, StateMachine};
use crate::domain::ticket::{aggregator, ConversationTurn, Ticket, TicketStatus};
use crate::ports::{ChatWorkflow, ReportSink, StoreError, TicketRepository};

/// Orchestrates one feedback dialogue against the external collaborators.
///
/// One engine instance owns at most one session. Multiple independent
/// engines are freely constructible; nothing here is process-global.
pub struct ConversationEngine {
    workflow: Arc<dyn ChatWorkflow>,
    tickets: Arc<dyn TicketRepository>,
    reports: Arc<dyn ReportSink>,
    reporter: ReporterId,
    session: Mutex<Option<ConversationSession>>,
    pending: AtomicBool,
}

/// Point-in-time view of the session, returned by every operation.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Current dialogue state (`Main` when no session exists).
    pub state: SessionState,
    /// Turn list as shown to the reporter.
    pub turns: Vec<ConversationTurn>,
    /// The accumulating (or finalized) ticket, when a session exists.
    pub ticket: Option<Ticket>,
}

/// Errors surfaced by engine operations.
///
/// Workflow failures are deliberately absent: they are contained inside
/// the pipeline and rendered as an apology turn, never thrown.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A pipeline run is already in flight; submissions are rejected,
    /// not queued.
    #[error("a request is already in flight for this session")]
    RequestInFlight,

    /// The operation is not valid in the current dialogue state.
    #[error("operation not valid in state {actual:?}")]
    InvalidState {
        /// The state the session was actually in.
        actual: SessionState,
    },

    /// Submitted message was empty or whitespace-only.
    #[error("message content cannot be empty")]
    EmptyMessage,

    /// The finalized record could not be written to the store.
    #[error("failed to record finalized report: {0}")]
    Finalize(#[from] StoreError),
}

impl ConversationEngine {
    /// Creates an engine wired to its collaborators.
    pub fn new(
        workflow: Arc<dyn ChatWorkflow>,
        tickets: Arc<dyn TicketRepository>,
        reports: Arc<dyn ReportSink>,
        reporter: ReporterId,
    ) -> Self {
        Self {
            workflow,
            tickets,
            reports,
            reporter,
            session: Mutex::new(None),
            pending: AtomicBool::new(false),
        }
    }

    /// The identity finalized tickets are attributed to.
    pub fn reporter(&self) -> &ReporterId {
        &self.reporter
    }

    /// True while a pipeline run is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Current session view without touching anything.
    pub async fn snapshot(&self) -> SessionSnapshot {
        snapshot_of(self.session.lock().await.as_ref())
    }

    /// Starts a new dialogue from the first user message.
    ///
    /// Creates the session and the ticket record together
    /// (`status=in_progress`), appends the first user turn, runs the
    /// pipeline, and lands in `Chatting`.
    pub async fn submit_initial(
        &self,
        text: &str,
        category: Option<String>,
    ) -> Result<SessionSnapshot, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyMessage);
        }
        let _guard = self.begin_request()?;
        let mut slot = self.session.lock().await;

        if let Some(session) = slot.as_ref() {
            return Err(EngineError::InvalidState {
                actual: session.state,
            });
        }

        let mut session = ConversationSession::start(text.trim(), category);
        tracing::info!(record_id = %session.record_id, "starting new conversation");

        match self.tickets.create(session.ticket_draft.clone()).await {
            Ok(stored) => session.ticket_draft = stored,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create ticket record, continuing in memory")
            }
        }

        self.run_pipeline(&mut session).await;
        let snapshot = snapshot_of(Some(&session));
        *slot = Some(session);
        Ok(snapshot)
    }

    /// Submits one dialogue turn.
    ///
    /// Rejected outright while a pipeline run is in flight — at most one
    /// per session, no queueing.
    pub async fn submit_turn(&self, text: &str) -> Result<SessionSnapshot, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyMessage);
        }
        let _guard = self.begin_request()?;
        let mut slot = self.session.lock().await;
        let session = require_state(&mut slot, SessionState::Chatting)?;

        session.push_user(text.trim());
        self.run_pipeline(session).await;
        Ok(snapshot_of(Some(&*session)))
    }

    /// Re-runs the pipeline for the bot turn at `turn_index`.
    ///
    /// Valid only if that turn is a bot turn directly preceded by a user
    /// turn; the turn and everything after it are dropped first. Any
    /// other index is a no-op.
    pub async fn regenerate(&self, turn_index: usize) -> Result<SessionSnapshot, EngineError> {
        let _guard = self.begin_request()?;
        let mut slot = self.session.lock().await;
        let session = require_state(&mut slot, SessionState::Chatting)?;

        if !session.truncate_for_regenerate(turn_index) {
            tracing::debug!(turn_index, "regenerate request ignored");
            return Ok(snapshot_of(Some(&*session)));
        }
        self.run_pipeline(session).await;
        Ok(snapshot_of(Some(&*session)))
    }

    /// Finalizes the report from the confirmation screen.
    ///
    /// Flushes the finalized record (a store failure here propagates),
    /// dispatches it best-effort, prunes the local record for anonymous
    /// reporters, and lands in `Success` with the turn list cleared.
    pub async fn confirm(&self) -> Result<SessionSnapshot, EngineError> {
        let _guard = self.begin_request()?;
        let mut slot = self.session.lock().await;
        let session = require_state(&mut slot, SessionState::Confirmation)?;

        let mut finalized = session.ticket_draft.clone();
        set_status(&mut finalized, TicketStatus::Finalized);
        finalized.conversation_history = session.turns.clone();

        let finalized = self
            .tickets
            .update(&session.record_id, finalized)
            .await?;

        if let Err(err) = self.reports.send(&finalized, &self.reporter).await {
            tracing::error!(error = %err, "report dispatch failed, keeping local finalization");
        }

        if self.reporter.is_anonymous() {
            if let Err(err) = self.tickets.remove(&session.record_id).await {
                tracing::warn!(error = %err, "failed to prune anonymous ticket record");
            }
        }

        advance_state(session, SessionState::Success);
        session.turns.clear();
        session.ticket_draft = finalized;
        tracing::info!(record_id = %session.record_id, "report finalized");
        Ok(snapshot_of(Some(&*session)))
    }

    /// Returns from the confirmation screen to editing. No data change.
    pub async fn edit_requested(&self) -> Result<SessionSnapshot, EngineError> {
        let mut slot = self.session.lock().await;
        let session = require_state(&mut slot, SessionState::Confirmation)?;
        advance_state(session, SessionState::Chatting);
        Ok(snapshot_of(Some(&*session)))
    }

    /// Discards the session unconditionally and returns to `Main`.
    ///
    /// Blocked only while a pipeline run is in flight.
    pub async fn new_conversation(&self) -> Result<SessionSnapshot, EngineError> {
        if self.is_pending() {
            return Err(EngineError::RequestInFlight);
        }
        let mut slot = self.session.lock().await;
        *slot = None;
        Ok(snapshot_of(None))
    }

    /// One pipeline run over an accepted submission.
    async fn run_pipeline(&self, session: &mut ConversationSession) {
        let Some(prompt) = session.latest_user_prompt() else {
            tracing::warn!("no usable user prompt, skipping pipeline run");
            return;
        };

        let response = match self.workflow.invoke(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "chat workflow call failed");
                session.push_bot(protocol::APOLOGY_MESSAGE);
                return;
            }
        };
        tracing::debug!(
            confidence = ?response.confidence,
            has_message = response.has_message(),
            "workflow reply normalized"
        );

        let fragment = &response.ticket;
        let fragment_has_data = fragment.has_data();
        session.ticket_draft = aggregator::merge_fragment(&session.ticket_draft, fragment);

        if protocol::is_confirmation_sentinel(&response.next_message) {
            let summary = match self.workflow.generate_summary().await {
                Ok(summary) => summary,
                Err(err) => {
                    tracing::error!(error = %err, "summary generation failed");
                    session.push_bot(protocol::APOLOGY_MESSAGE);
                    return;
                }
            };
            session.ticket_draft.summary = Some(summary);
            set_status(&mut session.ticket_draft, TicketStatus::ReadyForConfirmation);
            session.push_bot(protocol::CONFIRMATION_PROMPT);
            session.ticket_draft.conversation_history = session.turns.clone();
            self.persist(session).await;
            advance_state(session, SessionState::Confirmation);
            return;
        }

        if response.has_message() {
            session.push_bot(response.next_message.trim());
            session.ticket_draft.conversation_history = session.turns.clone();
            self.persist(session).await;
            return;
        }

        if fragment_has_data {
            // Data but nothing to say: persist silently, no new turn.
            self.persist(session).await;
            return;
        }

        tracing::warn!("workflow reply carried nothing usable, rendering apology");
        session.push_bot(protocol::APOLOGY_MESSAGE);
    }

    /// Per-turn flush of the draft; failures are logged and swallowed.
    async fn persist(&self, session: &mut ConversationSession) {
        match self
            .tickets
            .update(&session.record_id, session.ticket_draft.clone())
            .await
        {
            Ok(stored) => session.ticket_draft = stored,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist ticket draft, continuing in memory")
            }
        }
    }

    /// Single-flight guard: at most one pipeline run per session.
    fn begin_request(&self) -> Result<RequestGuard<'_>, EngineError> {
        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::RequestInFlight);
        }
        Ok(RequestGuard(&self.pending))
    }
}

/// Clears the pending flag when a request finishes, on every path.
struct RequestGuard<'a>(&'a AtomicBool);

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn snapshot_of(session: Option<&ConversationSession>) -> SessionSnapshot {
    match session {
        Some(session) => SessionSnapshot {
            state: session.state,
            turns: session.turns.clone(),
            ticket: Some(session.ticket_draft.clone()),
        },
        None => SessionSnapshot {
            state: SessionState::Main,
            turns: Vec::new(),
            ticket: None,
        },
    }
}

/// Fetches the session, requiring it to be in the given state.
fn require_state<'a>(
    slot: &'a mut Option<ConversationSession>,
    expected: SessionState,
) -> Result<&'a mut ConversationSession, EngineError> {
    match slot.as_mut() {
        Some(session) if session.state == expected => Ok(session),
        Some(session) => Err(EngineError::InvalidState {
            actual: session.state,
        }),
        None => Err(EngineError::InvalidState {
            actual: SessionState::Main,
        }),
    }
}

/// Moves the session to `target`, logging if the transition falls
/// outside the table (it never does for engine-driven moves).
fn advance_state(session: &mut ConversationSession, target: SessionState) {
    match session.state.transition_to(target) {
        Ok(next) => session.state = next,
        Err(err) => {
            tracing::warn!(error = %err, "irregular session transition, forcing");
            session.state = target;
        }
    }
}

/// Moves the ticket status to `target`. The merge can leave the draft
/// status anywhere (fragments carry their own status), so an
/// out-of-table move is logged rather than refused.
fn set_status(ticket: &mut Ticket, target: TicketStatus) {
    if !ticket.status.can_transition_to(&target) && ticket.status != target {
        tracing::debug!(from = ?ticket.status, to = ?target, "irregular ticket status move");
    }
    ticket.status = target;
}
