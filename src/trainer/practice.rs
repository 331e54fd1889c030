//! Learn and practice sessions driven through the [`Trainer`].

use super::Trainer;
use crate::database::RecordStore;
use crate::error::{Confirmation, Result, TrainerError};
use crate::models::distractors::{build_options, pick_distractors};
use crate::models::schedule::{apply_outcome, is_new, is_ready_to_practice};
use crate::models::{
    Advance, AnswerOption, Card, Direction, Gender, Phase, Session, SessionKind, SessionSummary,
};
use log::{debug, info};

/// Result of a submitted answer, shown until the session advances.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl Feedback {
    pub fn message(&self) -> String {
        if self.is_correct {
            "Correct!".to_string()
        } else {
            format!("Incorrect. The answer is: {}", self.correct_answer)
        }
    }
}

/// What the front-end renders for the current card.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub card_id: String,
    pub kind: SessionKind,
    pub direction: Direction,
    pub progress: String,
    pub prompt: String,
    /// The answer itself, revealed in learn sessions only.
    pub hint: Option<String>,
    pub gender: Gender,
    pub note: String,
    pub image: String,
    pub audio: String,
    pub known: bool,
    pub options: Vec<AnswerOption>,
    pub feedback: Option<Feedback>,
}

impl Question {
    pub fn has_audio(&self) -> bool {
        !self.audio.trim().is_empty()
    }
}

/// Proof of an outstanding audio capture for one card.
/// Consumed by [`Trainer::finish_recording`] or [`Trainer::discard_recording`].
#[derive(Debug, PartialEq, Eq)]
pub struct RecordingTicket {
    card_id: String,
}

impl RecordingTicket {
    pub fn card_id(&self) -> &str {
        &self.card_id
    }
}

impl<S: RecordStore> Trainer<S> {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Summary of the most recently completed session.
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn clear_summary(&mut self) {
        self.last_summary = None;
    }

    /// Starts a learn or practice run over the active list, replacing any running session.
    pub fn start_session(&mut self, kind: SessionKind) -> Result<()> {
        let now = self.now();
        let pool: Vec<String> = self
            .cards
            .iter()
            .filter(|card| match kind {
                SessionKind::Learn => is_new(card),
                SessionKind::Practice => is_ready_to_practice(card, now),
            })
            .map(|card| card.id.clone())
            .collect();

        let session = Session::start(
            kind,
            self.settings.direction,
            pool,
            self.settings.effective_batch_size(),
            &mut self.rng,
        )?;
        info!("Started {} session with {} cards", kind, session.total_count());

        self.session = Some(session);
        self.last_summary = None;
        self.present_current()
    }

    /// Discards the running session. Answers already given stay committed.
    pub fn end_session(&mut self) {
        if self.session.take().is_some() {
            info!("Session abandoned");
        }
    }

    fn current_id(&self) -> Result<String> {
        let session = self.session.as_ref().ok_or(TrainerError::NoActiveSession)?;
        session
            .current_card_id()
            .map(str::to_string)
            .ok_or(TrainerError::InvalidSessionState("session is complete"))
    }

    /// Draws a fresh option set for the current card.
    /// Cards that vanished from the list are dropped from the run.
    fn present_current(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(TrainerError::NoActiveSession)?;
        loop {
            let Some(card_id) = session.current_card_id() else {
                return Ok(());
            };
            match self.cards.iter().find(|c| c.id == card_id) {
                Some(card) => {
                    let distractors = pick_distractors(card, &self.cards, &mut self.rng);
                    let options = build_options(card, &distractors, session.direction, &mut self.rng);
                    return session.present(options);
                }
                None => {
                    debug!("Dropping missing card {} from session", card_id);
                    session.remove_current()?;
                }
            }
        }
    }

    /// Ends the run once the session reports completion.
    fn finish_if_complete(&mut self) -> Option<SessionSummary> {
        if !self.session.as_ref().is_some_and(Session::is_complete) {
            return None;
        }
        let session = self.session.take()?;
        let summary = session.summary();
        info!(
            "Finished {} session: {}/{} correct",
            summary.kind, summary.correct, summary.total
        );
        self.last_summary = Some(summary.clone());
        Some(summary)
    }

    /// Moves on to the next card. Returns the summary when the run is over.
    fn step(&mut self) -> Result<Option<SessionSummary>> {
        let session = self.session.as_mut().ok_or(TrainerError::NoActiveSession)?;
        match session.advance()? {
            Advance::Next(_) => {
                self.present_current()?;
                Ok(self.finish_if_complete())
            }
            Advance::Complete => Ok(self.finish_if_complete()),
        }
    }

    /// The current card as the front-end shows it.
    pub fn question(&self) -> Option<Question> {
        let session = self.session.as_ref()?;
        let card_id = session.current_card_id()?;
        let card = self.card(card_id)?;
        let direction = session.direction;

        let hint = match session.kind {
            SessionKind::Learn => Some(match direction {
                Direction::WordToMeaning => format!("Meaning: {}", card.meaning),
                Direction::MeaningToWord => format!("Word: {}", card.word),
            }),
            SessionKind::Practice => None,
        };
        let feedback = match session.phase() {
            Phase::Answered {
                selected,
                correct_answer,
                is_correct,
                ..
            } => Some(Feedback {
                selected: selected.clone(),
                correct_answer: correct_answer.clone(),
                is_correct: *is_correct,
            }),
            _ => None,
        };

        Some(Question {
            card_id: card.id.clone(),
            kind: session.kind,
            direction,
            progress: session.progress_message(),
            prompt: direction.prompt_of(card).to_string(),
            hint,
            gender: card.gender,
            note: card.note.clone(),
            image: card.image.clone(),
            audio: card.audio.clone(),
            known: card.known,
            options: session.options().to_vec(),
            feedback,
        })
    }

    /// Scores the selected value against the current card and commits the outcome.
    /// Accepted once per question.
    pub fn submit_answer(&mut self, selected: &str) -> Result<Feedback> {
        let session = self.session.as_ref().ok_or(TrainerError::NoActiveSession)?;
        if !session.is_presenting() {
            return Err(TrainerError::InvalidSessionState("answer already submitted"));
        }
        let (kind, direction) = (session.kind, session.direction);
        let card_id = self.current_id()?;
        let card = self
            .card(&card_id)
            .ok_or_else(|| TrainerError::NotFound(format!("card {card_id}")))?;

        let correct_answer = direction.answer_of(card).to_string();
        let is_correct = selected == correct_answer;
        let now = self.now();
        self.commit_card(&card_id, |card: &mut Card| {
            apply_outcome(card, is_correct, kind, now)
        })?;

        let session = self.session.as_mut().ok_or(TrainerError::NoActiveSession)?;
        session.record_answer(selected, &correct_answer)?;
        debug!("Answered {}: correct={}", card_id, is_correct);

        Ok(Feedback {
            selected: selected.to_string(),
            correct_answer,
            is_correct,
        })
    }

    /// Leaves the answered card. Returns the summary when the run is over.
    pub fn advance(&mut self) -> Result<Option<SessionSummary>> {
        let session = self.session.as_ref().ok_or(TrainerError::NoActiveSession)?;
        if session.is_presenting() {
            return Err(TrainerError::InvalidSessionState("no answer submitted yet"));
        }
        self.step()
    }

    /// Marks the current card as known and moves on without scoring it.
    pub fn mark_known(&mut self) -> Result<Option<SessionSummary>> {
        let card_id = self.current_id()?;
        self.commit_card(&card_id, |card| card.known = true)?;
        info!("Marked {} as known", card_id);
        self.step()
    }

    /// Deletes the current card from the list and from the run.
    pub fn delete_current(&mut self, confirmation: Confirmation) -> Result<Option<SessionSummary>> {
        let card_id = self.current_id()?;
        let word = self.card(&card_id).map(|c| c.word.clone()).unwrap_or_default();
        confirmation.require(|| format!("Are you sure you want to delete the card \"{word}\"?"))?;

        if self.card(&card_id).is_some() {
            let cards: Vec<Card> = self
                .cards
                .iter()
                .filter(|c| c.id != card_id)
                .cloned()
                .collect();
            self.commit_cards(cards)?;
        }
        info!("Deleted card {} during session", card_id);

        let session = self.session.as_mut().ok_or(TrainerError::NoActiveSession)?;
        session.remove_current()?;
        if session.is_complete() {
            return Ok(self.finish_if_complete());
        }
        self.present_current()?;
        Ok(self.finish_if_complete())
    }

    /// Rewrites the current card's word, meaning and gender without advancing.
    pub fn edit_current(&mut self, word: &str, meaning: &str, gender: Gender) -> Result<()> {
        let (word, meaning) = (word.trim(), meaning.trim());
        if word.is_empty() || meaning.is_empty() {
            return Err(TrainerError::Validation(
                "Word and meaning cannot be empty".to_string(),
            ));
        }
        let card_id = self.current_id()?;
        self.commit_card(&card_id, |card| {
            card.word = word.to_string();
            card.meaning = meaning.to_string();
            card.gender = gender;
        })?;

        if self.session.as_ref().is_some_and(Session::is_presenting) {
            self.present_current()?;
        }
        Ok(())
    }

    /// Stores a trimmed note on the current card. Empty clears it.
    pub fn set_note(&mut self, text: &str) -> Result<()> {
        let card_id = self.current_id()?;
        let note = text.trim().to_string();
        self.commit_card(&card_id, |card| card.note = note)
    }

    /// Starts an audio capture for the current card.
    pub fn begin_recording(&mut self) -> Result<RecordingTicket> {
        if self.recording.is_some() {
            return Err(TrainerError::RecordingInProgress);
        }
        let card_id = self.current_id()?;
        self.recording = Some(card_id.clone());
        Ok(RecordingTicket { card_id })
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Writes the captured audio to the ticket's card.
    pub fn finish_recording(&mut self, ticket: RecordingTicket, payload: &str) -> Result<()> {
        self.take_ticket(&ticket)?;
        let payload = payload.to_string();
        self.commit_card(&ticket.card_id, |card| card.audio = payload)?;
        info!("Saved audio for card {}", ticket.card_id);
        Ok(())
    }

    pub fn discard_recording(&mut self, ticket: RecordingTicket) -> Result<()> {
        self.take_ticket(&ticket)
    }

    fn take_ticket(&mut self, ticket: &RecordingTicket) -> Result<()> {
        match &self.recording {
            Some(card_id) if *card_id == ticket.card_id => {
                self.recording = None;
                Ok(())
            }
            _ => Err(TrainerError::InvalidSessionState("recording ticket is not current")),
        }
    }
}
