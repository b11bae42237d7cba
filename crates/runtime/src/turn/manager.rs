//! The turn manager: a finite-state machine driven by player events.
//!
//! # Architecture
//!
//! The machine, its session and collaborators sit behind one async mutex.
//! [`TurnManager::trigger`] takes a latch before locking it: while one event
//! is being handled (dialogs included) any other event is dropped rather
//! than queued, so a double click can never act twice.
//!
//! Entering a state may itself finish that state (a computer turn runs to
//! completion in its entry hook), so [`Machine::transition_to`] keeps
//! following outcomes until a state settles and waits for input.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::event::{EventDisposition, TurnEvent};
use super::state::{Outcome, TurnState, next_state};
use super::{computer, hero, lifecycle};
use crate::api::{Collaborators, Result};
use crate::session::GameSession;

pub struct TurnManager {
    machine: Mutex<Machine>,
    busy: AtomicBool,
}

struct Machine {
    state: TurnState,
    session: GameSession,
    io: Collaborators,
}

/// Releases the latch however handling ends.
struct Latch<'a>(&'a AtomicBool);

impl Drop for Latch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TurnManager {
    pub fn new(session: GameSession, io: Collaborators) -> Self {
        Self {
            machine: Mutex::new(Machine {
                state: TurnState::WaitingToStart,
                session,
                io,
            }),
            busy: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> TurnState {
        self.machine.lock().await.state
    }

    /// Whether an event is being handled right now.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Read access to the session, for rendering.
    pub async fn inspect<R>(&self, f: impl FnOnce(&GameSession) -> R) -> R {
        let machine = self.machine.lock().await;
        f(&machine.session)
    }

    /// Handles one player event, or drops it when another is in progress.
    pub async fn trigger(&self, event: TurnEvent) -> Result<EventDisposition> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(%event, "event dropped while another is handled");
            return Ok(EventDisposition::Ignored);
        }
        let _latch = Latch(&self.busy);

        let mut machine = self.machine.lock().await;
        let state = machine.state;
        let outcome = machine.on_event(event).await?;
        tracing::debug!(%state, %event, %outcome, "event handled");
        if let Some(next) = next_state(state, outcome) {
            machine.transition_to(next).await?;
        }
        Ok(EventDisposition::Handled)
    }
}

impl Machine {
    async fn on_event(&mut self, event: TurnEvent) -> Result<Outcome> {
        match (self.state, event) {
            (TurnState::WaitingToStart, TurnEvent::MainMenu) => Ok(Outcome::MenuRequested),
            (state, event) if state.is_hero_turn() => {
                hero::handle(&mut self.session, &self.io, state, event).await
            }
            (state, event) => {
                tracing::debug!(%state, %event, "event has no meaning in this state");
                Ok(Outcome::Stay)
            }
        }
    }

    async fn on_entry(&mut self, previous: TurnState) -> Result<Outcome> {
        let (session, io) = (&mut self.session, &self.io);
        match self.state {
            TurnState::WaitingToStart => Ok(Outcome::Stay),
            TurnState::AtMainMenu => lifecycle::main_menu(session, io).await,
            TurnState::AtStart => lifecycle::start(session, io).await,
            TurnState::HeroTurnIdle | TurnState::HeroTurnInteracting => {
                let after_fight = previous == TurnState::HeroTurnInteracting;
                hero::begin_turn(session, io, after_fight).await
            }
            TurnState::ComputerTurnIdle => computer::run(session, io, false).await,
            TurnState::ComputerTurnInteracting => computer::run(session, io, true).await,
            TurnState::AtGameOver => lifecycle::game_over(session, io).await,
            TurnState::AtGameCompleted => lifecycle::game_completed(session, io).await,
        }
    }

    async fn on_exit(&mut self) -> Result<()> {
        if self.state.is_hero_turn() {
            self.session.hero_routes.clear();
        }
        Ok(())
    }

    /// Moves to `next`, following entry outcomes until a state settles.
    async fn transition_to(&mut self, mut next: TurnState) -> Result<()> {
        loop {
            self.on_exit().await?;
            tracing::info!(from = %self.state, to = %next, "transition");
            let previous = std::mem::replace(&mut self.state, next);
            let outcome = self.on_entry(previous).await?;
            match next_state(self.state, outcome) {
                Some(following) => next = following,
                None => return Ok(()),
            }
        }
    }
}
