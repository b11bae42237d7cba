//! Scripted collaborators for tests and unattended runs.
//!
//! [`ScriptedDialogs`] answers from queues, falling back to a fixed default
//! once a queue runs dry. [`RecordingPresenter`] keeps everything it is shown.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crawl_core::{Actor, ActorId, Artefact, GridPoint};

use super::collaborators::{
    ArtefactChoice, Dialogs, MainMenuChoice, Presenter, SoundCue, TradeOrder,
};
use super::errors::{Result, RuntimeError};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| RuntimeError::Dialog("scripted state poisoned".into()))
}

/// Holds `show_ok_dialog` open until released.
#[derive(Clone, Default)]
pub struct DialogGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct ScriptedDialogs {
    choices: Mutex<VecDeque<usize>>,
    menu: Mutex<VecDeque<MainMenuChoice>>,
    artefacts: Mutex<VecDeque<ArtefactChoice>>,
    pillage: Mutex<VecDeque<Vec<usize>>>,
    trades: Mutex<VecDeque<TradeOrder>>,
    shown: Mutex<Vec<(String, String)>>,
    gate: Option<DialogGate>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(mut self, gate: DialogGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_menu(self, choices: impl IntoIterator<Item = MainMenuChoice>) -> Self {
        if let Ok(mut queue) = self.menu.lock() {
            queue.extend(choices);
        }
        self
    }

    pub fn with_choices(self, choices: impl IntoIterator<Item = usize>) -> Self {
        if let Ok(mut queue) = self.choices.lock() {
            queue.extend(choices);
        }
        self
    }

    pub fn with_artefact_choices(self, choices: impl IntoIterator<Item = ArtefactChoice>) -> Self {
        if let Ok(mut queue) = self.artefacts.lock() {
            queue.extend(choices);
        }
        self
    }

    pub fn with_pillage(self, slots: Vec<usize>) -> Self {
        if let Ok(mut queue) = self.pillage.lock() {
            queue.push_back(slots);
        }
        self
    }

    pub fn with_trade(self, order: TradeOrder) -> Self {
        if let Ok(mut queue) = self.trades.lock() {
            queue.push_back(order);
        }
        self
    }

    /// Titles and messages of every OK dialog shown so far.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn was_shown(&self, title: &str) -> bool {
        self.shown().iter().any(|(t, _)| t == title)
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn show_choice_dialog(&self, _title: &str, _message: &str, _choices: &[String]) -> Result<usize> {
        Ok(lock(&self.choices)?.pop_front().unwrap_or(0))
    }

    async fn show_ok_dialog(&self, title: &str, message: &str) -> Result<()> {
        lock(&self.shown)?.push((title.to_string(), message.to_string()));
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(())
    }

    async fn show_main_menu(&self, _can_continue: bool) -> Result<MainMenuChoice> {
        Ok(lock(&self.menu)?
            .pop_front()
            .unwrap_or(MainMenuChoice::Quit))
    }

    async fn show_artefact_dialog(&self, _title: &str, _artefact: &Artefact) -> Result<ArtefactChoice> {
        Ok(lock(&self.artefacts)?
            .pop_front()
            .unwrap_or(ArtefactChoice::Take))
    }

    async fn show_pillage_dialog(&self, corpse: &Actor, _free_space: usize) -> Result<Vec<usize>> {
        let scripted = lock(&self.pillage)?.pop_front();
        Ok(scripted.unwrap_or_else(|| {
            let held = corpse.store.as_ref().map_or(0, |s| s.len());
            (0..held).collect()
        }))
    }

    async fn show_trade_dialog(&self, _hero: &Actor, _trader: &Actor) -> Result<TradeOrder> {
        Ok(lock(&self.trades)?.pop_front().unwrap_or_default())
    }

    async fn show_actor_details_dialog(&self, actor: &Actor) -> Result<()> {
        lock(&self.shown)?.push(("Details".to_string(), actor.name()));
        Ok(())
    }

    async fn show_rest_dialog(&self, _hero: &Actor, next_scene: &str) -> Result<()> {
        lock(&self.shown)?.push(("Rest".to_string(), next_scene.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    messages: Mutex<Vec<String>>,
    sounds: Mutex<Vec<SoundCue>>,
    routes: Mutex<Vec<(ActorId, Vec<GridPoint>)>>,
    attacks: Mutex<Vec<ActorId>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn sounds(&self) -> Vec<SoundCue> {
        self.sounds.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn routes(&self) -> Vec<(ActorId, Vec<GridPoint>)> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn attacks(&self) -> Vec<ActorId> {
        self.attacks.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn said(&self, fragment: &str) -> bool {
        self.messages().iter().any(|m| m.contains(fragment))
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn play_sound(&self, cue: SoundCue) -> Result<()> {
        lock(&self.sounds)?.push(cue);
        Ok(())
    }

    async fn animate_attack(&self, attacker: ActorId, _from: GridPoint, _to: GridPoint) -> Result<()> {
        lock(&self.attacks)?.push(attacker);
        Ok(())
    }

    async fn replay_route(&self, actor: ActorId, route: &[GridPoint]) -> Result<()> {
        lock(&self.routes)?.push((actor, route.to_vec()));
        Ok(())
    }

    async fn notify(&self, message: &str) -> Result<()> {
        lock(&self.messages)?.push(message.to_string());
        Ok(())
    }
}
