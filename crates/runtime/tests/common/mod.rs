#![allow(dead_code)]

use std::sync::Arc;

use crawl_core::{ActorRole, ActorTemplate, Campaign, SceneDefinition};
use crawl_runtime::api::{RecordingPresenter, ScriptedDialogs};
use crawl_runtime::{
    Collaborators, GameSession, InMemorySaveRepository, RuntimeConfig, SaveRepository, TurnManager,
};

pub const HERO: &str = "NAME:Ann, HIT_DICE:1D10, STR:20, SPEED:30";

/// Two small rooms; the entrance is at (1, 1) and the exit at (5, 1).
pub fn rows() -> Vec<String> {
    ["#######", "#E...X#", "#.....#", "#######"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}

pub fn scene(name: &str, exit_key: Option<&str>, actors: Vec<ActorTemplate>) -> SceneDefinition {
    SceneDefinition {
        name: name.to_string(),
        intro: None,
        rows: rows(),
        exit_key: exit_key.map(str::to_string),
        actors,
    }
}

pub fn campaign(hero: ActorTemplate, scenes: Vec<SceneDefinition>) -> Campaign {
    Campaign { hero, scenes }
}

pub fn hero(def: &str) -> ActorTemplate {
    ActorTemplate::new(ActorRole::Hero, def)
}

pub struct Game {
    pub manager: Arc<TurnManager>,
    pub dialogs: Arc<ScriptedDialogs>,
    pub presenter: Arc<RecordingPresenter>,
    pub saves: Arc<InMemorySaveRepository>,
}

pub fn game(campaign: Campaign, dialogs: ScriptedDialogs) -> Game {
    game_with_saves(campaign, dialogs, InMemorySaveRepository::new(), RuntimeConfig::default())
}

pub fn game_with_saves(
    campaign: Campaign,
    dialogs: ScriptedDialogs,
    saves: InMemorySaveRepository,
    config: RuntimeConfig,
) -> Game {
    let dialogs = Arc::new(dialogs);
    let presenter = Arc::new(RecordingPresenter::new());
    let saves = Arc::new(saves);
    let io = Collaborators::new(
        dialogs.clone(),
        presenter.clone(),
        saves.clone() as Arc<dyn SaveRepository>,
    );
    let session = GameSession::new(campaign, config.with_seed(5)).expect("campaign should be valid");
    Game {
        manager: Arc::new(TurnManager::new(session, io)),
        dialogs,
        presenter,
        saves,
    }
}
