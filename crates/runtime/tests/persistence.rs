mod common;

use common::*;

use crawl_core::{Actor, ActorId, ActorRole, CharacterTraits, GridPoint};
use crawl_runtime::api::{MainMenuChoice, ScriptedDialogs};
use crawl_runtime::{
    FileSaveRepository, InMemorySaveRepository, RuntimeConfig, SaveRepository, SavedGame,
    TurnEvent, TurnState,
};

fn saved_hero(def: &str, alive: bool) -> Actor {
    let mut hero = Actor::new(
        ActorId::HERO,
        ActorRole::Hero,
        CharacterTraits::parse(def),
        GridPoint::ORIGIN,
    );
    hero.alive = alive;
    hero
}

fn two_scenes() -> crawl_core::Campaign {
    campaign(
        hero(HERO),
        vec![scene("Cellar", None, vec![]), scene("Crypt", None, vec![])],
    )
}

#[test]
fn file_repository_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = FileSaveRepository::new(dir.path().join("saves")).expect("repository");
    assert_eq!(repo.restore_game_state().expect("empty restore"), None);

    let saved = SavedGame {
        scene_index: 2,
        hero: saved_hero("NAME:Ann, HP:4, STR:16", true),
    };
    repo.save_game_state(&saved).expect("save");
    assert!(repo.save_path().exists());
    assert!(!repo.save_path().with_extension("json.tmp").exists());

    let restored = repo
        .restore_game_state()
        .expect("restore")
        .expect("save present");
    assert_eq!(restored, saved);
    assert!(repo.has_living_hero());

    repo.clear_game_state().expect("clear");
    assert!(!repo.save_path().exists());
    assert!(!repo.has_living_hero());
    repo.clear_game_state().expect("clearing twice is fine");
}

#[test]
fn corrupt_save_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = FileSaveRepository::new(dir.path()).expect("repository");
    std::fs::write(repo.save_path(), b"not json").expect("write");

    assert!(repo.restore_game_state().is_err());
    assert!(!repo.has_living_hero());
}

/// Continue picks up the hero where the save left them.
#[tokio::test]
async fn continue_restores_the_saved_scene() {
    let saves = InMemorySaveRepository::with_save(SavedGame {
        scene_index: 1,
        hero: saved_hero("NAME:Bea, HP:7, HP_MAX:9, STR:12", true),
    });
    let game = game_with_saves(
        two_scenes(),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Continue]),
        saves,
        RuntimeConfig::default(),
    );

    game.manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("start should succeed");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    let (scene, name, persistent) = game
        .manager
        .inspect(|s| (s.scene_index, s.world.hero().name(), s.persistent))
        .await;
    assert_eq!(scene, 1);
    assert_eq!(name, "Bea");
    assert!(persistent);
}

/// A save whose hero died cannot be continued; the game starts over and
/// the stale save is dropped.
#[tokio::test]
async fn dead_hero_save_starts_over() {
    let saves = InMemorySaveRepository::with_save(SavedGame {
        scene_index: 1,
        hero: saved_hero("NAME:Bea, HP:0", false),
    });
    let game = game_with_saves(
        two_scenes(),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Continue]),
        saves,
        RuntimeConfig::default(),
    );

    game.manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("start should succeed");

    let (scene, name, alive) = game
        .manager
        .inspect(|s| (s.scene_index, s.world.hero().name(), s.world.hero().alive))
        .await;
    assert_eq!(scene, 0);
    assert_eq!(name, "Ann");
    assert!(alive);
    assert_eq!(game.saves.restore_game_state().expect("readable"), None);
}

/// Leaving for the menu saves a persistent game but not a casual one.
#[tokio::test]
async fn only_persistent_games_are_saved() {
    let persistent = game(
        two_scenes(),
        ScriptedDialogs::new().with_menu([MainMenuChoice::NewGame]),
    );
    persistent
        .manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("start should succeed");
    persistent
        .manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("menu should be handled");
    let saved = persistent
        .saves
        .restore_game_state()
        .expect("readable")
        .expect("persistent game saved");
    assert_eq!(saved.scene_index, 0);
    assert_eq!(saved.hero.name(), "Ann");

    let casual = game(
        two_scenes(),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    casual
        .manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("start should succeed");
    casual
        .manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("menu should be handled");
    assert_eq!(casual.saves.restore_game_state().expect("readable"), None);
    assert_eq!(casual.manager.state().await, TurnState::WaitingToStart);
}
