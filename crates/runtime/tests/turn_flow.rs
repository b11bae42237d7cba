mod common;

use common::*;

use crawl_core::{ActorId, ActorRole, ActorTemplate, GridPoint, Interaction, MoveType};
use crawl_runtime::api::{DialogGate, MainMenuChoice, ScriptedDialogs};
use crawl_runtime::{
    EventDisposition, InMemorySaveRepository, RuntimeConfig, SaveRepository, TurnEvent, TurnState,
};

const EXIT: GridPoint = GridPoint::new(5, 1);

async fn start(game: &Game) {
    let disposition = game
        .manager
        .trigger(TurnEvent::MainMenu)
        .await
        .expect("start should succeed");
    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
}

/// Walks from the entrance to within one step of the exit.
async fn approach_exit(game: &Game) {
    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(4, 1)))
        .await
        .expect("move should be handled");
    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
}

/// Main menu to the first hero turn: the hero stands on the entrance and
/// the scene intro has been shown.
#[tokio::test]
async fn casual_game_starts_on_the_entrance() {
    let mut first = scene("Cellar", None, vec![]);
    first.intro = Some("It smells of damp.".into());
    let game = game(
        campaign(hero(HERO), vec![first]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );

    start(&game).await;

    let (position, routes) = game
        .manager
        .inspect(|s| (s.world.hero().position, s.hero_routes.len()))
        .await;
    assert_eq!(position, GridPoint::new(1, 1));
    assert!(routes > 0);
    assert!(
        game.dialogs
            .shown()
            .contains(&("Cellar".to_string(), "It smells of damp.".to_string()))
    );
}

#[tokio::test]
async fn events_before_the_menu_are_ignored() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![])]),
        ScriptedDialogs::new(),
    );

    game.manager
        .trigger(TurnEvent::ClickedExit(EXIT))
        .await
        .expect("event should be accepted");
    assert_eq!(game.manager.state().await, TurnState::WaitingToStart);
}

// ============================================================================
// Exits
// ============================================================================

#[tokio::test]
async fn locked_exit_keeps_the_hero_in_the_scene() {
    let game = game(
        campaign(
            hero(HERO),
            vec![
                scene("Cellar", Some("Brass key"), vec![]),
                scene("Crypt", None, vec![]),
            ],
        ),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;
    approach_exit(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedExit(EXIT))
        .await
        .expect("exit click should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    assert!(game.dialogs.was_shown("Locked"));
    let (scene, hero_at) = game
        .manager
        .inspect(|s| (s.scene_index, s.world.hero().position))
        .await;
    assert_eq!(scene, 0);
    assert_eq!(hero_at, GridPoint::new(4, 1));
}

/// The runtime itself refuses exits the hero cannot reach this turn.
#[tokio::test]
async fn distant_exit_is_out_of_reach() {
    let slow = hero("NAME:Ann, HIT_DICE:1D10, SPEED:10");
    let game = game(
        campaign(slow, vec![scene("Cellar", None, vec![]), scene("Crypt", None, vec![])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;
    assert!(game.manager.inspect(|s| s.reachable_doors()).await.is_empty());

    game.manager
        .trigger(TurnEvent::ClickedExit(EXIT))
        .await
        .expect("exit click should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    assert!(game.presenter.said("The exit is out of reach."));
    let (scene, hero_at) = game
        .manager
        .inspect(|s| (s.scene_index, s.world.hero().position))
        .await;
    assert_eq!(scene, 0);
    assert_eq!(hero_at, GridPoint::new(1, 1));
}

#[tokio::test]
async fn only_the_exit_tile_leaves_the_scene() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![]), scene("Crypt", None, vec![])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedExit(GridPoint::new(2, 1)))
        .await
        .expect("exit click should be handled");

    assert!(game.presenter.said("The exit is out of reach."));
    assert_eq!(game.manager.inspect(|s| s.scene_index).await, 0);
}

/// The key is consumed, the hero rests and the next scene begins.
#[tokio::test]
async fn key_opens_the_exit_to_the_next_scene() {
    let carrier = hero(HERO).with_artefact("NAME:Brass key, KIND:KEY");
    let game = game(
        campaign(
            carrier,
            vec![
                scene("Cellar", Some("brass key"), vec![]),
                scene("Crypt", None, vec![]),
            ],
        ),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;
    approach_exit(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedExit(EXIT))
        .await
        .expect("exit click should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    assert!(game.dialogs.was_shown("Rest"));
    assert!(
        game.presenter
            .routes()
            .iter()
            .any(|(id, route)| *id == ActorId::HERO && route.last() == Some(&EXIT))
    );
    let (scene, keys) = game
        .manager
        .inspect(|s| {
            let keys = s.world.hero().store.as_ref().map_or(0, |st| st.len());
            (s.scene_index, keys)
        })
        .await;
    assert_eq!(scene, 1);
    assert_eq!(keys, 0);
    let hero_at = game.manager.inspect(|s| s.world.hero().position).await;
    assert_eq!(hero_at, GridPoint::new(1, 1));
}

/// Leaving the last scene completes the campaign and returns to the menu,
/// which quits once the scripted answers run out.
#[tokio::test]
async fn last_exit_completes_the_campaign() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;
    approach_exit(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedExit(EXIT))
        .await
        .expect("exit click should be handled");

    assert!(game.dialogs.was_shown("Congratulations"));
    assert_eq!(game.manager.state().await, TurnState::WaitingToStart);
}

#[tokio::test]
async fn entrance_is_always_barred() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedEntrance(GridPoint::new(1, 1)))
        .await
        .expect("entrance click should be handled");

    assert!(game.dialogs.was_shown("Entrance"));
    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
}

// ============================================================================
// Input latch
// ============================================================================

/// A second event arriving while the first still waits on a dialog is
/// dropped, not queued.
#[tokio::test]
async fn events_during_a_dialog_are_dropped() {
    let gate = DialogGate::default();
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![])]),
        ScriptedDialogs::new()
            .with_menu([MainMenuChoice::Casual])
            .with_gate(gate.clone()),
    );
    start(&game).await;

    let manager = game.manager.clone();
    let first = tokio::spawn(async move {
        manager
            .trigger(TurnEvent::ClickedEntrance(GridPoint::new(1, 1)))
            .await
    });
    gate.entered.notified().await;
    assert!(game.manager.is_busy());

    let second = game
        .manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(2, 1)))
        .await
        .expect("dropped events are not errors");
    assert_eq!(second, EventDisposition::Ignored);

    gate.release.notify_one();
    let first = first
        .await
        .expect("task should not panic")
        .expect("first event should succeed");
    assert_eq!(first, EventDisposition::Handled);
    assert!(!game.manager.is_busy());
    let hero_at = game.manager.inspect(|s| s.world.hero().position).await;
    assert_eq!(hero_at, GridPoint::new(1, 1));
}

// ============================================================================
// Movement and engagement
// ============================================================================

fn rat() -> ActorTemplate {
    ActorTemplate::new(ActorRole::Enemy, "NAME:Rat, HP:50, SPEED:30").at(GridPoint::new(3, 1))
}

/// The hero steps off the entrance and the hunting rat closes in onto the
/// hero's tile, which makes the next hero turn an interacting one.
#[tokio::test]
async fn hunters_engage_the_hero() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![rat()])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(1, 2)))
        .await
        .expect("move should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnInteracting);
    let (hero_at, rat_at) = game
        .manager
        .inspect(|s| {
            (
                s.world.hero().position,
                s.world.actor(ActorId(1)).map(|a| a.position),
            )
        })
        .await;
    assert_eq!(hero_at, GridPoint::new(1, 2));
    assert_eq!(rat_at, Some(hero_at));
    assert!(
        game.presenter
            .routes()
            .iter()
            .any(|(id, _)| *id == ActorId(1))
    );
}

/// Backing off a fight within the disengage radius ends the fight without
/// a computer turn, and hunters hold back on the one that follows.
#[tokio::test]
async fn disengaging_holds_hunters_back() {
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![rat()])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;
    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(1, 2)))
        .await
        .expect("move should be handled");
    assert_eq!(game.manager.state().await, TurnState::HeroTurnInteracting);

    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(2, 2)))
        .await
        .expect("retreat should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    let (rat_at, disengaging) = game
        .manager
        .inspect(|s| (s.world.actor(ActorId(1)).map(|a| a.position), s.hero_disengaging))
        .await;
    assert_eq!(rat_at, Some(GridPoint::new(1, 2)));
    assert!(disengaging);
    assert!(game.presenter.said("You break away from the fight."));

    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(3, 2)))
        .await
        .expect("move should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    let (rat_at, disengaging) = game
        .manager
        .inspect(|s| (s.world.actor(ActorId(1)).map(|a| a.position), s.hero_disengaging))
        .await;
    assert_eq!(rat_at, Some(GridPoint::new(1, 2)));
    assert!(!disengaging);
}

/// Mimics copy the hero whenever they get to move, even if they stay put.
#[tokio::test]
async fn mimics_outgrow_the_hero() {
    let mimic = ActorTemplate::new(ActorRole::Enemy, "NAME:Chest, STR:3, MIMIC").at(GridPoint::new(5, 2));
    let game = game(
        campaign(hero(HERO), vec![scene("Cellar", None, vec![mimic])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::ClickedFreeGround(GridPoint::new(1, 2)))
        .await
        .expect("move should be handled");

    let (strength, exp) = game
        .manager
        .inspect(|s| {
            let chest = s.world.actor(ActorId(1)).expect("mimic exists");
            (chest.traits.get_int("STR"), chest.traits.get_int("EXP"))
        })
        .await;
    assert_eq!(strength, 21);
    assert_eq!(exp, 1);
}

/// Organic wanderers split as they move, up to the configured population.
/// The hero stays on the entrance and passes turns by nibbling at food.
#[tokio::test]
async fn organic_population_is_capped() {
    let slime = ActorTemplate::new(ActorRole::Enemy, "NAME:Slime, ORGANIC, SPEED:10")
        .at(GridPoint::new(4, 2))
        .with_movement(MoveType::Wander);
    let nibbler = hero(HERO).with_artefact("NAME:Bread, KIND:CONSUMABLE, TYPE:FOOD, HP_GAIN:3");
    let config = RuntimeConfig {
        max_organic_population: 2,
        ..RuntimeConfig::default()
    };
    let game = game_with_saves(
        campaign(nibbler, vec![scene("Cellar", None, vec![slime])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
        InMemorySaveRepository::new(),
        config,
    );
    start(&game).await;

    for _ in 0..3 {
        game.manager
            .trigger(TurnEvent::UseArtefact(0))
            .await
            .expect("eating should be handled");
        assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    }

    let (population, clones_still) = game
        .manager
        .inspect(|s| {
            let population = s.world.organic_population();
            let still = s
                .world
                .actors()
                .iter()
                .skip(2)
                .all(|a| a.movement == MoveType::Still && a.store.is_none());
            (population, still)
        })
        .await;
    assert_eq!(population, 2);
    assert!(clones_still);
}

/// An organic poisoner hurts whoever shares its tile during the computer turn.
#[tokio::test]
async fn organic_actors_act_on_their_tile() {
    let mut ooze = ActorTemplate::new(ActorRole::Enemy, "NAME:Ooze, ORGANIC, DC:30, DMG:5")
        .at(GridPoint::new(4, 2))
        .with_movement(MoveType::Still);
    ooze.interaction = Some(Interaction::Poison);
    let rat = ActorTemplate::new(ActorRole::Enemy, "NAME:Rat, HP:50")
        .at(GridPoint::new(4, 2))
        .with_movement(MoveType::Still);
    let nibbler = hero(HERO).with_artefact("NAME:Bread, KIND:CONSUMABLE, TYPE:FOOD, HP_GAIN:3");
    let game = game(
        campaign(nibbler, vec![scene("Cellar", None, vec![ooze, rat])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::Casual]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::UseArtefact(0))
        .await
        .expect("eating should be handled");

    assert_eq!(game.manager.state().await, TurnState::HeroTurnIdle);
    let (rat_hp, ooze_hp, hero_hp) = game
        .manager
        .inspect(|s| {
            (
                s.world.actor(ActorId(2)).map(|a| a.hit_points()),
                s.world.actor(ActorId(1)).map(|a| a.hit_points()),
                s.world.hero().hit_points(),
            )
        })
        .await;
    assert_eq!(rat_hp, Some(45));
    assert_eq!(hero_hp, 10);
    assert!(ooze_hp.is_some());
    assert!(game.presenter.said("Rat is poisoned for 5 damage."));
}

// ============================================================================
// Death
// ============================================================================

/// A poisoner sharing the hero's tile strikes once the hero acts; a fatal
/// dose ends the game and the dead hero's save cannot be continued.
#[tokio::test]
async fn fatal_poison_ends_the_game() {
    let mut spider = ActorTemplate::new(ActorRole::Enemy, "NAME:Spider, DC:30, DMG:5")
        .at(GridPoint::new(1, 1))
        .with_movement(MoveType::Still);
    spider.interaction = Some(Interaction::Poison);
    let snacker = hero(&format!("{HERO}, HP:1"))
        .with_artefact("NAME:Bread, KIND:CONSUMABLE, TYPE:FOOD, HP_GAIN:1");
    let game = game(
        campaign(snacker, vec![scene("Cellar", None, vec![spider])]),
        ScriptedDialogs::new().with_menu([MainMenuChoice::NewGame]),
    );
    start(&game).await;

    game.manager
        .trigger(TurnEvent::UseArtefact(0))
        .await
        .expect("eating should be handled");

    assert!(game.dialogs.was_shown("Game over"));
    assert_eq!(game.manager.state().await, TurnState::WaitingToStart);
    let saved = game
        .saves
        .restore_game_state()
        .expect("save should be readable")
        .expect("game over is saved");
    assert!(!saved.hero.alive);
    assert!(!game.saves.has_living_hero());
}
