//! The console command loop.
//!
//! # Architecture
//!
//! ```text
//! ConsoleApp
//!   ├─→ ConsoleInput   (commands, and dialog answers while a turn runs)
//!   └─→ TurnManager    (owns the session; calls back into the console
//!                       dialogs and presenter)
//! ```
//!
//! Commands become [`TurnEvent`]s here, the way a pointer click would on a
//! graphical board.

use std::sync::Arc;

use anyhow::{Result, anyhow};

use crawl_core::{Campaign, GridPoint};
use crawl_runtime::{
    Collaborators, FileSaveRepository, GameSession, InMemorySaveRepository, SaveRepository, Tile,
    TileMap, TurnEvent, TurnManager, TurnState,
};

use crate::command::{Command, HELP};
use crate::config::ClientConfig;
use crate::console::{ConsoleDialogs, ConsoleInput, ConsolePresenter};

pub struct ConsoleApp {
    manager: Arc<TurnManager>,
    input: Arc<ConsoleInput>,
}

/// What a click on a tile amounts to.
enum Click {
    Event(TurnEvent),
    Refused(&'static str),
}

impl ConsoleApp {
    /// Wires the console collaborators and the save repository into a new
    /// turn manager for `campaign`.
    pub fn build(campaign: Campaign, config: &ClientConfig, input: Arc<ConsoleInput>) -> Result<Self> {
        let persistence: Arc<dyn SaveRepository> = if config.runtime.enable_persistence {
            let repo = match &config.runtime.save_data_dir {
                Some(dir) => FileSaveRepository::new(dir)?,
                None => FileSaveRepository::in_platform_dir()?,
            };
            tracing::info!("Saving to {}", repo.save_path().display());
            Arc::new(repo)
        } else {
            tracing::info!("Persistence disabled, saves are kept in memory");
            Arc::new(InMemorySaveRepository::new())
        };

        let io = Collaborators::new(
            Arc::new(ConsoleDialogs::new(input.clone())),
            Arc::new(ConsolePresenter::new(config.show_sounds)),
            persistence,
        );
        let session = GameSession::new(campaign, config.runtime.clone())?;
        Ok(Self {
            manager: Arc::new(TurnManager::new(session, io)),
            input,
        })
    }

    pub fn manager(&self) -> &Arc<TurnManager> {
        &self.manager
    }

    /// Runs until the player quits from the main menu, types `quit`, or the
    /// input ends.
    pub async fn run(&self) -> Result<()> {
        self.trigger(TurnEvent::MainMenu).await?;

        loop {
            let state = self.manager.state().await;
            if state == TurnState::WaitingToStart {
                break;
            }
            if !state.is_hero_turn() {
                return Err(anyhow!("turn stopped in {state} waiting for input"));
            }

            self.render().await;
            let Some(line) = self.input.read_line("> ").await? else {
                break;
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    println!("{e}. Type 'help' for the commands.");
                    continue;
                }
            };

            match command {
                Command::Click(point) => self.click(point).await?,
                Command::Step(dx, dy) => {
                    let hero_at = self.manager.inspect(|s| s.world.hero().position).await;
                    self.click(hero_at.offset(dx, dy)).await?;
                }
                Command::Use(slot) => self.trigger(TurnEvent::UseArtefact(slot)).await?,
                Command::Equip(slot) => self.trigger(TurnEvent::ToggleEquip(slot)).await?,
                Command::Inventory => self.inventory().await,
                Command::Look => {}
                Command::Menu => self.trigger(TurnEvent::MainMenu).await?,
                Command::Help => println!("{HELP}"),
                Command::Quit => break,
            }
        }

        tracing::info!("Console loop finished");
        Ok(())
    }

    async fn trigger(&self, event: TurnEvent) -> Result<()> {
        self.manager.trigger(event).await.map_err(|e| {
            tracing::error!(%event, "turn failed: {}", e);
            anyhow!("turn failed on {event}: {e}")
        })?;
        Ok(())
    }

    async fn click(&self, point: GridPoint) -> Result<()> {
        let click = self
            .manager
            .inspect(|session| match session.map().map(|m| m.tile(point)) {
                Ok(Some(Tile::Exit)) => Click::Event(TurnEvent::ClickedExit(point)),
                Ok(Some(Tile::Entrance)) => Click::Event(TurnEvent::ClickedEntrance(point)),
                Ok(Some(Tile::Floor)) => Click::Event(TurnEvent::ClickedFreeGround(point)),
                Ok(Some(Tile::Wall)) => Click::Refused("That is solid rock."),
                Ok(None) => Click::Refused("That is off the map."),
                Err(_) => Click::Refused("There is no scene loaded."),
            })
            .await;

        match click {
            Click::Event(event) => self.trigger(event).await,
            Click::Refused(reason) => {
                println!("{reason}");
                Ok(())
            }
        }
    }

    async fn render(&self) {
        let screen = self
            .manager
            .inspect(|session| {
                let hero = session.world.hero();
                let scene = session
                    .current_scene()
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                let purse = hero.store.as_ref().map_or(0, |s| s.money());
                format!(
                    "\n{scene}\n{}\n{}  HP {}/{}  AC {}  {} SP  at {}",
                    session.render().unwrap_or_default(),
                    hero.name(),
                    hero.hit_points(),
                    hero.traits.get_int("HP_MAX"),
                    hero.traits.armour_class(),
                    purse,
                    hero.position,
                )
            })
            .await;
        println!("{screen}");
    }

    async fn inventory(&self) {
        let listing = self
            .manager
            .inspect(|session| {
                let Some(store) = session.world.hero().store.as_ref() else {
                    return "You carry nothing.".to_string();
                };
                let mut lines = vec![format!(
                    "{} SP, {}/{} slots used",
                    store.money(),
                    store.len(),
                    store.capacity()
                )];
                for (slot, item) in store.artefacts().iter().enumerate() {
                    let mark = if item.equipped { " (equipped)" } else { "" };
                    lines.push(format!("  {slot:>2} {}{mark}", item.name()));
                }
                lines.join("\n")
            })
            .await;
        println!("{listing}");
    }
}
