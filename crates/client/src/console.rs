//! Console implementations of the runtime collaborators.
//!
//! # Architecture
//!
//! [`ConsoleInput`] owns the input stream. The command loop and
//! [`ConsoleDialogs`] share it; the loop never reads while a turn is being
//! handled, so a dialog always gets the next line typed.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crawl_core::{Actor, ActorId, Artefact, GridPoint};
use crawl_runtime::api::{Result as RuntimeResult, RuntimeError};
use crawl_runtime::{ArtefactChoice, Dialogs, MainMenuChoice, Presenter, SoundCue, TradeOrder};

type LineSource = Box<dyn AsyncBufRead + Unpin + Send>;

/// Line-oriented player input.
pub struct ConsoleInput {
    source: Mutex<LineSource>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        Self {
            source: Mutex::new(Box::new(reader)),
        }
    }

    /// Prints `prompt` and reads one trimmed line; `None` once input ends.
    pub async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut source = self.source.lock().await;
        let mut line = String::new();
        if source.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Parses space or comma separated slot numbers. Unparseable words are skipped.
pub fn parse_slots(line: &str) -> Vec<usize> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|word| word.parse().ok())
        .collect()
}

fn describe_items(artefacts: &[Artefact]) -> String {
    if artefacts.is_empty() {
        return "  (nothing)\n".to_string();
    }
    artefacts
        .iter()
        .enumerate()
        .map(|(slot, a)| {
            let mark = if a.equipped { "*" } else { " " };
            format!("  {slot:>2}{mark} {} ({} SP)\n", a.name(), a.value())
        })
        .collect()
}

/// Dialogs answered by typing at the console.
pub struct ConsoleDialogs {
    input: Arc<ConsoleInput>,
}

impl ConsoleDialogs {
    pub fn new(input: Arc<ConsoleInput>) -> Self {
        Self { input }
    }

    async fn line(&self, prompt: &str) -> RuntimeResult<String> {
        self.input
            .read_line(prompt)
            .await
            .map_err(|e| RuntimeError::Dialog(e.to_string()))?
            .ok_or_else(|| RuntimeError::Dialog("input closed".into()))
    }

    /// Asks until the answer is a number in `1..=count`; returns it zero-based.
    async fn pick(&self, count: usize) -> RuntimeResult<usize> {
        loop {
            let answer = self.line("> ").await?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
                _ => println!("Pick a number from 1 to {count}."),
            }
        }
    }
}

#[async_trait]
impl Dialogs for ConsoleDialogs {
    async fn show_choice_dialog(&self, title: &str, message: &str, choices: &[String]) -> RuntimeResult<usize> {
        println!("\n== {title} ==\n{message}");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }
        if choices.is_empty() {
            return Ok(0);
        }
        self.pick(choices.len()).await
    }

    async fn show_ok_dialog(&self, title: &str, message: &str) -> RuntimeResult<()> {
        println!("\n== {title} ==\n{message}");
        self.line("[enter] ").await?;
        Ok(())
    }

    async fn show_main_menu(&self, can_continue: bool) -> RuntimeResult<MainMenuChoice> {
        let mut options = Vec::new();
        if can_continue {
            options.push(MainMenuChoice::Continue);
        }
        options.extend([MainMenuChoice::NewGame, MainMenuChoice::Casual, MainMenuChoice::Quit]);

        println!("\n== Main menu ==");
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }
        match self.input.read_line("> ").await {
            Ok(Some(answer)) => Ok(answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i).copied())
                .unwrap_or(options[0])),
            Ok(None) => Ok(MainMenuChoice::Quit),
            Err(e) => Err(RuntimeError::Dialog(e.to_string())),
        }
    }

    async fn show_artefact_dialog(&self, title: &str, artefact: &Artefact) -> RuntimeResult<ArtefactChoice> {
        println!("\n== {title} ==\nYou find: {}", artefact.name());
        if let Some(description) = artefact.traits.get_text("DESCRIPTION") {
            println!("{description}");
        }
        let answer = self.line("Take it? [y/n] ").await?;
        if answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") {
            Ok(ArtefactChoice::Leave)
        } else {
            Ok(ArtefactChoice::Take)
        }
    }

    async fn show_pillage_dialog(&self, corpse: &Actor, free_space: usize) -> RuntimeResult<Vec<usize>> {
        let held = corpse.store.as_ref().map(|s| s.artefacts()).unwrap_or_default();
        println!("\n== {} ==\n{}", corpse.name(), describe_items(held));
        println!("You can carry {free_space} more.");
        let answer = self.line("Take which slots? ('all', or numbers) ").await?;
        if answer.eq_ignore_ascii_case("all") {
            return Ok((0..held.len()).collect());
        }
        Ok(parse_slots(&answer)
            .into_iter()
            .filter(|slot| *slot < held.len())
            .collect())
    }

    async fn show_trade_dialog(&self, hero: &Actor, trader: &Actor) -> RuntimeResult<TradeOrder> {
        let wares = trader.store.as_ref().map(|s| s.artefacts()).unwrap_or_default();
        let pack = hero.store.as_ref().map(|s| s.artefacts()).unwrap_or_default();
        let purse = hero.store.as_ref().map_or(0, |s| s.money());

        println!("\n== Trading with {} ==", trader.name());
        println!("For sale:\n{}", describe_items(wares));
        println!("Your pack ({purse} SP):\n{}", describe_items(pack));
        let buy = parse_slots(&self.line("Buy which slots? ").await?);
        let sell = parse_slots(&self.line("Sell which slots? ").await?);
        Ok(TradeOrder { buy, sell })
    }

    async fn show_actor_details_dialog(&self, actor: &Actor) -> RuntimeResult<()> {
        println!("\n== {} ==", actor.name());
        if actor.alive {
            println!(
                "HP {}  AC {}",
                actor.hit_points(),
                actor.traits.armour_class()
            );
        } else {
            println!("Dead.");
        }
        for (key, value) in actor.traits.visible_traits() {
            if key != "NAME" {
                println!("  {key}: {value}");
            }
        }
        self.line("[enter] ").await?;
        Ok(())
    }

    async fn show_rest_dialog(&self, hero: &Actor, next_scene: &str) -> RuntimeResult<()> {
        println!(
            "\n== Rest ==\n{} rests before heading on to {next_scene}.",
            hero.name()
        );
        self.line("[enter] ").await?;
        Ok(())
    }
}

/// Prints what happens on the board.
pub struct ConsolePresenter {
    show_sounds: bool,
}

impl ConsolePresenter {
    pub fn new(show_sounds: bool) -> Self {
        Self { show_sounds }
    }
}

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn play_sound(&self, cue: SoundCue) -> RuntimeResult<()> {
        if self.show_sounds {
            println!("  *{cue}*");
        }
        Ok(())
    }

    async fn animate_attack(&self, attacker: ActorId, from: GridPoint, to: GridPoint) -> RuntimeResult<()> {
        tracing::debug!(%attacker, %from, %to, "attack");
        Ok(())
    }

    async fn replay_route(&self, actor: ActorId, route: &[GridPoint]) -> RuntimeResult<()> {
        tracing::debug!(%actor, steps = route.len(), "route replayed");
        Ok(())
    }

    async fn notify(&self, message: &str) -> RuntimeResult<()> {
        println!("{message}");
        Ok(())
    }
}
