//! Buying, selling and swapping places with traders.

use crawl_core::state::purchase;
use crawl_core::{ActorId, StoreError};

use crate::api::{Collaborators, Result, SoundCue, TradeOrder};
use crate::session::GameSession;

const TRADE: usize = 0;
const SWAP: usize = 1;

pub(super) async fn trade(
    session: &mut GameSession,
    io: &Collaborators,
    trader: ActorId,
    customer: ActorId,
) -> Result<()> {
    let trader_name = session.world.try_actor(trader)?.name();
    let choices = vec!["Trade".to_string(), "Swap places".to_string()];
    let choice = io
        .dialogs
        .show_choice_dialog(&trader_name, "What would you like to do?", &choices)
        .await?;

    match choice {
        TRADE => {
            let order = {
                let (t, c) = session.world.pair_mut(trader, customer).ok_or(
                    crawl_core::WorldError::ActorNotFound(trader),
                )?;
                // Both sides get a store so the dialog can list them.
                t.store_mut();
                c.store_mut();
                io.dialogs.show_trade_dialog(c, t).await?
            };
            settle(session, io, trader, customer, order).await
        }
        SWAP => {
            let (t, c) = session
                .world
                .pair_mut(trader, customer)
                .ok_or(crawl_core::WorldError::ActorNotFound(trader))?;
            std::mem::swap(&mut t.position, &mut c.position);
            io.presenter
                .notify(&format!("You swap places with {trader_name}."))
                .await
        }
        other => {
            tracing::warn!(choice = other, "trade dialog returned an unknown choice");
            Ok(())
        }
    }
}

/// Applies an order: purchases first, then sales.
///
/// Slots are processed from the highest down so earlier removals never shift
/// the ones still to come. A failed line is reported and skipped.
async fn settle(
    session: &mut GameSession,
    io: &Collaborators,
    trader: ActorId,
    customer: ActorId,
    order: TradeOrder,
) -> Result<()> {
    if order.is_empty() {
        return Ok(());
    }

    let mut buys = order.buy;
    buys.sort_unstable_by(|a, b| b.cmp(a));
    buys.dedup();
    let mut sells = order.sell;
    sells.sort_unstable_by(|a, b| b.cmp(a));
    sells.dedup();

    let mut failures: Vec<String> = Vec::new();
    let mut traded = 0usize;
    {
        let (t, c) = session
            .world
            .pair_mut(trader, customer)
            .ok_or(crawl_core::WorldError::ActorNotFound(trader))?;
        let trader_name = t.name();

        for slot in buys {
            let (buyer, seller) = (c.store_mut(), t.store_mut());
            match purchase(buyer, seller, slot) {
                Ok(artefact) => {
                    traded += 1;
                    tracing::info!(item = %artefact.name(), price = artefact.value(), "bought");
                }
                Err(e) => failures.push(describe_failure(&e, "You")),
            }
        }
        for slot in sells {
            let (buyer, seller) = (t.store_mut(), c.store_mut());
            match purchase(buyer, seller, slot) {
                Ok(artefact) => {
                    traded += 1;
                    tracing::info!(item = %artefact.name(), price = artefact.value(), "sold");
                }
                Err(e) => failures.push(describe_failure(&e, &trader_name)),
            }
        }

        // Sold equipment stops counting.
        c.refresh_equipment();
    }

    if traded > 0 {
        io.presenter.play_sound(SoundCue::Trade).await?;
    }
    if !failures.is_empty() {
        io.dialogs
            .show_ok_dialog("Trade", &failures.join("\n"))
            .await?;
    }
    Ok(())
}

fn describe_failure(error: &StoreError, buyer: &str) -> String {
    match error {
        StoreError::InsufficientFunds { price, available } => {
            format!("{buyer} cannot afford {price} SP with {available} SP.")
        }
        StoreError::StoreFull { .. } => format!("{buyer} cannot carry any more."),
        other => other.to_string(),
    }
}
