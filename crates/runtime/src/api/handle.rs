//! Cloneable façade for issuing commands to one arena worker.
//!
//! [`ArenaHandle`] hides channel plumbing; every method sends one
//! [`Command`] and awaits the worker's reply.
use std::collections::BTreeMap;

use tokio::sync::{mpsc, oneshot};

use arena_core::{
    Arena, ArenaId, GameKind, GameView, PlayerAddress, SettleTrigger, Settlement, Submission,
    SubmissionReceipt,
};

use super::errors::{ArenaError, Result};
use crate::repository::ArenaRecord;
use crate::workers::Command;

#[derive(Clone)]
pub struct ArenaHandle {
    id: ArenaId,
    kind: GameKind,
    command_tx: mpsc::Sender<Command>,
}

impl ArenaHandle {
    pub(crate) fn new(id: ArenaId, kind: GameKind, command_tx: mpsc::Sender<Command>) -> Self {
        Self {
            id,
            kind,
            command_tx,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| ArenaError::CommandChannelClosed)?;

        reply_rx.await.map_err(ArenaError::ReplyChannelClosed)
    }

    pub async fn join(&self, player: PlayerAddress, now: i64) -> Result<Arena> {
        self.request(|reply| Command::Join { player, now, reply })
            .await?
    }

    pub async fn start(&self, now: i64) -> Result<Arena> {
        self.request(|reply| Command::Start { now, reply }).await?
    }

    pub async fn submit(
        &self,
        player: PlayerAddress,
        submission: Submission,
        now: i64,
    ) -> Result<SubmissionReceipt> {
        self.request(|reply| Command::Submit {
            player,
            submission,
            now,
            reply,
        })
        .await?
    }

    pub async fn resolve(&self, outcome: String) -> Result<String> {
        self.request(|reply| Command::Resolve { outcome, reply })
            .await?
    }

    /// Returns the new prices, or `None` if the arena is not a running trading arena.
    pub async fn tick_prices(&self) -> Result<Option<BTreeMap<String, u64>>> {
        self.request(|reply| Command::TickPrices { reply }).await
    }

    pub async fn settle(&self, trigger: SettleTrigger, now: i64) -> Result<Settlement> {
        self.request(|reply| Command::Settle {
            trigger,
            now,
            reply,
        })
        .await?
    }

    pub async fn record(&self) -> Result<ArenaRecord> {
        self.request(|reply| Command::Query { reply }).await
    }

    pub async fn arena(&self) -> Result<Arena> {
        Ok(self.record().await?.arena)
    }

    pub async fn view(&self, player: PlayerAddress) -> Result<GameView> {
        self.request(|reply| Command::View { player, reply })
            .await?
    }

    pub async fn prices(&self) -> Result<BTreeMap<String, u64>> {
        self.request(|reply| Command::Prices { reply }).await?
    }

    pub async fn retry_payout(&self) -> Result<bool> {
        self.request(|reply| Command::RetryPayout { reply }).await
    }
}
