//! Arena worker that owns one authoritative [`ArenaRecord`].
//!
//! Every operation on an arena is a [`Command`] processed in arrival order,
//! so joins, submissions, and settlement of the same arena never interleave.
//! Different arenas run on different workers and never contend.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use arena_core::{
    Arena, ArenaStatus, GameConfig, GameEngine, GameKind, GameView, Judgement, KindState,
    LifecycleError, PlayerAddress, RngOracle, SettleTrigger, Settlement, Submission, SubmissionReceipt,
};

use crate::api::{ArenaError, GenerateRequest, Payout, Result};
use crate::events::{
    Event, EventBus, LifecycleEvent, MarketEvent, SettlementEvent, SubmissionEvent,
};
use crate::oracle::PayloadOracle;
use crate::repository::{ArenaRecord, ArenaRepository};
use crate::settlement::{SettlementCoordinator, SettlementPhase};

use super::EngineMetrics;

/// Commands that can be sent to an arena worker
pub enum Command {
    Join {
        player: PlayerAddress,
        now: i64,
        reply: oneshot::Sender<Result<Arena>>,
    },
    Start {
        now: i64,
        reply: oneshot::Sender<Result<Arena>>,
    },
    Submit {
        player: PlayerAddress,
        submission: Submission,
        now: i64,
        reply: oneshot::Sender<Result<SubmissionReceipt>>,
    },
    /// Inject the real-world outcome of a prediction arena.
    Resolve {
        outcome: String,
        reply: oneshot::Sender<Result<String>>,
    },
    /// Move trading prices one tick. Replies `None` when nothing moved.
    TickPrices {
        reply: oneshot::Sender<Option<BTreeMap<String, u64>>>,
    },
    /// Settle the arena; idempotent.
    Settle {
        trigger: SettleTrigger,
        now: i64,
        reply: oneshot::Sender<Result<Settlement>>,
    },
    /// Query the full record (read-only).
    Query { reply: oneshot::Sender<ArenaRecord> },
    View {
        player: PlayerAddress,
        reply: oneshot::Sender<Result<GameView>>,
    },
    Prices {
        reply: oneshot::Sender<Result<BTreeMap<String, u64>>>,
    },
    /// Re-send an undelivered payout. Replies whether it is now delivered.
    RetryPayout { reply: oneshot::Sender<bool> },
}

/// Dependencies shared by every arena worker.
#[derive(Clone)]
pub struct WorkerContext {
    pub config: GameConfig,
    /// Start automatically once `min_players` have joined.
    pub auto_start: bool,
    pub repository: Arc<dyn ArenaRepository>,
    pub oracle: Arc<PayloadOracle>,
    pub settlement: Arc<SettlementCoordinator>,
    pub rng: Arc<dyn RngOracle>,
    pub event_bus: EventBus,
    pub metrics: Arc<EngineMetrics>,
}

impl WorkerContext {
    /// Persists `record`. Failures are logged, never surfaced: the in-memory
    /// record stays authoritative and the next mutation retries the write.
    pub fn persist(&self, record: &ArenaRecord) {
        if let Err(e) = self.repository.save(record) {
            error!(arena = %record.id(), error = %e, "failed to persist arena record");
        }
    }
}

/// Background task that processes commands for a single arena.
pub struct ArenaWorker {
    record: ArenaRecord,
    phase: SettlementPhase,
    ctx: WorkerContext,
    command_rx: mpsc::Receiver<Command>,
}

impl ArenaWorker {
    pub fn new(record: ArenaRecord, ctx: WorkerContext, command_rx: mpsc::Receiver<Command>) -> Self {
        let phase = if record.arena.settlement.is_some() {
            SettlementPhase::Settled
        } else {
            SettlementPhase::Pending
        };
        debug!(arena = %record.id(), status = %record.arena.status, %phase, "arena worker initialized");

        Self {
            record,
            phase,
            ctx,
            command_rx,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        debug!(arena = %self.record.id(), "arena worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Join { player, now, reply } => {
                let result = self.handle_join(player, now).await;
                if reply.send(result).is_err() {
                    debug!("Join reply channel closed (caller dropped)");
                }
            }
            Command::Start { now, reply } => {
                let result = self.handle_start(now).await.map(|()| self.record.arena.clone());
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Submit {
                player,
                submission,
                now,
                reply,
            } => {
                let result = self.handle_submit(player, submission, now);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::Resolve { outcome, reply } => {
                let result = self.handle_resolve(&outcome);
                if reply.send(result).is_err() {
                    debug!("Resolve reply channel closed (caller dropped)");
                }
            }
            Command::TickPrices { reply } => {
                let result = self.handle_tick();
                if reply.send(result).is_err() {
                    debug!("TickPrices reply channel closed (caller dropped)");
                }
            }
            Command::Settle {
                trigger,
                now,
                reply,
            } => {
                let result = self.handle_settle(trigger, now).await;
                if reply.send(result).is_err() {
                    debug!("Settle reply channel closed (caller dropped)");
                }
            }
            Command::Query { reply } => {
                if reply.send(self.record.clone()).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
            }
            Command::View { player, reply } => {
                if reply.send(self.handle_view(&player)).is_err() {
                    debug!("View reply channel closed (caller dropped)");
                }
            }
            Command::Prices { reply } => {
                if reply.send(self.handle_prices()).is_err() {
                    debug!("Prices reply channel closed (caller dropped)");
                }
            }
            Command::RetryPayout { reply } => {
                let delivered = self.deliver_payout().await;
                if reply.send(delivered).is_err() {
                    debug!("RetryPayout reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn handle_join(&mut self, player: PlayerAddress, now: i64) -> Result<Arena> {
        let arena_id = self.record.id();
        let join_order = self.record.arena.admit(player.clone(), now)?.join_order;

        self.ctx.persist(&self.record);
        info!(arena = %arena_id, %player, join_order, "player joined");
        self.ctx
            .event_bus
            .publish(Event::Lifecycle(LifecycleEvent::PlayerJoined {
                arena_id,
                player,
                join_order,
            }));

        if self.ctx.auto_start && self.record.arena.player_count() >= self.record.arena.min_players {
            self.handle_start(now).await?;
        }
        Ok(self.record.arena.clone())
    }

    /// Fetches a payload, builds game state, and moves the arena to InProgress.
    async fn handle_start(&mut self, now: i64) -> Result<()> {
        self.record.arena.ensure_startable()?;

        let arena_id = self.record.id();
        let kind = self.record.arena.kind;
        let roster = self.record.arena.players();

        let sourced = self
            .ctx
            .oracle
            .payload_for(&GenerateRequest::new(kind, self.record.arena.player_count()))
            .await;
        let game = match GameEngine::initialize(
            sourced.payload,
            &roster,
            &self.ctx.config,
            now,
            sourced.fallback,
        ) {
            Ok(game) => game,
            Err(e) => {
                warn!(arena = %arena_id, error = %e, "payload rejected at start, using fallback");
                let fallback = self.ctx.oracle.fallback_for(kind);
                GameEngine::initialize(fallback.payload, &roster, &self.ctx.config, now, true)?
            }
        };
        let fallback_payload = game.fallback_payload;

        self.record.arena.begin(now)?;
        self.record.game = Some(game);
        self.ctx.persist(&self.record);

        info!(arena = %arena_id, %kind, players = roster.len(), fallback_payload, "arena started");
        self.ctx
            .event_bus
            .publish(Event::Lifecycle(LifecycleEvent::Started {
                arena_id,
                players: roster.len() as u32,
                fallback_payload,
            }));
        Ok(())
    }

    fn handle_submit(
        &mut self,
        player: PlayerAddress,
        submission: Submission,
        now: i64,
    ) -> Result<SubmissionReceipt> {
        let arena_id = self.record.id();
        let result = self.apply_submission(&player, submission, now);
        self.ctx.metrics.record_submission(result.is_ok());

        match &result {
            Ok(receipt) => {
                self.ctx.persist(&self.record);
                let nonce = self.record.game.as_ref().map_or(0, |g| g.nonce);
                debug!(arena = %arena_id, %player, nonce, "submission accepted");
                self.ctx
                    .event_bus
                    .publish(Event::Submission(SubmissionEvent::Accepted {
                        arena_id,
                        player,
                        nonce,
                        receipt: receipt.clone(),
                    }));
            }
            Err(e) => {
                debug!(arena = %arena_id, %player, error = %e, "submission rejected");
                self.ctx
                    .event_bus
                    .publish(Event::Submission(SubmissionEvent::Rejected {
                        arena_id,
                        player,
                        kind: e.kind(),
                        reason: e.to_string(),
                    }));
            }
        }
        result
    }

    fn apply_submission(
        &mut self,
        player: &PlayerAddress,
        submission: Submission,
        now: i64,
    ) -> Result<SubmissionReceipt> {
        self.record.arena.ensure_accepting(player, now)?;
        let game = self.record.game.as_mut().ok_or(LifecycleError::NotStarted)?;
        let receipt = GameEngine::new(game, &self.ctx.config).submit(player, submission, now)?;
        Ok(receipt)
    }

    fn handle_resolve(&mut self, outcome: &str) -> Result<String> {
        let arena_id = self.record.id();
        if self.record.arena.status != ArenaStatus::InProgress {
            return Err(LifecycleError::NotInProgress {
                status: self.record.arena.status,
            }
            .into());
        }
        let game = self.record.game.as_mut().ok_or(LifecycleError::NotStarted)?;
        let outcome = GameEngine::new(game, &self.ctx.config).resolve_outcome(outcome)?;

        self.ctx.persist(&self.record);
        info!(arena = %arena_id, %outcome, "prediction outcome resolved");
        self.ctx
            .event_bus
            .publish(Event::Lifecycle(LifecycleEvent::OutcomeResolved {
                arena_id,
                outcome: outcome.clone(),
            }));
        Ok(outcome)
    }

    fn handle_tick(&mut self) -> Option<BTreeMap<String, u64>> {
        if self.record.arena.status != ArenaStatus::InProgress {
            return None;
        }
        let seed = self.record.seed;
        let game = self.record.game.as_mut()?;
        let prices = GameEngine::new(game, &self.ctx.config).tick_prices(self.ctx.rng.as_ref(), seed)?;

        self.ctx.persist(&self.record);
        self.ctx.metrics.record_tick();
        self.ctx
            .event_bus
            .publish(Event::Market(MarketEvent::PricesTicked {
                arena_id: self.record.id(),
                prices: prices.clone(),
            }));
        Some(prices)
    }

    /// Judges, records, and announces the settlement. A second call returns
    /// the stored settlement without judging again.
    async fn handle_settle(&mut self, trigger: SettleTrigger, now: i64) -> Result<Settlement> {
        if let (SettlementPhase::Settled, Some(settlement)) =
            (self.phase, &self.record.arena.settlement)
        {
            debug!(arena = %self.record.id(), "arena already settled");
            return Ok(settlement.clone());
        }

        let arena_id = self.record.id();
        self.phase = SettlementPhase::Judging;

        let roster = self.record.arena.players();
        let judgement = match self.record.game.as_mut() {
            Some(game) => GameEngine::new(game, &self.ctx.config).judge(
                &roster,
                self.ctx.rng.as_ref(),
                self.record.seed,
            ),
            None => Judgement::refund(&roster),
        };
        let settlement = self
            .ctx
            .settlement
            .finalize(&self.record.arena, judgement, trigger, now);

        if let Err(e) = self.record.arena.complete(settlement.clone()) {
            self.phase = SettlementPhase::Pending;
            return Err(e.into());
        }
        self.phase = SettlementPhase::Settled;
        self.ctx.metrics.record_settlement();
        self.ctx.persist(&self.record);

        info!(
            arena = %arena_id,
            %trigger,
            winners = settlement.winners.len(),
            prize_per_winner = %settlement.prize_per_winner,
            refunded = settlement.refunded,
            "arena settled"
        );
        self.ctx
            .event_bus
            .publish(Event::Settlement(SettlementEvent::Settled {
                arena_id,
                trigger,
                winners: settlement.winners.clone(),
                prize_per_winner: settlement.prize_per_winner,
                refunded: settlement.refunded,
            }));

        self.deliver_payout().await;
        Ok(settlement)
    }

    /// Hands the settlement to the payout sink. Failures leave the arena
    /// settled and undelivered so a later sweep can retry.
    async fn deliver_payout(&mut self) -> bool {
        if self.record.payout_delivered {
            return true;
        }
        let Some(settlement) = &self.record.arena.settlement else {
            return false;
        };

        let arena_id = self.record.id();
        let payout = Payout::from_settlement(arena_id, settlement);
        match self.ctx.settlement.dispatch(&payout).await {
            Ok(()) => {
                self.record.payout_delivered = true;
                self.ctx.metrics.record_payout(true);
                self.ctx.persist(&self.record);
                self.ctx
                    .event_bus
                    .publish(Event::Settlement(SettlementEvent::PayoutDelivered { arena_id }));
                true
            }
            Err(e) => {
                warn!(arena = %arena_id, error = %e, "payout dispatch failed");
                self.ctx.metrics.record_payout(false);
                self.ctx
                    .event_bus
                    .publish(Event::Settlement(SettlementEvent::PayoutFailed {
                        arena_id,
                        error: e.to_string(),
                    }));
                false
            }
        }
    }

    fn handle_view(&self, player: &PlayerAddress) -> Result<GameView> {
        if !self.record.arena.is_player(player) {
            return Err(LifecycleError::NotAPlayer(player.clone()).into());
        }
        let game = self.record.game.as_ref().ok_or(LifecycleError::NotStarted)?;
        Ok(game.view_for(player))
    }

    fn handle_prices(&self) -> Result<BTreeMap<String, u64>> {
        if self.record.arena.kind != GameKind::Trading {
            return Err(ArenaError::NotTradingArena(self.record.id()));
        }
        let game = self.record.game.as_ref().ok_or(LifecycleError::NotStarted)?;
        match &game.board {
            KindState::Trading(state) => Ok(state.prices.clone()),
            _ => Err(ArenaError::NotTradingArena(self.record.id())),
        }
    }
}
