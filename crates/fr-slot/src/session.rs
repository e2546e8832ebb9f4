//! Game session: single owner of one player's game state

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::bonus::{BonusAward, BonusRoundEngine, BonusSpinOutcome, PendingBonus};
use crate::config::GameConfig;
use crate::error::{BonusError, SlotResult, SpinError};
use crate::events::GameEvent;
use crate::generator::OutcomeGenerator;
use crate::ledger::{LedgerState, SessionLedger, SpinApplication};
use crate::paytable::{PaylineEvaluator, SpinOutcome};
use crate::request::{SpinRequest, validate_request};
use crate::stats::{BalanceStats, SessionStats};
use crate::symbols::{Grid, SymbolTable};

/// Session handle shared between the host and the auto-play runner.
///
/// One lock acquisition covers a whole spin, bonus included.
pub type SharedSession<R = StdRng> = Arc<Mutex<GameSession<R>>>;

/// Everything one accepted spin did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinReport {
    pub request: SpinRequest,
    pub outcome: SpinOutcome,
    pub applied: SpinApplication,
    /// Bonus award credited right after this spin
    pub bonus: Option<BonusAward>,
    /// Ledger after the spin and any bonus
    pub ledger: LedgerState,
}

/// Game session
///
/// Owns config, RNG, ledger and bonus state. All mutation goes through
/// [`spin`](Self::spin) and the bonus-spin methods; there is no rollback.
pub struct GameSession<R: Rng = StdRng> {
    config: GameConfig,
    generator: OutcomeGenerator,
    evaluator: PaylineEvaluator,
    ledger: SessionLedger,
    bonus: BonusRoundEngine,
    rng: R,
    stats: SessionStats,
    last_request: Option<SpinRequest>,
    events: Vec<GameEvent>,
}

impl GameSession<StdRng> {
    /// Session seeded from the OS
    pub fn new(config: GameConfig) -> SlotResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Reproducible session
    pub fn seeded(config: GameConfig, seed: u64) -> SlotResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Create with an explicit random source
    pub fn with_rng(config: GameConfig, rng: R) -> SlotResult<Self> {
        config.validate()?;

        let symbols = SymbolTable::standard();
        let generator = OutcomeGenerator::new(config.grid, config.payouts.win_probability)?;
        log::info!(
            "[Session] new '{}' session: {}x{} grid, balance {}",
            config.name,
            config.grid.columns,
            config.grid.rows,
            config.starting_balance
        );

        Ok(Self {
            generator,
            evaluator: PaylineEvaluator::new(symbols, &config.payouts),
            ledger: SessionLedger::new(config.starting_balance, &config.payouts, &config.bonus),
            bonus: BonusRoundEngine::new(config.bonus),
            rng,
            stats: SessionStats::default(),
            last_request: None,
            events: Vec::new(),
            config,
        })
    }

    /// Wrap into a [`SharedSession`]
    pub fn into_shared(self) -> SharedSession<R> {
        Arc::new(Mutex::new(self))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ledger(&self) -> &LedgerState {
        self.ledger.state()
    }

    /// Owned copy of the ledger
    pub fn snapshot(&self) -> LedgerState {
        self.ledger.state().clone()
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Chart series derived from the balance history
    pub fn balance_stats(&self) -> BalanceStats {
        BalanceStats::from_ledger(self.ledger.state())
    }

    pub fn pending_bonus(&self) -> Option<&PendingBonus> {
        self.bonus.pending()
    }

    /// Last request that passed validation
    pub fn last_request(&self) -> Option<SpinRequest> {
        self.last_request
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.evaluator.symbols()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Validate a request against the current balance without spinning
    pub fn validate(&self, request: &SpinRequest) -> Result<SpinRequest, SpinError> {
        validate_request(request, &self.config.bets, self.ledger.balance())
    }

    /// Validate, generate, evaluate and apply one spin
    pub fn spin(&mut self, request: SpinRequest) -> Result<SpinReport, SpinError> {
        let request = self.accept(request)?;
        let grid = self.generator.generate(self.evaluator.symbols(), &mut self.rng);
        Ok(self.resolve(request, grid))
    }

    /// Same pipeline with a supplied grid instead of a generated one.
    ///
    /// Rows beyond the grid's height are never evaluated.
    pub fn spin_with_grid(&mut self, request: SpinRequest, grid: Grid) -> Result<SpinReport, SpinError> {
        let request = self.accept(request)?;
        Ok(self.resolve(request, grid))
    }

    fn accept(&mut self, request: SpinRequest) -> Result<SpinRequest, SpinError> {
        match self.validate(&request) {
            Ok(valid) => {
                self.last_request = Some(valid);
                Ok(valid)
            }
            Err(err) => {
                log::warn!("[Session] spin rejected: {}", err);
                self.stats.record_rejection();
                self.events.push(GameEvent::rejected(request, &err));
                Err(err)
            }
        }
    }

    fn resolve(&mut self, request: SpinRequest, grid: Grid) -> SpinReport {
        let eval = self
            .evaluator
            .evaluate(&grid, request.line_count, request.bet_per_line);
        let outcome = SpinOutcome::new(grid, eval);
        let applied = self.ledger.apply_spin(&request, &outcome);
        self.stats.record_spin(&outcome, &applied);

        let round = self.ledger.state().round_index;
        self.events.push(GameEvent::SpinResolved {
            round,
            request,
            outcome: outcome.clone(),
            applied,
            ledger: self.snapshot(),
        });

        let bonus = if applied.triggered_bonus {
            self.events.push(GameEvent::BonusTriggered {
                round,
                consecutive_wins: self.ledger.consecutive_wins(),
            });
            let award = self.bonus.trigger_bonus(&mut self.ledger, &mut self.rng);
            self.stats.record_bonus(award.amount);
            self.events.push(GameEvent::BonusAwarded {
                award,
                ledger: self.snapshot(),
            });
            Some(award)
        } else {
            None
        };

        SpinReport {
            request,
            outcome,
            applied,
            bonus,
            ledger: self.snapshot(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BONUS SUB-SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play the open bonus sub-spin
    pub fn resolve_bonus_spin(&mut self) -> Result<BonusSpinOutcome, BonusError> {
        let outcome = self.bonus.resolve_bonus_spin(&mut self.ledger, &mut self.rng)?;
        self.stats.record_bonus_spin(outcome.credited());
        self.events.push(GameEvent::BonusSpinResolved {
            outcome,
            ledger: self.snapshot(),
        });
        Ok(outcome)
    }

    /// Close the open bonus sub-spin without playing it
    pub fn decline_bonus_spin(&mut self) -> Result<(), BonusError> {
        self.bonus.decline_bonus_spin()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
