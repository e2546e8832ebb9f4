//! Session ledger: balance, streak and balance history

use serde::{Deserialize, Serialize};

use crate::config::{BonusConfig, PayoutConfig};
use crate::paytable::SpinOutcome;
use crate::request::SpinRequest;

/// Ledger state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Current balance; may go negative after a doubled loss
    pub balance: i64,
    /// Sum of all spin winnings
    pub total_winnings: i64,
    /// Sum of all losing stakes (after the loss multiplier)
    pub total_losses: i64,
    /// Current win streak
    pub consecutive_wins: u32,
    /// Balance after every resolved round; entry 0 is the starting balance
    pub balance_history: Vec<i64>,
    /// Resolved rounds so far
    pub round_index: u64,
}

impl LedgerState {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            balance: starting_balance,
            total_winnings: 0,
            total_losses: 0,
            consecutive_wins: 0,
            balance_history: vec![starting_balance],
            round_index: 0,
        }
    }

    pub fn initial_balance(&self) -> i64 {
        self.balance_history[0]
    }

    /// Round labels matching `balance_history` (0..=round_index)
    pub fn rounds(&self) -> Vec<u64> {
        (0..=self.round_index).collect()
    }

    fn record_round(&mut self) {
        self.balance_history.push(self.balance);
        self.round_index += 1;
    }
}

/// What `apply_spin` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinApplication {
    pub winnings: i64,
    /// Debited stake, loss multiplier included
    pub total_stake: i64,
    /// Streak reached the bonus threshold; the caller runs the bonus round
    pub triggered_bonus: bool,
    /// Balance after the spin
    pub balance: i64,
}

impl SpinApplication {
    /// Net balance change of the spin
    pub fn net(&self) -> i64 {
        self.winnings - self.total_stake
    }
}

/// Exclusive owner of the ledger state
#[derive(Debug, Clone)]
pub struct SessionLedger {
    state: LedgerState,
    loss_multiplier: i64,
    bonus_threshold: u32,
}

impl SessionLedger {
    pub fn new(starting_balance: i64, payouts: &PayoutConfig, bonus: &BonusConfig) -> Self {
        Self {
            state: LedgerState::new(starting_balance),
            loss_multiplier: payouts.loss_multiplier,
            bonus_threshold: bonus.streak_threshold,
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn balance(&self) -> i64 {
        self.state.balance
    }

    pub fn consecutive_wins(&self) -> u32 {
        self.state.consecutive_wins
    }

    /// Apply a validated spin.
    ///
    /// A losing spin costs `stake × loss_multiplier`. Affordability was checked
    /// against the nominal stake only, so the balance can end up negative.
    pub fn apply_spin(&mut self, request: &SpinRequest, outcome: &SpinOutcome) -> SpinApplication {
        let mut total_stake = request.total_stake();
        let winnings = outcome.winnings;

        if winnings == 0 {
            total_stake = total_stake.saturating_mul(self.loss_multiplier);
            self.state.consecutive_wins = 0;
            self.state.total_losses = self.state.total_losses.saturating_add(total_stake);
        } else {
            self.state.consecutive_wins += 1;
            self.state.total_winnings = self.state.total_winnings.saturating_add(winnings);
        }

        self.state.balance = self
            .state
            .balance
            .saturating_sub(total_stake)
            .saturating_add(winnings);
        self.state.record_round();

        let triggered_bonus = self.state.consecutive_wins >= self.bonus_threshold;

        log::debug!(
            "[Ledger] round {}: stake {}, win {}, balance {}, streak {}",
            self.state.round_index,
            total_stake,
            winnings,
            self.state.balance,
            self.state.consecutive_wins
        );
        if self.state.balance < 0 {
            log::warn!("[Ledger] balance went negative: {}", self.state.balance);
        }

        SpinApplication {
            winnings,
            total_stake,
            triggered_bonus,
            balance: self.state.balance,
        }
    }

    /// Credit a bonus award and end the streak
    pub fn apply_bonus(&mut self, amount: i64) -> i64 {
        self.state.balance = self.state.balance.saturating_add(amount);
        self.state.consecutive_wins = 0;
        self.state.record_round();
        self.state.balance
    }

    /// Credit a won bonus sub-spin; a lost one changes nothing
    pub fn apply_bonus_spin(&mut self, amount: i64) -> i64 {
        if amount > 0 {
            self.state.balance = self.state.balance.saturating_add(amount);
            self.state.record_round();
        }
        self.state.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::Evaluation;
    use crate::symbols::{Grid, Symbol};

    fn ledger(balance: i64) -> SessionLedger {
        SessionLedger::new(balance, &PayoutConfig::default(), &BonusConfig::default())
    }

    fn outcome(winnings: i64) -> SpinOutcome {
        SpinOutcome::new(
            Grid::uniform(Symbol::Lemon, 3, 3),
            Evaluation {
                winnings,
                ..Evaluation::default()
            },
        )
    }

    #[test]
    fn test_loss_doubles_stake() {
        let mut ledger = ledger(1000);
        let applied = ledger.apply_spin(&SpinRequest::new(50, 2), &outcome(0));

        assert_eq!(applied.total_stake, 200);
        assert_eq!(applied.balance, 800);
        assert!(!applied.triggered_bonus);
        assert_eq!(ledger.state().consecutive_wins, 0);
        assert_eq!(ledger.state().total_losses, 200);
    }

    #[test]
    fn test_win_credits_and_counts_streak() {
        let mut ledger = ledger(1000);
        let applied = ledger.apply_spin(&SpinRequest::new(10, 1), &outcome(60));

        assert_eq!(applied.total_stake, 10);
        assert_eq!(applied.net(), 50);
        assert_eq!(ledger.balance(), 1050);
        assert_eq!(ledger.consecutive_wins(), 1);
        assert_eq!(ledger.state().total_winnings, 60);
    }

    #[test]
    fn test_doubled_loss_can_go_negative() {
        // 3 × 100 = 300 is affordable, the doubled 600 is not
        let mut ledger = ledger(300);
        let applied = ledger.apply_spin(&SpinRequest::new(100, 3), &outcome(0));

        assert_eq!(applied.balance, -300);
        assert_eq!(ledger.state().balance_history, vec![300, -300]);
    }

    #[test]
    fn test_third_win_triggers_bonus() {
        let mut ledger = ledger(1000);
        let request = SpinRequest::new(1, 1);

        assert!(!ledger.apply_spin(&request, &outcome(10)).triggered_bonus);
        assert!(!ledger.apply_spin(&request, &outcome(10)).triggered_bonus);
        assert!(ledger.apply_spin(&request, &outcome(10)).triggered_bonus);
        assert_eq!(ledger.consecutive_wins(), 3);

        ledger.apply_bonus(250);
        assert_eq!(ledger.consecutive_wins(), 0);
        assert!(!ledger.apply_spin(&request, &outcome(10)).triggered_bonus);
    }

    #[test]
    fn test_loss_resets_streak() {
        let mut ledger = ledger(1000);
        let request = SpinRequest::new(1, 1);
        ledger.apply_spin(&request, &outcome(10));
        ledger.apply_spin(&request, &outcome(10));
        ledger.apply_spin(&request, &outcome(0));
        assert_eq!(ledger.consecutive_wins(), 0);
        assert!(!ledger.apply_spin(&request, &outcome(10)).triggered_bonus);
    }

    #[test]
    fn test_history_tracks_rounds() {
        let mut ledger = ledger(1000);
        let request = SpinRequest::new(5, 2);
        for i in 0..10 {
            ledger.apply_spin(&request, &outcome(if i % 3 == 0 { 40 } else { 0 }));
            let state = ledger.state();
            assert_eq!(state.balance_history.len() as u64, state.round_index + 1);
        }
        ledger.apply_bonus(100);
        ledger.apply_bonus_spin(0);
        ledger.apply_bonus_spin(75);

        let state = ledger.state();
        assert_eq!(state.round_index, 12);
        assert_eq!(state.balance_history.len(), 13);
        assert_eq!(state.rounds().len(), 13);
        assert_eq!(state.initial_balance(), 1000);
        assert_eq!(*state.balance_history.last().unwrap(), state.balance);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let payouts = PayoutConfig {
            loss_multiplier: i64::MAX,
            ..PayoutConfig::default()
        };
        let mut ledger = SessionLedger::new(1000, &payouts, &BonusConfig::default());
        let applied = ledger.apply_spin(&SpinRequest::new(500, 3), &outcome(0));
        assert_eq!(applied.total_stake, i64::MAX);
        assert_eq!(applied.balance, 1000 - i64::MAX);

        let mut ledger = self::ledger(i64::MAX - 10);
        assert_eq!(ledger.apply_bonus(500), i64::MAX);
        assert_eq!(ledger.state().balance_history.len(), 2);
    }
}
