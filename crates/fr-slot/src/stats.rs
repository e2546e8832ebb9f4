//! Session statistics
//!
//! Running counters plus the derived series a charting layer draws from the
//! balance history: per-round percentage change, moving averages, win rate.

use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerState, SpinApplication};
use crate::paytable::SpinOutcome;

/// Short moving-average window
pub const SHORT_MA_WINDOW: usize = 5;
/// Long moving-average window
pub const LONG_MA_WINDOW: usize = 10;

/// Running session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub jackpots: u64,
    pub bonuses: u64,
    pub bonus_spins_won: u64,
    /// Sum of debited stakes, loss multiplier included
    pub total_staked: i64,
    /// Spin winnings plus bonus credits
    pub total_returned: i64,
    pub biggest_win: i64,
    pub rejected_requests: u64,
}

impl SessionStats {
    pub fn record_spin(&mut self, outcome: &SpinOutcome, applied: &SpinApplication) {
        self.total_spins += 1;
        self.total_staked += applied.total_stake;
        self.total_returned += applied.winnings;

        if outcome.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if outcome.is_jackpot {
            self.jackpots += 1;
        }
        self.biggest_win = self.biggest_win.max(applied.winnings);
    }

    pub fn record_bonus(&mut self, amount: i64) {
        self.bonuses += 1;
        self.total_returned += amount;
    }

    pub fn record_bonus_spin(&mut self, credited: i64) {
        if credited > 0 {
            self.bonus_spins_won += 1;
            self.total_returned += credited;
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected_requests += 1;
    }

    /// Percentage of spins that paid anything
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Returned / staked, in percent
    pub fn return_to_player(&self) -> f64 {
        if self.total_staked > 0 {
            (self.total_returned as f64 / self.total_staked as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Derived balance series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceStats {
    /// Round labels, 0..=round_index
    pub rounds: Vec<u64>,
    /// Balance after each round
    pub balances: Vec<i64>,
    /// Percent change against the previous round; entry 0 is 0.0
    pub pct_changes: Vec<f64>,
    /// Short moving average; empty until the history is longer than the window
    pub short_ma: Vec<f64>,
    pub short_window: usize,
    /// Long moving average; empty until the history is longer than the window
    pub long_ma: Vec<f64>,
    pub long_window: usize,
    /// Share of rounds with a positive change, in percent
    pub win_rate: f64,
    pub initial: i64,
    pub current: i64,
    /// Net change relative to the starting balance, in percent
    pub change_pct: f64,
}

impl BalanceStats {
    pub fn from_ledger(state: &LedgerState) -> Self {
        let balances = state.balance_history.clone();
        let pct_changes = pct_changes(&balances);

        let short_window = SHORT_MA_WINDOW.min(balances.len());
        let long_window = LONG_MA_WINDOW.min(balances.len());

        let rounds_played = pct_changes.len().saturating_sub(1);
        let win_rate = if rounds_played > 0 {
            let ups = pct_changes.iter().skip(1).filter(|&&p| p > 0.0).count();
            ups as f64 / rounds_played as f64 * 100.0
        } else {
            0.0
        };

        let initial = balances.first().copied().unwrap_or(state.balance);
        let current = balances.last().copied().unwrap_or(state.balance);
        let change_pct = if initial != 0 {
            (current as f64 / initial as f64 - 1.0) * 100.0
        } else {
            0.0
        };

        Self {
            rounds: state.rounds(),
            short_ma: charted_average(&balances, short_window),
            long_ma: charted_average(&balances, long_window),
            balances,
            pct_changes,
            short_window,
            long_window,
            win_rate,
            initial,
            current,
            change_pct,
        }
    }
}

/// Percent change per entry; the first entry is 0.0.
///
/// A change from a zero balance is reported as 0.0.
pub fn pct_changes(series: &[i64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(series.len());
    out.push(0.0);
    out.extend(series.windows(2).map(|w| {
        let (prev, next) = (w[0] as f64, w[1] as f64);
        if prev == 0.0 { 0.0 } else { (next - prev) / prev * 100.0 }
    }));
    out
}

/// Moving average as charted: only once the series outgrows the window
fn charted_average(series: &[i64], window: usize) -> Vec<f64> {
    if series.len() > window {
        moving_average(series, window)
    } else {
        Vec::new()
    }
}

/// Trailing moving average over full windows only
pub fn moving_average(series: &[i64], window: usize) -> Vec<f64> {
    if window == 0 || series.len() < window {
        return Vec::new();
    }
    series
        .windows(window)
        .map(|w| w.iter().sum::<i64>() as f64 / window as f64)
        .collect()
}
