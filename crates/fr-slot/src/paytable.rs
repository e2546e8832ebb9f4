//! Payline evaluation

use serde::{Deserialize, Serialize};

use crate::config::PayoutConfig;
use crate::symbols::{Grid, Symbol, SymbolTable};

/// A win on a single horizontal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Line number, 1-based (line 1 is the top row)
    pub line: usize,
    /// Symbol filling the row
    pub symbol: Symbol,
    /// value × bet × win multiplier, before any jackpot multiplier
    pub amount: i64,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Total win, jackpot multiplier applied
    pub winnings: i64,
    /// Per-line wins, ascending by line
    pub line_wins: Vec<LineWin>,
    /// Every requested line won
    pub is_jackpot: bool,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        self.winnings > 0
    }

    /// 1-based winning line numbers
    pub fn winning_lines(&self) -> Vec<usize> {
        self.line_wins.iter().map(|w| w.line).collect()
    }
}

/// Everything a spin produced; read-only downstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub winnings: i64,
    pub winning_lines: Vec<usize>,
    pub is_jackpot: bool,
}

impl SpinOutcome {
    pub fn new(grid: Grid, eval: Evaluation) -> Self {
        Self {
            winning_lines: eval.winning_lines(),
            winnings: eval.winnings,
            is_jackpot: eval.is_jackpot,
            grid,
        }
    }

    pub fn is_win(&self) -> bool {
        self.winnings > 0
    }
}

/// Horizontal payline evaluator
#[derive(Debug, Clone)]
pub struct PaylineEvaluator {
    symbols: SymbolTable,
    win_multiplier: f64,
    jackpot_multiplier: i64,
}

impl PaylineEvaluator {
    pub fn new(symbols: SymbolTable, payouts: &PayoutConfig) -> Self {
        Self {
            symbols,
            win_multiplier: payouts.win_multiplier,
            jackpot_multiplier: payouts.jackpot_multiplier,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Evaluate the first `line_count` rows of a grid.
    ///
    /// Row `i` wins when every column holds the same symbol. Jackpot needs all
    /// checked rows to win, each on its own symbol. Callers guarantee
    /// `1 <= line_count <= rows`; rows past the grid are ignored.
    pub fn evaluate(&self, grid: &Grid, line_count: usize, bet_per_line: u32) -> Evaluation {
        let checked = line_count.min(grid.row_count());
        let mut line_wins = Vec::new();

        for row in 0..checked {
            if let Some(win) = self.evaluate_line(grid, row, bet_per_line) {
                line_wins.push(win);
            }
        }

        let is_jackpot = checked > 0 && line_wins.len() == checked;
        let line_total = line_wins.iter().fold(0i64, |acc, w| acc.saturating_add(w.amount));
        let winnings = if is_jackpot {
            line_total.saturating_mul(self.jackpot_multiplier)
        } else {
            line_total
        };

        Evaluation {
            winnings,
            line_wins,
            is_jackpot,
        }
    }

    fn evaluate_line(&self, grid: &Grid, row: usize, bet_per_line: u32) -> Option<LineWin> {
        let symbols = grid.row(row);
        let first = *symbols.first()?;
        if symbols.iter().any(|&s| s != first) {
            return None;
        }

        let base = self.symbols.value(first).saturating_mul(i64::from(bet_per_line));
        let amount = (base as f64 * self.win_multiplier).round() as i64;

        Some(LineWin {
            line: row + 1,
            symbol: first,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn evaluator() -> PaylineEvaluator {
        PaylineEvaluator::new(SymbolTable::standard(), &PayoutConfig::default())
    }

    fn grid(rows: [[Symbol; 3]; 3]) -> Grid {
        // rows given top-to-bottom; grid is stored column-major
        let columns = (0..3).map(|c| (0..3).map(|r| rows[r][c]).collect()).collect();
        Grid::from_columns(columns).unwrap()
    }

    #[test]
    fn test_all_cherries_three_lines_is_jackpot() {
        let eval = evaluator().evaluate(&Grid::uniform(Cherry, 3, 3), 3, 10);
        assert_eq!(eval.line_wins.len(), 3);
        assert!(eval.line_wins.iter().all(|w| w.amount == 100));
        assert!(eval.is_jackpot);
        assert_eq!(eval.winnings, 900);
        assert_eq!(eval.winning_lines(), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_line_win_is_trivially_jackpot() {
        let g = grid([
            [Orange, Orange, Orange],
            [Lemon, Cherry, Lemon],
            [Watermelon, Lemon, Cherry],
        ]);
        let eval = evaluator().evaluate(&g, 1, 1);
        assert!(eval.is_jackpot);
        // 6 × 1 × 2 = 12, jackpot ×3
        assert_eq!(eval.winnings, 36);
        assert_eq!(eval.winning_lines(), vec![1]);
    }

    #[test]
    fn test_partial_win_no_jackpot() {
        let g = grid([
            [Lemon, Lemon, Lemon],
            [Lemon, Cherry, Lemon],
            [Watermelon, Watermelon, Watermelon],
        ]);
        let eval = evaluator().evaluate(&g, 3, 5);
        assert!(!eval.is_jackpot);
        // line 1: 4×5×2 = 40, line 3: 3×5×2 = 30
        assert_eq!(eval.winnings, 70);
        assert_eq!(eval.winning_lines(), vec![1, 3]);
    }

    #[test]
    fn test_jackpot_lines_may_differ_in_symbol() {
        let g = grid([
            [Cherry, Cherry, Cherry],
            [Lemon, Lemon, Lemon],
            [Orange, Cherry, Orange],
        ]);
        let eval = evaluator().evaluate(&g, 2, 1);
        assert!(eval.is_jackpot);
        // (10 + 8) × 3
        assert_eq!(eval.winnings, 54);
    }

    #[test]
    fn test_unchecked_rows_ignored() {
        let g = grid([
            [Cherry, Lemon, Cherry],
            [Lemon, Lemon, Lemon],
            [Orange, Orange, Orange],
        ]);
        let eval = evaluator().evaluate(&g, 1, 10);
        assert!(!eval.is_win());
        assert!(!eval.is_jackpot);
        assert!(eval.line_wins.is_empty());
    }

    #[test]
    fn test_outcome_from_evaluation() {
        let g = Grid::uniform(Watermelon, 3, 3);
        let eval = evaluator().evaluate(&g, 2, 3);
        let outcome = SpinOutcome::new(g.clone(), eval);
        assert_eq!(outcome.grid, g);
        // (3×3×2) × 2 lines × 3
        assert_eq!(outcome.winnings, 108);
        assert_eq!(outcome.winning_lines, vec![1, 2]);
        assert!(outcome.is_jackpot);
    }

    #[test]
    fn test_oversized_multipliers_saturate() {
        let payouts = PayoutConfig {
            win_multiplier: f64::MAX,
            jackpot_multiplier: i64::MAX,
            ..PayoutConfig::default()
        };
        let evaluator = PaylineEvaluator::new(SymbolTable::standard(), &payouts);
        let eval = evaluator.evaluate(&Grid::uniform(Cherry, 3, 3), 3, u32::MAX);
        assert!(eval.is_jackpot);
        assert_eq!(eval.winnings, i64::MAX);
    }
}
