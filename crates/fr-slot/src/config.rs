//! Game configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Grid specification (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub columns: usize,
    /// Number of visible rows per reel
    pub rows: usize,
}

impl GridSpec {
    /// Classic 3×3 fruit machine
    pub fn classic_3x3() -> Self {
        Self { columns: 3, rows: 3 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.columns * self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::classic_3x3()
    }
}

/// Betting limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    /// Minimum bet per line
    pub min_bet: u32,
    /// Maximum bet per line
    pub max_bet: u32,
    /// Maximum number of active paylines
    pub max_lines: usize,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: 1,
            max_bet: 500,
            max_lines: 3,
        }
    }
}

/// Payout tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Chance that a spin is forced to a single-symbol grid
    pub win_probability: f64,
    /// Per-line win multiplier (value × bet × multiplier)
    pub win_multiplier: f64,
    /// Applied to the summed winnings when every requested line wins
    pub jackpot_multiplier: i64,
    /// Stake multiplier on a losing spin
    pub loss_multiplier: i64,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            win_probability: 0.5,
            win_multiplier: 2.0,
            jackpot_multiplier: 3,
            loss_multiplier: 2,
        }
    }
}

/// Streak bonus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Consecutive wins needed to trigger the bonus round
    pub streak_threshold: u32,
    /// Bonus award range (inclusive)
    pub award_range: (i64, i64),
    /// Bonus sub-spin prize range (inclusive)
    pub spin_prize_range: (i64, i64),
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            streak_threshold: 3,
            award_range: (100, 500),
            spin_prize_range: (50, 200),
        }
    }
}

/// Auto-play cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPlayConfig {
    /// Delay between automatic spins (ms)
    pub spin_delay_ms: u64,
}

impl AutoPlayConfig {
    pub fn spin_delay(&self) -> Duration {
        Duration::from_millis(self.spin_delay_ms)
    }
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self { spin_delay_ms: 1000 }
    }
}

/// Complete game configuration
///
/// Injected once at session creation; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Display name
    pub name: String,
    /// Grid dimensions
    #[serde(default)]
    pub grid: GridSpec,
    /// Betting limits
    #[serde(default)]
    pub bets: BetLimits,
    /// Payout tuning
    #[serde(default)]
    pub payouts: PayoutConfig,
    /// Streak bonus
    #[serde(default)]
    pub bonus: BonusConfig,
    /// Auto-play cadence
    #[serde(default)]
    pub auto_play: AutoPlayConfig,
    /// Balance every session starts with
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
}

/// Upper bound for every payout multiplier
pub const MAX_MULTIPLIER: i64 = 100;

fn default_starting_balance() -> i64 {
    1000
}

impl GameConfig {
    /// Reference casino configuration
    pub fn reference() -> Self {
        Self {
            name: "Reference".into(),
            grid: GridSpec::default(),
            bets: BetLimits::default(),
            payouts: PayoutConfig::default(),
            bonus: BonusConfig::default(),
            auto_play: AutoPlayConfig::default(),
            starting_balance: default_starting_balance(),
        }
    }

    /// Studio preset: every spin wins and auto-play runs fast
    pub fn studio() -> Self {
        Self {
            name: "Studio".into(),
            payouts: PayoutConfig {
                win_probability: 1.0,
                ..PayoutConfig::default()
            },
            auto_play: AutoPlayConfig { spin_delay_ms: 50 },
            ..Self::reference()
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.columns == 0 || self.grid.rows == 0 {
            return Err(ConfigError::Invalid("grid must have at least one column and row".into()));
        }
        if self.bets.min_bet == 0 || self.bets.min_bet > self.bets.max_bet {
            return Err(ConfigError::Invalid(format!(
                "bet range {}..={} is empty or starts at zero",
                self.bets.min_bet, self.bets.max_bet
            )));
        }
        if self.bets.max_lines == 0 || self.bets.max_lines > self.grid.rows {
            return Err(ConfigError::Invalid(format!(
                "max_lines {} must be within 1..={}",
                self.bets.max_lines, self.grid.rows
            )));
        }
        if !(0.0..=1.0).contains(&self.payouts.win_probability) {
            return Err(ConfigError::Invalid(format!(
                "win_probability {} outside 0.0..=1.0",
                self.payouts.win_probability
            )));
        }
        if !(0.0..=MAX_MULTIPLIER as f64).contains(&self.payouts.win_multiplier) {
            return Err(ConfigError::Invalid(format!(
                "win_multiplier {} outside 0..={}",
                self.payouts.win_multiplier, MAX_MULTIPLIER
            )));
        }
        for (label, value) in [
            ("jackpot_multiplier", self.payouts.jackpot_multiplier),
            ("loss_multiplier", self.payouts.loss_multiplier),
        ] {
            if !(1..=MAX_MULTIPLIER).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{label} {value} outside 1..={MAX_MULTIPLIER}"
                )));
            }
        }
        if self.bonus.streak_threshold == 0 {
            return Err(ConfigError::Invalid("bonus streak_threshold must be at least 1".into()));
        }
        for (label, (lo, hi)) in [
            ("award_range", self.bonus.award_range),
            ("spin_prize_range", self.bonus.spin_prize_range),
        ] {
            if lo < 0 || lo > hi {
                return Err(ConfigError::Invalid(format!("bonus {label} {lo}..={hi} is invalid")));
            }
        }
        Ok(())
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::reference()
    }
}
