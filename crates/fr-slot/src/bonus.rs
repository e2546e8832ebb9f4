//! Streak bonus round
//!
//! Triggered by the session once the ledger reports a full win streak:
//! - a flat random award is credited straight away
//! - one optional coin-flip sub-spin is opened for the player
//!
//! The sub-spin has no time limit; it stays open until the player resolves
//! or declines it, or a later bonus replaces it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BonusConfig;
use crate::error::BonusError;
use crate::ledger::SessionLedger;

/// Credited bonus award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusAward {
    pub amount: i64,
    /// Balance after the credit
    pub balance: i64,
}

/// Result of the optional coin-flip sub-spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSpinOutcome {
    pub won: bool,
    /// Prize drawn for the flip; credited only when `won`
    pub amount: i64,
    /// Balance after resolution
    pub balance: i64,
}

impl BonusSpinOutcome {
    pub fn credited(&self) -> i64 {
        if self.won { self.amount } else { 0 }
    }
}

/// An open bonus sub-spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBonus {
    /// Award that opened this bonus
    pub awarded: i64,
}

/// Bonus round engine
#[derive(Debug, Clone)]
pub struct BonusRoundEngine {
    config: BonusConfig,
    pending: Option<PendingBonus>,
}

impl BonusRoundEngine {
    pub fn new(config: BonusConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> &BonusConfig {
        &self.config
    }

    /// Open sub-spin, if any
    pub fn pending(&self) -> Option<&PendingBonus> {
        self.pending.as_ref()
    }

    /// Draw and credit the bonus award, end the streak, open a sub-spin
    pub fn trigger_bonus<R: Rng + ?Sized>(
        &mut self,
        ledger: &mut SessionLedger,
        rng: &mut R,
    ) -> BonusAward {
        let (lo, hi) = self.config.award_range;
        let amount = rng.random_range(lo..=hi);
        let balance = ledger.apply_bonus(amount);

        if self.pending.is_some() {
            log::debug!("[Bonus] replacing unresolved bonus spin");
        }
        self.pending = Some(PendingBonus { awarded: amount });

        log::info!("[Bonus] streak bonus awarded {} (balance {})", amount, balance);
        BonusAward { amount, balance }
    }

    /// Resolve the open sub-spin: 50/50 flip for a prize in the configured range
    pub fn resolve_bonus_spin<R: Rng + ?Sized>(
        &mut self,
        ledger: &mut SessionLedger,
        rng: &mut R,
    ) -> Result<BonusSpinOutcome, BonusError> {
        self.pending.take().ok_or(BonusError::NoPendingBonusSpin)?;

        let won = rng.random_bool(0.5);
        let (lo, hi) = self.config.spin_prize_range;
        let amount = rng.random_range(lo..=hi);
        let balance = ledger.apply_bonus_spin(if won { amount } else { 0 });

        log::info!(
            "[Bonus] bonus spin {} ({})",
            if won { "won" } else { "lost" },
            amount
        );
        Ok(BonusSpinOutcome {
            won,
            amount,
            balance,
        })
    }

    /// Close the open sub-spin without playing it
    pub fn decline_bonus_spin(&mut self) -> Result<(), BonusError> {
        self.pending
            .take()
            .map(|_| ())
            .ok_or(BonusError::NoPendingBonusSpin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayoutConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (BonusRoundEngine, SessionLedger, ChaCha8Rng) {
        let config = BonusConfig::default();
        (
            BonusRoundEngine::new(config),
            SessionLedger::new(1000, &PayoutConfig::default(), &config),
            ChaCha8Rng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_award_in_range_and_credited() {
        let (mut engine, mut ledger, mut rng) = setup();
        for _ in 0..100 {
            let before = ledger.balance();
            let award = engine.trigger_bonus(&mut ledger, &mut rng);
            assert!((100..=500).contains(&award.amount));
            assert_eq!(award.balance, before + award.amount);
            assert_eq!(ledger.consecutive_wins(), 0);
        }
    }

    #[test]
    fn test_bonus_spin_requires_pending() {
        let (mut engine, mut ledger, mut rng) = setup();
        assert_eq!(
            engine.resolve_bonus_spin(&mut ledger, &mut rng),
            Err(BonusError::NoPendingBonusSpin)
        );
        assert_eq!(engine.decline_bonus_spin(), Err(BonusError::NoPendingBonusSpin));
    }

    #[test]
    fn test_bonus_spin_resolves_once() {
        let (mut engine, mut ledger, mut rng) = setup();
        engine.trigger_bonus(&mut ledger, &mut rng);
        assert!(engine.pending().is_some());

        let before = ledger.balance();
        let spin = engine.resolve_bonus_spin(&mut ledger, &mut rng).unwrap();
        assert!((50..=200).contains(&spin.amount));
        assert_eq!(spin.balance, before + spin.credited());
        assert!(engine.pending().is_none());
        assert!(engine.resolve_bonus_spin(&mut ledger, &mut rng).is_err());
    }

    #[test]
    fn test_bonus_spin_is_roughly_fair() {
        let (mut engine, mut ledger, mut rng) = setup();
        let mut wins = 0;
        for _ in 0..2000 {
            engine.trigger_bonus(&mut ledger, &mut rng);
            if engine.resolve_bonus_spin(&mut ledger, &mut rng).unwrap().won {
                wins += 1;
            }
        }
        assert!((850..=1150).contains(&wins), "wins = {wins}");
    }

    #[test]
    fn test_decline_closes_bonus() {
        let (mut engine, mut ledger, mut rng) = setup();
        engine.trigger_bonus(&mut ledger, &mut rng);
        let balance = ledger.balance();
        assert!(engine.decline_bonus_spin().is_ok());
        assert!(engine.pending().is_none());
        assert_eq!(ledger.balance(), balance);
    }
}
