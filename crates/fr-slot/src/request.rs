//! Spin requests and pre-flight validation

use serde::{Deserialize, Serialize};

use crate::config::BetLimits;
use crate::error::SpinError;

/// Player's bet for one spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpinRequest {
    pub bet_per_line: u32,
    pub line_count: usize,
}

impl SpinRequest {
    pub fn new(bet_per_line: u32, line_count: usize) -> Self {
        Self {
            bet_per_line,
            line_count,
        }
    }

    /// Nominal stake, before any loss multiplier
    pub fn total_stake(&self) -> i64 {
        i64::from(self.bet_per_line) * self.line_count as i64
    }
}

/// Check a request against the limits and the current balance.
///
/// Runs before any generation or ledger mutation. Checks are ordered:
/// empty balance, bet range, line range, stake affordability.
pub fn validate_request(
    request: &SpinRequest,
    limits: &BetLimits,
    balance: i64,
) -> Result<SpinRequest, SpinError> {
    if balance <= 0 {
        return Err(SpinError::InsufficientBalance { balance });
    }
    if request.bet_per_line < limits.min_bet || request.bet_per_line > limits.max_bet {
        return Err(SpinError::InvalidBet {
            bet: request.bet_per_line,
            min: limits.min_bet,
            max: limits.max_bet,
        });
    }
    if request.line_count < 1 || request.line_count > limits.max_lines {
        return Err(SpinError::InvalidLineCount {
            lines: request.line_count,
            max: limits.max_lines,
        });
    }
    let stake = request.total_stake();
    if stake > balance {
        return Err(SpinError::InsufficientFundsForStake { stake, balance });
    }
    Ok(*request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> BetLimits {
        BetLimits::default()
    }

    #[test]
    fn test_valid_request_passes_through() {
        let request = SpinRequest::new(50, 2);
        assert_eq!(validate_request(&request, &limits(), 1000), Ok(request));
    }

    #[test]
    fn test_zero_bet_rejected() {
        let result = validate_request(&SpinRequest::new(0, 1), &limits(), 1000);
        assert!(matches!(result, Err(SpinError::InvalidBet { bet: 0, .. })));
    }

    #[test]
    fn test_bet_above_max_rejected() {
        let result = validate_request(&SpinRequest::new(501, 1), &limits(), 100_000);
        assert!(matches!(result, Err(SpinError::InvalidBet { bet: 501, .. })));
    }

    #[test]
    fn test_line_count_bounds() {
        let four = validate_request(&SpinRequest::new(10, 4), &limits(), 1000);
        assert!(matches!(four, Err(SpinError::InvalidLineCount { lines: 4, max: 3 })));

        let zero = validate_request(&SpinRequest::new(10, 0), &limits(), 1000);
        assert!(matches!(zero, Err(SpinError::InvalidLineCount { lines: 0, .. })));
    }

    #[test]
    fn test_empty_balance_checked_first() {
        // Bet is also invalid, but the balance check wins
        let result = validate_request(&SpinRequest::new(0, 9), &limits(), 0);
        assert_eq!(result, Err(SpinError::InsufficientBalance { balance: 0 }));

        let negative = validate_request(&SpinRequest::new(10, 1), &limits(), -40);
        assert_eq!(negative, Err(SpinError::InsufficientBalance { balance: -40 }));
    }

    #[test]
    fn test_stake_above_balance_rejected() {
        let result = validate_request(&SpinRequest::new(400, 3), &limits(), 1000);
        assert_eq!(
            result,
            Err(SpinError::InsufficientFundsForStake { stake: 1200, balance: 1000 })
        );
    }

    #[test]
    fn test_stake_equal_to_balance_allowed() {
        assert!(validate_request(&SpinRequest::new(100, 3), &limits(), 300).is_ok());
    }
}
