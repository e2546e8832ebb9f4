//! Outcome generation

use rand::Rng;

use crate::config::GridSpec;
use crate::error::ConfigError;
use crate::symbols::{Grid, SymbolTable};

/// Produces one reel window per spin.
///
/// With probability `win_probability` the whole window is a single symbol
/// picked uniformly from the distinct set, which guarantees every payline
/// matches. Otherwise each cell is drawn independently from the weighted
/// pool. Holds no state between calls; all randomness comes from the caller.
#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    grid: GridSpec,
    win_probability: f64,
}

impl OutcomeGenerator {
    /// Fails on an empty grid or a probability outside `0.0..=1.0` (NaN included)
    pub fn new(grid: GridSpec, win_probability: f64) -> Result<Self, ConfigError> {
        if grid.columns == 0 || grid.rows == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} has no cells",
                grid.columns, grid.rows
            )));
        }
        if !(0.0..=1.0).contains(&win_probability) {
            return Err(ConfigError::Invalid(format!(
                "win_probability {} outside 0.0..=1.0",
                win_probability
            )));
        }
        Ok(Self {
            grid,
            win_probability,
        })
    }

    pub fn grid_spec(&self) -> GridSpec {
        self.grid
    }

    /// Generate a grid
    pub fn generate<R: Rng + ?Sized>(&self, table: &SymbolTable, rng: &mut R) -> Grid {
        let GridSpec { columns, rows } = self.grid;

        if rng.random_bool(self.win_probability) {
            let distinct = table.distinct();
            let symbol = distinct[rng.random_range(0..distinct.len())];
            return Grid::uniform(symbol, columns, rows);
        }

        let pool = table.weighted_pool();
        Grid::from_fn(columns, rows, |_, _| pool[rng.random_range(0..pool.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_dimensions() {
        let generator = OutcomeGenerator::new(GridSpec { columns: 5, rows: 3 }, 0.5).unwrap();
        let table = SymbolTable::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let grid = generator.generate(&table, &mut rng);
            assert_eq!(grid.column_count(), 5);
            assert_eq!(grid.row_count(), 3);
        }
    }

    #[test]
    fn test_certain_win_is_uniform() {
        let generator = OutcomeGenerator::new(GridSpec::default(), 1.0).unwrap();
        let table = SymbolTable::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..50 {
            let grid = generator.generate(&table, &mut rng);
            let first = grid.get(0, 0).unwrap();
            assert!(grid.columns().iter().flatten().all(|&s| s == first));
        }
    }

    #[test]
    fn test_weighted_pool_frequencies() {
        let generator = OutcomeGenerator::new(GridSpec::default(), 0.0).unwrap();
        let table = SymbolTable::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let grid = generator.generate(&table, &mut rng);
            for &symbol in grid.columns().iter().flatten() {
                counts[symbol as usize] += 1;
            }
        }

        // 36k draws: watermelon (8/20) must clearly beat cherry (2/20)
        let cherry = counts[Symbol::Cherry as usize] as f64;
        let melon = counts[Symbol::Watermelon as usize] as f64;
        assert!(melon / cherry > 3.0 && melon / cherry < 5.0);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let generator = OutcomeGenerator::new(GridSpec::default(), 0.5).unwrap();
        let table = SymbolTable::standard();
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..20 {
            assert_eq!(generator.generate(&table, &mut a), generator.generate(&table, &mut b));
        }
    }

    #[test]
    fn test_rejects_bad_probability_and_empty_grid() {
        assert!(OutcomeGenerator::new(GridSpec::default(), f64::NAN).is_err());
        assert!(OutcomeGenerator::new(GridSpec::default(), 1.5).is_err());
        assert!(OutcomeGenerator::new(GridSpec::default(), -0.1).is_err());
        assert!(OutcomeGenerator::new(GridSpec { columns: 0, rows: 3 }, 0.5).is_err());
        assert!(OutcomeGenerator::new(GridSpec::default(), 0.0).is_ok());
        assert!(OutcomeGenerator::new(GridSpec::default(), 1.0).is_ok());
    }
}
