//! Symbol definitions and the weighted reel pool

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fruit symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    Cherry = 0,
    Lemon = 1,
    Orange = 2,
    Watermelon = 3,
}

impl Symbol {
    /// All symbols in table order
    pub const ALL: [Symbol; 4] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Watermelon,
    ];

    /// Display glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Watermelon => "🍉",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Cherry => "Cherry",
            Symbol::Lemon => "Lemon",
            Symbol::Orange => "Orange",
            Symbol::Watermelon => "Watermelon",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Weight and payout of one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDef {
    pub symbol: Symbol,
    /// Copies of the symbol in the weighted pool
    pub weight: u32,
    /// Per-line payout base
    pub value: i64,
}

/// Static symbol table
///
/// Higher-weight fruits land more often but mostly pay less.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    defs: Vec<SymbolDef>,
    pool: Vec<Symbol>,
}

impl SymbolTable {
    /// The fixed fruit paytable
    pub fn standard() -> Self {
        Self::from_defs(vec![
            SymbolDef { symbol: Symbol::Cherry, weight: 2, value: 5 },
            SymbolDef { symbol: Symbol::Lemon, weight: 4, value: 4 },
            SymbolDef { symbol: Symbol::Orange, weight: 6, value: 6 },
            SymbolDef { symbol: Symbol::Watermelon, weight: 8, value: 3 },
        ])
    }

    fn from_defs(defs: Vec<SymbolDef>) -> Self {
        let pool = defs
            .iter()
            .flat_map(|d| std::iter::repeat_n(d.symbol, d.weight as usize))
            .collect();
        Self { defs, pool }
    }

    /// Get definition for a symbol
    pub fn get(&self, symbol: Symbol) -> Option<&SymbolDef> {
        self.defs.iter().find(|d| d.symbol == symbol)
    }

    /// Payout base for a symbol (0 if unknown)
    pub fn value(&self, symbol: Symbol) -> i64 {
        self.get(symbol).map(|d| d.value).unwrap_or(0)
    }

    /// Pool weight for a symbol (0 if unknown)
    pub fn weight(&self, symbol: Symbol) -> u32 {
        self.get(symbol).map(|d| d.weight).unwrap_or(0)
    }

    /// Distinct symbols, table order
    pub fn distinct(&self) -> Vec<Symbol> {
        self.defs.iter().map(|d| d.symbol).collect()
    }

    /// Expanded multiset: each symbol repeated `weight` times
    pub fn weighted_pool(&self) -> &[Symbol] {
        &self.pool
    }

    pub fn defs(&self) -> &[SymbolDef] {
        &self.defs
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reel window indexed `[column][row]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: Vec<Vec<Symbol>>,
}

impl Grid {
    /// Build from columns; every column must have the same height
    pub fn from_columns(columns: Vec<Vec<Symbol>>) -> Option<Self> {
        let rows = columns.first().map(|c| c.len())?;
        if rows == 0 || columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        Some(Self { columns })
    }

    /// Build cell by cell, column-major; `cell` receives `(column, row)`
    pub fn from_fn(columns: usize, rows: usize, mut cell: impl FnMut(usize, usize) -> Symbol) -> Self {
        Self {
            columns: (0..columns)
                .map(|c| (0..rows).map(|r| cell(c, r)).collect())
                .collect(),
        }
    }

    /// Grid filled with one symbol
    pub fn uniform(symbol: Symbol, columns: usize, rows: usize) -> Self {
        Self {
            columns: vec![vec![symbol; rows]; columns],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Symbol at `[column][row]`
    pub fn get(&self, column: usize, row: usize) -> Option<Symbol> {
        self.columns.get(column).and_then(|c| c.get(row)).copied()
    }

    /// Symbols of one row, left to right
    pub fn row(&self, row: usize) -> Vec<Symbol> {
        self.columns.iter().filter_map(|c| c.get(row).copied()).collect()
    }

    pub fn columns(&self) -> &[Vec<Symbol>] {
        &self.columns
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.row_count() {
            let line: Vec<&str> = self.row(row).iter().map(|s| s.glyph()).collect();
            writeln!(f, "{}", line.join(" | "))?;
        }
        Ok(())
    }
}
