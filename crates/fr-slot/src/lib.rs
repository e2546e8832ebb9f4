//! # fr-slot: Fruit Slot Core
//!
//! Deterministic-when-seeded simulator for a 3×3, multi-line fruit slot
//! machine. Generates reel outcomes, evaluates paylines, keeps the player
//! ledger and runs the streak bonus round.
//!
//! ## Architecture
//!
//! ```text
//! GameSession<R: Rng>
//!     │
//!     ├── GameConfig (grid, bet limits, payouts, bonus, auto-play)
//!     ├── SymbolTable (weight / value per fruit)
//!     ├── SessionLedger (balance, streak, history)
//!     └── BonusRoundEngine (streak bonus + optional sub-spin)
//!           │
//!           v
//!     validate → generate → evaluate → apply_spin → [trigger_bonus]
//!           │
//!           v
//!     SpinReport + Vec<GameEvent>
//! ```
//!
//! Auto-play sits on top: [`AutoPlayController`] is the synchronous state
//! machine, [`AutoPlayRunner`] drives it from a tokio timer.

pub mod autoplay;
pub mod bonus;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod ledger;
pub mod paytable;
pub mod request;
pub mod session;
pub mod stats;
pub mod symbols;

pub use autoplay::*;
pub use bonus::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use ledger::*;
pub use paytable::*;
pub use request::*;
pub use session::*;
pub use stats::*;
pub use symbols::*;
