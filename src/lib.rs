//! # Binance Book
//!
//! A depth-limited, two-sided price-level order book maintained from two
//! Binance spot streams:
//!
//! - partial book depth snapshots (up to 20 levels every 100ms, best first)
//! - book ticker updates carrying only the new best bid and offer
//!
//! A ticker never says which deeper levels went away, so the book infers it:
//! any stored level at or better than a new best price is dropped before the
//! new best is pushed ("uncrossing").
//!
//! ## Quick Start
//! ```rust
//! use binance_book::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut book = BookEngine::new(20);
//! book.replace(
//!     [(dec!(99), dec!(1)), (dec!(97), dec!(1)), (dec!(95), dec!(1))],
//!     [(dec!(101), dec!(1)), (dec!(103), dec!(1)), (dec!(105), dec!(1))],
//! );
//! book.apply_bbo(&BookTicker::new(dec!(100), dec!(2), dec!(102), dec!(2)));
//!
//! let (bids, asks) = book.extract();
//! assert_eq!(bids[0].price, dec!(100));
//! assert_eq!(asks[0].price, dec!(102));
//! assert_eq!(asks[1].price, dec!(103));
//! println!("{}", book);
//! ```

pub mod data;
pub mod display;
pub mod error;
pub mod feed;
pub mod orderbook;
pub mod parser;
pub mod side;

pub use data::*;
pub use display::BookTable;
pub use error::*;
pub use feed::{FeedEvent, FeedHandler, FeedStats};
pub use orderbook::{BookEngine, BookManager};
pub use parser::{BinanceParser, FeedMessage, FeedParser};
pub use side::BookSide;

/// Prelude - minimal public API surface
///
/// Import with: `use binance_book::prelude::*;`
pub mod prelude {
    /// Book core
    pub use crate::orderbook::BookEngine;
    pub use crate::side::BookSide;

    /// Core data types
    pub use crate::data::{BookDepth, BookTicker, Price, PriceLevel, Quantity, Side};

    /// Configuration
    pub use crate::data::{BookConfig, BookConfigBuilder};

    /// Feed handling
    pub use crate::feed::FeedHandler;
    pub use crate::parser::{BinanceParser, FeedParser};

    /// Errors
    pub use crate::error::BookError;
}

use tracing_subscriber::EnvFilter;

/// Initialize logging, honoring `RUST_LOG` (defaults to `info`)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
