//! Data models for book levels, feed payloads and configuration

use crate::error::BookError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Price = Decimal;
pub type Quantity = Decimal;

/// Price level in order book
///
/// Two levels at the same price are the same level for the side invariants,
/// whatever their quantities. Quantity only takes part in value equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

impl From<(Price, Quantity)> for PriceLevel {
    fn from((price, quantity): (Price, Quantity)) -> Self {
        Self { price, quantity }
    }
}

impl From<&(Price, Quantity)> for PriceLevel {
    fn from(&(price, quantity): &(Price, Quantity)) -> Self {
        Self { price, quantity }
    }
}

impl From<&PriceLevel> for PriceLevel {
    fn from(level: &PriceLevel) -> Self {
        *level
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.quantity, self.price)
    }
}

/// Book side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// True when `a` is a strictly better price than `b` on this side.
    #[inline]
    pub fn is_better(self, a: Price, b: Price) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Best bid/offer update
///
/// Only the new top of book on each side; deeper removals are inferred.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookTicker {
    pub update_id: u64,
    pub symbol: String,
    pub best_bid_price: Price,
    pub best_bid_qty: Quantity,
    pub best_ask_price: Price,
    pub best_ask_qty: Quantity,
}

impl BookTicker {
    /// Ticker without feed metadata, mostly for tests and replays.
    pub fn new(
        best_bid_price: Price,
        best_bid_qty: Quantity,
        best_ask_price: Price,
        best_ask_qty: Quantity,
    ) -> Self {
        Self {
            update_id: 0,
            symbol: String::new(),
            best_bid_price,
            best_bid_qty,
            best_ask_price,
            best_ask_qty,
        }
    }

    pub fn best_bid(&self) -> PriceLevel {
        PriceLevel::new(self.best_bid_price, self.best_bid_qty)
    }

    pub fn best_ask(&self) -> PriceLevel {
        PriceLevel::new(self.best_ask_price, self.best_ask_qty)
    }
}

impl fmt::Display for BookTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticker[{}]: {}@{} | {}@{} (u={})",
            self.symbol,
            self.best_bid_qty,
            self.best_bid_price,
            self.best_ask_qty,
            self.best_ask_price,
            self.update_id
        )
    }
}

/// Full-depth snapshot in exchange canonical order
/// (bids highest first, asks lowest first).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookDepth {
    pub last_update_id: u64,
    pub symbol: Option<String>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl fmt::Display for BookDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Depth[{}]: {} bids, {} asks (lastUpdateId={})",
            self.symbol.as_deref().unwrap_or("-"),
            self.bids.len(),
            self.asks.len(),
            self.last_update_id
        )
    }
}

/// Book configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BookConfig {
    /// Advertised exchange depth; pre-sizes each side's storage.
    pub depth: usize,
    /// Symbol for depth payloads that arrive without a stream envelope.
    pub default_symbol: String,
    /// Run `validate()` after every applied message.
    pub check_invariants: bool,
    /// Print tracked books every N messages in the replay binary (0 = at end only).
    pub print_every: usize,
}

impl BookConfig {
    pub const ENV_DEPTH: &'static str = "BOOK_DEPTH";
    pub const ENV_SYMBOL: &'static str = "BOOK_SYMBOL";
    pub const ENV_CHECK_INVARIANTS: &'static str = "BOOK_CHECK_INVARIANTS";
    pub const ENV_PRINT_EVERY: &'static str = "BOOK_PRINT_EVERY";

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), BookError> {
        if self.depth == 0 {
            return Err(BookError::Configuration("Depth must be greater than 0".to_string()));
        }

        if self.default_symbol.trim().is_empty() {
            return Err(BookError::Configuration("Default symbol cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, BookError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BookError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::ENV_DEPTH) {
            config.depth = parse_env(Self::ENV_DEPTH, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_SYMBOL) {
            config.default_symbol = value.trim().to_uppercase();
        }
        if let Some(value) = lookup(Self::ENV_CHECK_INVARIANTS) {
            config.check_invariants = parse_env(Self::ENV_CHECK_INVARIANTS, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_PRINT_EVERY) {
            config.print_every = parse_env(Self::ENV_PRINT_EVERY, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, BookError> {
    value
        .trim()
        .parse()
        .map_err(|_| BookError::Configuration(format!("Invalid value for {}: {:?}", key, value)))
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            depth: 20,
            default_symbol: "BTCUSDT".to_string(),
            check_invariants: false,
            print_every: 0,
        }
    }
}

/// Builder pattern for book configuration
pub struct BookConfigBuilder {
    config: BookConfig,
}

impl BookConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: BookConfig::default(),
        }
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.config.depth = depth;
        self
    }

    pub fn default_symbol(mut self, symbol: &str) -> Self {
        self.config.default_symbol = symbol.to_uppercase();
        self
    }

    pub fn check_invariants(mut self, enabled: bool) -> Self {
        self.config.check_invariants = enabled;
        self
    }

    pub fn print_every(mut self, every: usize) -> Self {
        self.config.print_every = every;
        self
    }

    pub fn build(self) -> Result<BookConfig, BookError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for BookConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
