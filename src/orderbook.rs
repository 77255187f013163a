//! Order book state management

use crate::{
    data::{BookDepth, BookTicker, Price, PriceLevel, Quantity, Side},
    error::{BookError, InvariantViolation},
    side::BookSide,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Depth-limited two-sided book for a single symbol
///
/// Fed by full snapshots (`replace`) and top-of-book ticks (`apply_bbo`).
/// Not synchronized: one writer per instance.
#[derive(Debug, Clone, PartialEq)]
pub struct BookEngine {
    bids: BookSide,
    asks: BookSide,
    capacity: usize,
}

impl BookEngine {
    /// Create an empty book with both sides pre-sized to `capacity` levels.
    pub fn new(capacity: usize) -> Self {
        Self {
            bids: BookSide::with_capacity(Side::Bid, capacity),
            asks: BookSide::with_capacity(Side::Ask, capacity),
            capacity,
        }
    }

    /// Configured depth hint.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard both sides and rebuild them from a snapshot in exchange
    /// order: bids highest first, asks lowest first.
    pub fn replace<B, A>(&mut self, bids: B, asks: A)
    where
        B: IntoIterator,
        B::Item: Into<PriceLevel>,
        A: IntoIterator,
        A::Item: Into<PriceLevel>,
    {
        self.bids.replace(bids);
        self.asks.replace(asks);

        debug_assert!(self.check_crossed().is_ok(), "{:?}", self.check_crossed());
    }

    /// Rebuild from a decoded depth payload.
    pub fn apply_depth(&mut self, depth: &BookDepth) {
        self.replace(&depth.bids, &depth.asks);
    }

    /// Apply a best bid/offer tick to both sides.
    pub fn apply_bbo(&mut self, ticker: &BookTicker) {
        self.bids.apply_top(ticker.best_bid_price, ticker.best_bid_qty);
        self.asks.apply_top(ticker.best_ask_price, ticker.best_ask_qty);

        debug_assert!(self.check_crossed().is_ok(), "{:?}", self.check_crossed());
    }

    /// `apply_depth` without debug-build assertions; the caller runs
    /// `validate()` itself.
    pub(crate) fn load_depth(&mut self, depth: &BookDepth) {
        self.bids.load(&depth.bids);
        self.asks.load(&depth.asks);
    }

    /// `apply_bbo` without debug-build assertions; the caller runs
    /// `validate()` itself.
    pub(crate) fn load_bbo(&mut self, ticker: &BookTicker) {
        self.bids.set_top(ticker.best_bid_price, ticker.best_bid_qty);
        self.asks.set_top(ticker.best_ask_price, ticker.best_ask_qty);
    }

    /// Empty both sides, keeping their storage.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// True if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Copy out both sides best first: bids descending, asks ascending.
    pub fn extract(&self) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
        (
            self.bids.iter().copied().collect(),
            self.asks.iter().copied().collect(),
        )
    }

    pub fn bid_side(&self) -> &BookSide {
        &self.bids
    }

    pub fn ask_side(&self) -> &BookSide {
        &self.asks
    }

    /// Bids best first, without allocating.
    pub fn bids(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.iter()
    }

    /// Asks best first, without allocating.
    pub fn asks(&self) -> impl Iterator<Item = &PriceLevel> {
        self.asks.iter()
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.best()
    }

    /// Get spread (difference between best ask and best bid)
    pub fn spread(&self) -> Option<Price> {
        let (bid, ask) = self.best_prices()?;
        Some(ask - bid)
    }

    /// Get mid price (average of best bid and ask)
    pub fn mid_price(&self) -> Option<Price> {
        let (bid, ask) = self.best_prices()?;
        Some((bid + ask) / Decimal::from(2))
    }

    /// Get the top `levels` of each side, best first
    pub fn depth(&self, levels: usize) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
        (
            self.bids.iter().take(levels).copied().collect(),
            self.asks.iter().take(levels).copied().collect(),
        )
    }

    /// Get total quantity over all known levels per side
    pub fn total_quantity(&self) -> (Quantity, Quantity) {
        let bid_qty = self.bids.iter().map(|level| level.quantity).sum();
        let ask_qty = self.asks.iter().map(|level| level.quantity).sum();
        (bid_qty, ask_qty)
    }

    /// Check order book integrity
    pub fn validate(&self) -> Result<(), BookError> {
        self.bids.check()?;
        self.asks.check()?;
        self.check_crossed()?;
        Ok(())
    }

    fn best_prices(&self) -> Option<(Price, Price)> {
        Some((self.bids.best()?.price, self.asks.best()?.price))
    }

    fn check_crossed(&self) -> Result<(), InvariantViolation> {
        match self.best_prices() {
            Some((bid, ask)) if bid >= ask => Err(InvariantViolation::Crossed { bid, ask }),
            _ => Ok(()),
        }
    }
}

impl Default for BookEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Books keyed by symbol, each created on first use with the same depth
#[derive(Debug, Clone, Default)]
pub struct BookManager {
    books: HashMap<String, BookEngine>,
    depth: usize,
}

impl BookManager {
    pub fn new(depth: usize) -> Self {
        Self {
            books: HashMap::new(),
            depth,
        }
    }

    /// Get or create the book for a symbol
    pub fn book_mut(&mut self, symbol: &str) -> &mut BookEngine {
        let depth = self.depth;
        self.books.entry(symbol.to_string()).or_insert_with(|| {
            tracing::debug!(symbol, depth, "tracking new book");
            BookEngine::new(depth)
        })
    }

    /// Get current book for a symbol
    pub fn get(&self, symbol: &str) -> Option<&BookEngine> {
        self.books.get(symbol)
    }

    /// Get best bid and ask prices
    pub fn best_bid_ask(&self, symbol: &str) -> Option<(Option<Price>, Option<Price>)> {
        self.books.get(symbol).map(|book| {
            (
                book.best_bid().map(|l| l.price),
                book.best_ask().map(|l| l.price),
            )
        })
    }

    /// Stop tracking a symbol, returning its last book
    pub fn remove(&mut self, symbol: &str) -> Option<BookEngine> {
        self.books.remove(symbol)
    }

    /// Get all tracked symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.books.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
