//! Routing of decoded feed messages into per-symbol books

use crate::{
    data::BookConfig,
    error::{BookError, ErrorReporter},
    orderbook::{BookEngine, BookManager},
    parser::{BinanceParser, FeedMessage, FeedParser},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a handled message did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Snapshot { symbol: String, bids: usize, asks: usize },
    Ticker { symbol: String },
}

impl FeedEvent {
    pub fn symbol(&self) -> &str {
        match self {
            FeedEvent::Snapshot { symbol, .. } | FeedEvent::Ticker { symbol } => symbol,
        }
    }
}

/// Message counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedStats {
    pub snapshots: u64,
    pub tickers: u64,
    pub parse_errors: u64,
    pub invariant_violations: u64,
    pub last_update: Option<DateTime<Utc>>,
}

impl FeedStats {
    pub fn messages(&self) -> u64 {
        self.snapshots + self.tickers
    }
}

/// Feeds raw market-data messages into the right book
///
/// With `check_invariants` set, messages bypass the debug-build assertions
/// of the book and every violation is counted and reported instead, in any
/// build. Update ids are recorded per symbol for inspection only; detecting
/// gaps and forcing a fresh snapshot is left to whoever drives the handler.
pub struct FeedHandler<P: FeedParser = BinanceParser> {
    config: BookConfig,
    parser: P,
    books: BookManager,
    last_update_ids: HashMap<String, u64>,
    stats: FeedStats,
}

impl FeedHandler<BinanceParser> {
    pub fn new(config: BookConfig) -> Self {
        Self::with_parser(config, BinanceParser::new())
    }
}

impl<P: FeedParser> FeedHandler<P> {
    pub fn with_parser(config: BookConfig, parser: P) -> Self {
        Self {
            books: BookManager::new(config.depth),
            config,
            parser,
            last_update_ids: HashMap::new(),
            stats: FeedStats::default(),
        }
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Decode one raw message and apply it.
    pub fn handle_message(&mut self, data: &str) -> Result<FeedEvent, BookError> {
        match self.parser.parse_message(data) {
            Ok(message) => self.apply(message),
            Err(e) => {
                self.stats.parse_errors += 1;
                let err = BookError::from(e);
                ErrorReporter::report_error(&err, None);
                Err(err)
            }
        }
    }

    /// Apply an already decoded message.
    pub fn apply(&mut self, message: FeedMessage) -> Result<FeedEvent, BookError> {
        let symbol = match message.symbol() {
            Some(symbol) if !symbol.is_empty() => symbol.to_uppercase(),
            _ => self.config.default_symbol.clone(),
        };

        let (event, update_id) = match message {
            FeedMessage::Depth(depth) => {
                let book = self.books.book_mut(&symbol);
                if self.config.check_invariants {
                    book.load_depth(&depth);
                } else {
                    book.apply_depth(&depth);
                }
                self.stats.snapshots += 1;
                tracing::debug!(
                    symbol = %symbol,
                    last_update_id = depth.last_update_id,
                    bids = depth.bids.len(),
                    asks = depth.asks.len(),
                    "snapshot applied"
                );
                (
                    FeedEvent::Snapshot {
                        symbol: symbol.clone(),
                        bids: depth.bids.len(),
                        asks: depth.asks.len(),
                    },
                    depth.last_update_id,
                )
            }
            FeedMessage::Ticker(ticker) => {
                let book = self.books.book_mut(&symbol);
                if self.config.check_invariants {
                    book.load_bbo(&ticker);
                } else {
                    book.apply_bbo(&ticker);
                }
                self.stats.tickers += 1;
                tracing::trace!(symbol = %symbol, update_id = ticker.update_id, "bbo applied");
                (FeedEvent::Ticker { symbol: symbol.clone() }, ticker.update_id)
            }
        };

        self.last_update_ids.insert(symbol.clone(), update_id);
        self.stats.last_update = Some(Utc::now());

        if self.config.check_invariants {
            if let Some(Err(err)) = self.books.get(&symbol).map(BookEngine::validate) {
                self.stats.invariant_violations += 1;
                ErrorReporter::report_error(&err, Some(&symbol));
            }
        }

        Ok(event)
    }

    /// Book for a symbol, if any message for it has been seen.
    pub fn book(&self, symbol: &str) -> Option<&BookEngine> {
        self.books.get(symbol)
    }

    pub fn books(&self) -> &BookManager {
        &self.books
    }

    /// Drop a symbol's levels so the next snapshot starts clean.
    pub fn reset(&mut self, symbol: &str) {
        if let Some(book) = self.books.remove(symbol) {
            tracing::info!(symbol, levels = book.bid_side().len() + book.ask_side().len(), "book reset");
        }
        self.last_update_ids.remove(symbol);
    }

    pub fn symbols(&self) -> Vec<String> {
        self.books.symbols()
    }

    /// Last exchange update id seen for a symbol.
    pub fn last_update_id(&self, symbol: &str) -> Option<u64> {
        self.last_update_ids.get(symbol).copied()
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }
}
