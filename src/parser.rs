//! Message parsing and data conversion
//!
//! Decodes Binance partial-depth and book-ticker payloads, bare or wrapped
//! in a combined-stream envelope, into [`BookDepth`] and [`BookTicker`].

use crate::{
    data::{BookDepth, BookTicker, Price, PriceLevel, Quantity},
    error::ParseError,
};
use serde::Deserialize;

/// Decoded feed message
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Depth(BookDepth),
    Ticker(BookTicker),
}

impl FeedMessage {
    /// Symbol carried by the message, if the feed provided one.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            FeedMessage::Depth(depth) => depth.symbol.as_deref(),
            FeedMessage::Ticker(ticker) => Some(ticker.symbol.as_str()),
        }
    }
}

/// Trait for parsing raw feed text
pub trait FeedParser: Send + Sync {
    fn parse_message(&self, data: &str) -> Result<FeedMessage, ParseError>;
}

#[derive(Deserialize)]
struct RawDepth {
    #[serde(rename = "lastUpdateId")]
    last_update_id: u64,
    bids: Vec<(Price, Quantity)>,
    asks: Vec<(Price, Quantity)>,
}

#[derive(Deserialize)]
struct RawTicker {
    #[serde(rename = "u")]
    update_id: u64,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "b")]
    bid_price: Price,
    #[serde(rename = "B")]
    bid_qty: Quantity,
    #[serde(rename = "a")]
    ask_price: Price,
    #[serde(rename = "A")]
    ask_qty: Quantity,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Depth(RawDepth),
    Ticker(RawTicker),
}

#[derive(Deserialize)]
struct RawEnvelope {
    stream: String,
    data: RawPayload,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Wrapped(RawEnvelope),
    Bare(RawPayload),
}

impl RawDepth {
    fn into_depth(self) -> BookDepth {
        BookDepth {
            last_update_id: self.last_update_id,
            symbol: None,
            bids: self.bids.into_iter().map(PriceLevel::from).collect(),
            asks: self.asks.into_iter().map(PriceLevel::from).collect(),
        }
    }
}

impl RawTicker {
    fn into_ticker(self) -> BookTicker {
        BookTicker {
            update_id: self.update_id,
            symbol: self.symbol,
            best_bid_price: self.bid_price,
            best_bid_qty: self.bid_qty,
            best_ask_price: self.ask_price,
            best_ask_qty: self.ask_qty,
        }
    }
}

impl RawPayload {
    fn into_message(self) -> FeedMessage {
        match self {
            RawPayload::Depth(depth) => FeedMessage::Depth(depth.into_depth()),
            RawPayload::Ticker(ticker) => FeedMessage::Ticker(ticker.into_ticker()),
        }
    }
}

/// Binance spot market-data parser
#[derive(Debug, Clone, Copy, Default)]
pub struct BinanceParser;

impl BinanceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a bare partial-depth payload.
    pub fn parse_depth(&self, data: &str) -> Result<BookDepth, ParseError> {
        serde_json::from_str::<RawDepth>(data)
            .map(RawDepth::into_depth)
            .map_err(classify)
    }

    /// Parse a bare book-ticker payload.
    pub fn parse_ticker(&self, data: &str) -> Result<BookTicker, ParseError> {
        serde_json::from_str::<RawTicker>(data)
            .map(RawTicker::into_ticker)
            .map_err(classify)
    }
}

impl FeedParser for BinanceParser {
    fn parse_message(&self, data: &str) -> Result<FeedMessage, ParseError> {
        let raw: RawMessage = serde_json::from_str(data).map_err(classify)?;

        Ok(match raw {
            RawMessage::Bare(payload) => payload.into_message(),
            RawMessage::Wrapped(envelope) => {
                let mut message = envelope.data.into_message();
                if let FeedMessage::Depth(depth) = &mut message {
                    depth.symbol = stream_symbol(&envelope.stream);
                }
                message
            }
        })
    }
}

/// Symbol part of a stream name, e.g. `btcusdt@depth20@100ms` -> `BTCUSDT`.
pub fn stream_symbol(stream: &str) -> Option<String> {
    let symbol = stream.split('@').next()?.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_uppercase())
    }
}

fn classify(err: serde_json::Error) -> ParseError {
    if err.is_data() {
        ParseError::UnknownMessage(err.to_string())
    } else {
        ParseError::InvalidJson(err.to_string())
    }
}
