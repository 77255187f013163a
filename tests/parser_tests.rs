//! Parser tests against Binance payload samples

use binance_book::{
    data::*,
    error::ParseError,
    parser::*,
};
use rust_decimal_macros::dec;

const DEPTH_MESSAGE: &str = r#"{"lastUpdateId":34698491742,
    "bids":[["20078.54000000","0.00431000"],["20078.39000000","0.00100000"],["20078.27000000","0.00070000"]],
    "asks":[["20078.91000000","0.03437000"],["20078.95000000","0.00100000"]]}"#;

const TICKER_MESSAGE: &str = r#"{"u":34698491814,"s":"BTCUSDT","b":"20078.54000000","B":"0.00431000","a":"20078.91000000","A":"0.03497000"}"#;

#[test]
fn test_parse_depth() {
    let parser = BinanceParser::new();
    let depth = parser.parse_depth(DEPTH_MESSAGE).unwrap();

    assert_eq!(depth.last_update_id, 34698491742);
    assert_eq!(depth.symbol, None);
    assert_eq!(depth.bids.len(), 3);
    assert_eq!(depth.asks.len(), 2);
    assert_eq!(depth.bids[0], PriceLevel::new(dec!(20078.54), dec!(0.00431)));
    assert_eq!(depth.bids[2].price, dec!(20078.27));
    assert_eq!(depth.asks[1], PriceLevel::new(dec!(20078.95), dec!(0.001)));
}

#[test]
fn test_parse_ticker() {
    let parser = BinanceParser::new();
    let ticker = parser.parse_ticker(TICKER_MESSAGE).unwrap();

    assert_eq!(ticker.update_id, 34698491814);
    assert_eq!(ticker.symbol, "BTCUSDT");
    assert_eq!(ticker.best_bid(), PriceLevel::new(dec!(20078.54), dec!(0.00431)));
    assert_eq!(ticker.best_ask(), PriceLevel::new(dec!(20078.91), dec!(0.03497)));
}

#[test]
fn test_parse_message_detects_kind() {
    let parser = BinanceParser::new();

    match parser.parse_message(DEPTH_MESSAGE).unwrap() {
        FeedMessage::Depth(depth) => assert_eq!(depth.bids.len(), 3),
        other => panic!("expected depth, got {:?}", other),
    }

    let message = parser.parse_message(TICKER_MESSAGE).unwrap();
    assert_eq!(message.symbol(), Some("BTCUSDT"));
    assert!(matches!(message, FeedMessage::Ticker(_)));
}

#[test]
fn test_parse_combined_stream_envelope() {
    let parser = BinanceParser::new();
    let wrapped = format!(r#"{{"stream":"ethusdt@depth20@100ms","data":{}}}"#, DEPTH_MESSAGE);

    let message = parser.parse_message(&wrapped).unwrap();
    assert_eq!(message.symbol(), Some("ETHUSDT"));

    let wrapped = format!(r#"{{"stream":"btcusdt@bookTicker","data":{}}}"#, TICKER_MESSAGE);
    match parser.parse_message(&wrapped).unwrap() {
        FeedMessage::Ticker(ticker) => assert_eq!(ticker.symbol, "BTCUSDT"),
        other => panic!("expected ticker, got {:?}", other),
    }
}

#[test]
fn test_parse_ignores_extra_fields() {
    let parser = BinanceParser::new();
    let message = r#"{"e":"depthUpdate","lastUpdateId":1,"bids":[],"asks":[["1.5","2"]],"T":1700000000}"#;

    let depth = parser.parse_depth(message).unwrap();
    assert!(depth.bids.is_empty());
    assert_eq!(depth.asks, vec![PriceLevel::new(dec!(1.5), dec!(2))]);
}

#[test]
fn test_parse_invalid_json() {
    let parser = BinanceParser::new();
    let result = parser.parse_message(r#"{"lastUpdateId":1,"bids":["#);
    assert!(matches!(result, Err(ParseError::InvalidJson(_))));
}

#[test]
fn test_parse_unknown_message() {
    let parser = BinanceParser::new();

    let result = parser.parse_message(r#"{"result":null,"id":1}"#);
    assert!(matches!(result, Err(ParseError::UnknownMessage(_))));

    let result = parser.parse_ticker(DEPTH_MESSAGE);
    assert!(matches!(result, Err(ParseError::UnknownMessage(_))));
}

#[test]
fn test_parse_bad_decimal() {
    let parser = BinanceParser::new();
    let result = parser.parse_ticker(
        r#"{"u":1,"s":"BTCUSDT","b":"abc","B":"1","a":"2","A":"1"}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_stream_symbol() {
    assert_eq!(stream_symbol("btcusdt@depth20@100ms"), Some("BTCUSDT".to_string()));
    assert_eq!(stream_symbol("bnbbtc@bookTicker"), Some("BNBBTC".to_string()));
    assert_eq!(stream_symbol("ethusdt"), Some("ETHUSDT".to_string()));
    assert_eq!(stream_symbol("@depth"), None);
}
