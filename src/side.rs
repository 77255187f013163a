//! One side of a depth-limited price-level book
//!
//! Levels are kept in a `Vec` with the best level at the tail: ascending
//! prices for bids, descending prices for asks. Top-of-book changes are then
//! pushes and truncations at the end of the vector, and the monotonic order
//! lets the uncrossing insert binary-search its cut point.

use crate::data::{Price, PriceLevel, Quantity, Side};
use crate::error::InvariantViolation;

/// Ordered, duplicate-free levels for one side of the book
#[derive(Debug, Clone, PartialEq)]
pub struct BookSide {
    side: Side,
    // worst..best
    levels: Vec<PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, 0)
    }

    /// Create a side with storage pre-sized to the exchange depth.
    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            levels: Vec::with_capacity(capacity),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Allocated storage, retained across `clear` and `replace`.
    pub fn capacity(&self) -> usize {
        self.levels.capacity()
    }

    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.last()
    }

    /// Levels best first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PriceLevel> + ExactSizeIterator {
        self.levels.iter().rev()
    }

    /// Levels in storage order, worst first.
    pub fn as_slice(&self) -> &[PriceLevel] {
        &self.levels
    }

    /// Drop all levels, keeping the allocation.
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Replace every level with a snapshot given best first, as the exchange
    /// sends it. Input order and uniqueness are trusted, not checked.
    pub fn replace<I>(&mut self, levels: I)
    where
        I: IntoIterator,
        I::Item: Into<PriceLevel>,
    {
        self.load(levels);

        debug_assert!(self.check().is_ok(), "{:?}", self.check());
    }

    /// `replace` without the debug-build order assertion.
    pub(crate) fn load<I>(&mut self, levels: I)
    where
        I: IntoIterator,
        I::Item: Into<PriceLevel>,
    {
        self.levels.clear();
        self.levels.extend(levels.into_iter().map(Into::into));
        self.levels.reverse();
    }

    /// Set a new best level, dropping every level it makes stale.
    ///
    /// An exchange only reports a new best price when the real top of book
    /// moved, so any stored level at or better than the new price no longer
    /// exists. A level at exactly the new price is re-added with the fresh
    /// quantity.
    pub fn apply_top(&mut self, price: Price, quantity: Quantity) {
        self.set_top(price, quantity);

        debug_assert!(self.check().is_ok(), "{:?}", self.check());
    }

    /// `apply_top` without the debug-build order assertion.
    pub(crate) fn set_top(&mut self, price: Price, quantity: Quantity) {
        let improves = self
            .levels
            .last()
            .map_or(true, |best| self.side.is_better(price, best.price));

        if !improves {
            let idx = self.cut_point(price);
            tracing::trace!(
                side = %self.side,
                %price,
                removed = self.levels.len() - idx,
                "uncrossing"
            );
            self.levels.truncate(idx);
        }
        self.levels.push(PriceLevel::new(price, quantity));
    }

    /// Index of the first stored level that is not strictly worse than `price`.
    ///
    /// Every candidate is classified against `price` explicitly, so a single
    /// remaining level lands on the correct side whether it is better, equal
    /// or worse.
    fn cut_point(&self, price: Price) -> usize {
        let side = self.side;
        self.levels
            .partition_point(|level| side.is_better(price, level.price))
    }

    /// Check strict monotonic order (which also rules out duplicate prices).
    pub fn check(&self) -> Result<(), InvariantViolation> {
        // storage index i holds the level i+1 places from the worst
        for (i, pair) in self.levels.windows(2).enumerate() {
            if !self.side.is_better(pair[1].price, pair[0].price) {
                return Err(InvariantViolation::Unordered {
                    side: self.side,
                    index: self.levels.len() - 1 - (i + 1),
                    price: pair[1].price,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BookSide {
    type Item = &'a PriceLevel;
    type IntoIter = std::iter::Rev<std::slice::Iter<'a, PriceLevel>>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bids(prices: &[Price]) -> BookSide {
        let mut side = BookSide::with_capacity(Side::Bid, 8);
        side.replace(prices.iter().map(|&p| (p, dec!(1))));
        side
    }

    fn asks(prices: &[Price]) -> BookSide {
        let mut side = BookSide::with_capacity(Side::Ask, 8);
        side.replace(prices.iter().map(|&p| (p, dec!(1))));
        side
    }

    fn prices(side: &BookSide) -> Vec<Price> {
        side.iter().map(|l| l.price).collect()
    }

    #[test]
    fn test_replace_stores_best_at_tail() {
        let side = bids(&[dec!(100), dec!(99), dec!(98)]);
        assert_eq!(side.as_slice()[2].price, dec!(100));
        assert_eq!(side.best().unwrap().price, dec!(100));

        let side = asks(&[dec!(101), dec!(102), dec!(103)]);
        assert_eq!(side.as_slice()[2].price, dec!(101));
        assert_eq!(side.best().unwrap().price, dec!(101));
    }

    #[test]
    fn test_cut_point_single_level() {
        // one stored level that is better than, equal to, or worse than the new price
        let side = bids(&[dec!(100)]);
        assert_eq!(side.cut_point(dec!(99)), 0);
        assert_eq!(side.cut_point(dec!(100)), 0);
        assert_eq!(side.cut_point(dec!(101)), 1);

        let side = asks(&[dec!(100)]);
        assert_eq!(side.cut_point(dec!(101)), 0);
        assert_eq!(side.cut_point(dec!(100)), 0);
        assert_eq!(side.cut_point(dec!(99)), 1);
    }

    #[test]
    fn test_cut_point_between_levels() {
        let side = bids(&[dec!(100), dec!(98), dec!(96)]);
        // storage: 96, 98, 100
        assert_eq!(side.cut_point(dec!(97)), 1);
        assert_eq!(side.cut_point(dec!(98)), 1);
        assert_eq!(side.cut_point(dec!(95)), 0);

        let side = asks(&[dec!(100), dec!(102), dec!(104)]);
        // storage: 104, 102, 100
        assert_eq!(side.cut_point(dec!(103)), 1);
        assert_eq!(side.cut_point(dec!(102)), 1);
        assert_eq!(side.cut_point(dec!(105)), 0);
    }

    #[test]
    fn test_apply_top_worse_than_every_level() {
        let mut side = bids(&[dec!(100), dec!(99)]);
        side.apply_top(dec!(90), dec!(4));
        assert_eq!(prices(&side), vec![dec!(90)]);
        assert_eq!(side.best().unwrap().quantity, dec!(4));
    }

    #[test]
    fn test_apply_top_on_single_level() {
        let mut side = asks(&[dec!(50)]);
        side.apply_top(dec!(50), dec!(7));
        assert_eq!(side.as_slice(), &[PriceLevel::new(dec!(50), dec!(7))]);

        side.apply_top(dec!(49), dec!(1));
        assert_eq!(prices(&side), vec![dec!(49), dec!(50)]);

        side.apply_top(dec!(51), dec!(2));
        assert_eq!(prices(&side), vec![dec!(51)]);
    }

    #[test]
    fn test_check_reports_duplicates() {
        let mut side = BookSide::new(Side::Ask);
        side.levels = vec![
            PriceLevel::new(dec!(3), dec!(1)),
            PriceLevel::new(dec!(2), dec!(1)),
            PriceLevel::new(dec!(2), dec!(1)),
        ];
        assert_eq!(
            side.check(),
            Err(InvariantViolation::Unordered {
                side: Side::Ask,
                index: 0,
                price: dec!(2),
            })
        );
    }
}
