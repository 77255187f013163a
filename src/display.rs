//! Diagnostic table rendering of a book
//!
//! ```text
//! [ 1] [ 0.00431] 20078.540 | 20078.910 [0.03497 ]
//! [ 2] [   0.001] 20078.390 | 20078.950 [0.001   ]
//! [ 3] [    ----]      ---- | 20078.990 [0.00498 ]
//! ```
//!
//! One row per level, best first; `----` stands in for a side that has run
//! out of known levels. Not used on the update path.
//!
//! Rows come from the same best-first view as [`BookEngine::extract`], read
//! through the borrowing [`BookEngine::bids`] / [`BookEngine::asks`]
//! iterators so rendering does not copy the book.

use crate::{data::PriceLevel, orderbook::BookEngine};
use std::fmt;

const PLACEHOLDER: &str = "----";

/// Fixed-width two-column view of a [`BookEngine`]
#[derive(Debug, Clone, Copy)]
pub struct BookTable<'a> {
    book: &'a BookEngine,
    price_decimals: u32,
}

impl<'a> BookTable<'a> {
    pub fn new(book: &'a BookEngine) -> Self {
        Self {
            book,
            price_decimals: 3,
        }
    }

    /// Decimal places used for prices (quantities are always normalized).
    pub fn price_decimals(mut self, decimals: u32) -> Self {
        self.price_decimals = decimals;
        self
    }

    fn price(&self, level: Option<&PriceLevel>) -> String {
        match level {
            Some(level) => {
                let mut price = level.price;
                price.rescale(self.price_decimals);
                price.to_string()
            }
            None => PLACEHOLDER.to_string(),
        }
    }

    fn quantity(level: Option<&PriceLevel>) -> String {
        match level {
            Some(level) => level.quantity.normalize().to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Display for BookTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.book.bid_side().len().max(self.book.ask_side().len());
        let mut bids = self.book.bids();
        let mut asks = self.book.asks();
        let mut cells: Vec<[String; 4]> = Vec::with_capacity(rows);
        for _ in 0..rows {
            let (bid, ask) = (bids.next(), asks.next());
            cells.push([
                Self::quantity(bid),
                self.price(bid),
                self.price(ask),
                Self::quantity(ask),
            ]);
        }

        let level_width = rows.to_string().len().max(2);
        let mut widths = [PLACEHOLDER.len(); 4];
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        for (row, [bid_qty, bid_px, ask_px, ask_qty]) in cells.iter().enumerate() {
            writeln!(
                f,
                "[{:>lw$}] [{:>w0$}] {:>w1$} | {:<w2$} [{:<w3$}]",
                row + 1,
                bid_qty,
                bid_px,
                ask_px,
                ask_qty,
                lw = level_width,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )?;
        }
        Ok(())
    }
}

impl BookEngine {
    /// Table view with default formatting.
    pub fn table(&self) -> BookTable<'_> {
        BookTable::new(self)
    }

    /// Render the book as a diagnostic table.
    pub fn to_table_string(&self) -> String {
        self.table().to_string()
    }
}

impl fmt::Display for BookEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table().fmt(f)
    }
}
