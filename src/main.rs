use anyhow::Context;
use binance_book::{init_logging, BookConfig, FeedHandler};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Replay newline-delimited Binance depth/bookTicker JSON from a file
/// (first argument) or stdin, printing the resulting books.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = BookConfig::from_env().context("loading book configuration")?;
    tracing::info!(?config, "Binance book replay");

    let mut handler = FeedHandler::new(config);

    match std::env::args().nth(1) {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {}", path))?;
            replay(BufReader::new(file), &mut handler).await?;
        }
        None => replay(BufReader::new(tokio::io::stdin()), &mut handler).await?,
    }

    print_books(&handler);

    let stats = handler.stats();
    tracing::info!(
        snapshots = stats.snapshots,
        tickers = stats.tickers,
        parse_errors = stats.parse_errors,
        invariant_violations = stats.invariant_violations,
        "replay finished"
    );
    Ok(())
}

async fn replay<R>(reader: R, handler: &mut FeedHandler) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let print_every = handler.config().print_every as u64;
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("reading feed")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Err(e) = handler.handle_message(line) {
            tracing::warn!("skipping message: {}", e);
            continue;
        }

        if print_every > 0 && handler.stats().messages() % print_every == 0 {
            print_books(handler);
        }
    }
    Ok(())
}

fn print_books(handler: &FeedHandler) {
    for symbol in handler.symbols() {
        if let Some(book) = handler.book(&symbol) {
            println!("{} (u={})", symbol, handler.last_update_id(&symbol).unwrap_or_default());
            println!("{}", book);
        }
    }
}
