//! List universes command.

use anyhow::Result;
use screener_config::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let book = config.universe_book()?;

    println!("Ticker Universes");
    println!("═══════════════════════════════════════════════════════════");
    for (name, count) in book.summary() {
        println!("  {:<20} {:>4} tickers", name, count);
    }
    println!();
    println!("Use `scan --universe <name>` or `scan --ticker <symbol>`.");

    Ok(())
}
