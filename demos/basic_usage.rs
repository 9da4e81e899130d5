// ============================================================================
// Basic Usage Example
// ============================================================================

use price_time_book::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), BookError> {
    println!("=== Price-Time Book Example ===\n");

    let book = BookBuilder::new("ETH")
        .with_tick_size(100u32)
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build()?;
    let shared = SharedBook::new(book);

    println!("Adding sell orders...");
    for i in 0u64..5 {
        shared.place_limit_order(10_000 + i * 100, Side::Ask, 10u64)?;
    }

    println!("Adding buy orders...");
    for i in 0u64..5 {
        shared.place_limit_order(9_900 - i * 100, Side::Bid, 10u64)?;
    }

    let snapshot = shared.snapshot(3);
    println!("\nTop of book:");
    println!("  Best bid: {:?}", snapshot.best_bid().map(ToString::to_string));
    println!("  Best ask: {:?}", snapshot.best_ask().map(ToString::to_string));
    println!("  Spread:   {:?}", snapshot.spread.map(|s| s.to_string()));

    println!("\nSubmitting market buy for 25...");
    for fill in shared.place_market_order(Side::Bid, 25u64)? {
        println!("  filled {} @ {}", fill.size_filled, fill.price);
    }

    println!("\nSubmitting market sell for 1000...");
    match shared.place_market_order(Side::Ask, 1_000u64) {
        Ok(_) => println!("  unexpectedly filled"),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("\nRemaining asks:");
    for level in shared.best_asks() {
        println!(
            "  {} x {} ({} orders)",
            level.price, level.aggregate_size, level.order_count
        );
    }

    Ok(())
}
