// ============================================================================
// Basic Usage Example
// ============================================================================

use order_matcher::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Order Matcher Example ===\n");

    let engine = MatchingEngineBuilder::new("BTC-USD")
        .with_tick_size(Decimal::ONE)
        .build(Arc::new(LoggingEventHandler))
        .expect("valid configuration");

    println!("Created matching engine for {}\n", engine.get_instrument());

    println!("Adding sell orders...");
    for i in 0i64..5 {
        engine
            .submit(OrderRequest::limit(
                format!("seller_{}", i),
                Side::Sell,
                Decimal::from(50000 + i * 100),
                Decimal::ONE,
            ))
            .expect("resting sell");
    }

    println!("Adding buy orders...");
    for i in 0i64..5 {
        engine
            .submit(OrderRequest::limit(
                format!("buyer_{}", i),
                Side::Buy,
                Decimal::from(49900 - i * 100),
                Decimal::ONE,
            ))
            .expect("resting buy");
    }

    println!("\n=== Order Book Snapshot ===");
    let snapshot = engine.get_snapshot(5);

    println!("\nBids:");
    for level in &snapshot.bids {
        println!("  {} @ {} ({} orders)", level.quantity, level.price, level.order_count);
    }

    println!("\nAsks:");
    for level in &snapshot.asks {
        println!("  {} @ {} ({} orders)", level.quantity, level.price, level.order_count);
    }

    println!("\nSpread: {:?}", snapshot.spread);
    println!("Mid Price: {:?}", snapshot.mid_price);

    // Requests arriving as free text go through the same validation
    println!("\n=== Submitting Market Order ===");
    let raw = RawOrderRequest {
        id: "market_buyer".to_string(),
        side: "buy".to_string(),
        order_type: "MARKET".to_string(),
        price: None,
        quantity: Decimal::new(25, 1),
    };

    let outcome = OrderRequest::try_from(raw)
        .and_then(|request| engine.submit(request))
        .expect("market order accepted");

    println!("\nTrades:");
    for trade in &outcome.trades {
        println!(
            "  #{} {} bought from {}: {} @ {}",
            trade.sequence, trade.buy_order_id, trade.sell_order_id, trade.quantity, trade.price
        );
    }
    println!(
        "Filled {} / remaining {}",
        outcome.filled_quantity, outcome.remaining_quantity
    );

    match engine.best(Side::Sell) {
        Some(best) => println!("Best ask now {} @ {} ({})", best.quantity, best.price, best.id),
        None => println!("No asks left"),
    }

    let rejected = engine.submit(OrderRequest::limit(
        "bad_tick",
        Side::Buy,
        Decimal::new(499005, 1),
        Decimal::ONE,
    ));
    println!("\nOff-tick order: {:?}", rejected.err());

    println!("\n=== Final Order Book ===");
    let final_snapshot = engine.get_snapshot(10);
    println!("Bids: {} levels", final_snapshot.bids.len());
    println!("Asks: {} levels", final_snapshot.asks.len());
    println!("Spread: {:?}", final_snapshot.spread);
    println!("Trades recorded: {}", engine.list_trades_since(0).len());
}
