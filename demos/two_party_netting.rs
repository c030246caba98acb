//! Bilateral and multilateral netting example.
//!
//! Demonstrates how the settlement engine reduces a settlement window's
//! net positions to a minimal set of pairwise credit transfers.

use rust_decimal::Decimal;
use settlement_engine::core::position::{RawAccount, RawAmount, RawParticipant, SettlementWindow};
use settlement_engine::netting::net;
use settlement_engine::validation::validate_window;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  settlement-engine: Netting Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    println!("━━━ Scenario: Bilateral ━━━\n");
    run_window(&[(1, "100000000"), (2, "-100000000")]);

    println!("\n━━━ Scenario: Five-party window ━━━\n");
    run_window(&[
        (1, "-10000000"),
        (2, "30000000"),
        (3, "-50000000"),
        (4, "70000000"),
        (5, "-40000000"),
    ]);
}

fn run_window(entries: &[(u64, &str)]) {
    let window = SettlementWindow {
        id: 1,
        state: "SETTLED".to_string(),
        participants: entries
            .iter()
            .map(|(id, amount)| RawParticipant {
                id: *id,
                accounts: vec![RawAccount {
                    id: *id,
                    net_settlement_amount: RawAmount {
                        amount: amount.to_string(),
                        currency: "USD".to_string(),
                    },
                }],
            })
            .collect(),
    };

    let positions = validate_window(&window).expect("window should validate");
    println!("Gross positions:");
    for position in &positions {
        println!(
            "  participant {:<4} {:>15} USD",
            position.participant_id(),
            position.amount()
        );
    }

    let matrix = net(&positions).expect("positions should net to completion");

    println!("\nNet transfers ({} of {} possible pairs):", matrix.transaction_count(), entries.len() * (entries.len() - 1));
    for (payer, payee, amount) in matrix.iter() {
        println!("  {payer} -> {payee}: {amount} {}", matrix.currency());
    }

    let gross_total: Decimal = positions
        .iter()
        .filter(|p| p.amount() > Decimal::ZERO)
        .map(|p| p.amount())
        .sum();
    println!("\nGross total owed:   {gross_total} USD");
    println!("Net control sum:    {} USD", matrix.control_sum());
}
