//! End-of-battle report.
use anyhow::Result;
use battle_core::BattleOutcome;

/// Logs the outcome and prints it to stdout as JSON.
pub fn print_outcome(outcome: &BattleOutcome) -> Result<()> {
    let verdict = match (outcome.abandoned, outcome.victory) {
        (true, _) => "abandoned",
        (false, true) => "victory",
        (false, false) => "defeat",
    };
    tracing::info!(
        verdict,
        turns = outcome.turn_count,
        ally_damage = outcome.damage.allies,
        enemy_damage = outcome.damage.enemies,
        survivors = outcome.survivors.len(),
        "Battle over"
    );

    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}
