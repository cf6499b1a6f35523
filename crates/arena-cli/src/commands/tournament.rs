use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use arena_mechanics::ActorId;
use arena_simulation::{Bracket, MatchConfig};

pub fn run(config: &MatchConfig, entrants: usize, json: bool) -> Result<(), String> {
    let (actors, mut rng) = super::generate_competitors(config, entrants)?;
    let mut bracket = Bracket::new(actors).map_err(|e| e.to_string())?;
    bracket
        .run(config, &mut rng)
        .map_err(|e| format!("tournament error: {e}"))?;

    if json {
        let json = serde_json::to_string_pretty(&bracket.view())
            .map_err(|e| format!("cannot serialize bracket: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let roster = bracket.roster();
    let name_of = |id: ActorId| {
        roster
            .get(id)
            .map_or_else(|| id.to_string(), |a| a.name.clone())
    };

    println!(
        "  {} {} entrants {}",
        "Tournament".bold(),
        roster.len(),
        format!("(seed={})", config.seed).dimmed()
    );
    println!();

    for round in bracket.rounds() {
        println!("  {}", round.name.bold().underline());
        for slot in &round.matches {
            let Some(result) = &slot.result else {
                continue;
            };
            match (result.winner, result.loser) {
                (Some(winner), Some(loser)) => println!(
                    "    {} def. {} {}",
                    name_of(winner).green(),
                    name_of(loser),
                    format!("({}, round {})", result.method, result.round_number).dimmed()
                ),
                _ => println!("    {}", format!("no result ({})", result.method).red()),
            }
        }
        println!();
    }

    if let Some(champion) = bracket.champion() {
        println!("  {} {}", "Champion:".bold(), champion.name.green().bold());
        println!();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Competitor", "Skill", "W", "L"]);
    for (actor, record) in roster.standings() {
        table.add_row(vec![
            actor.name.clone(),
            format!("{:.2}", actor.attributes.skill),
            record.wins.to_string(),
            record.losses.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
