use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use arena_mechanics::{Actor, ActorId, Attributes};
use arena_simulation::{MatchConfig, run_trials};

pub fn run(
    config: &MatchConfig,
    skill_a: f64,
    skill_b: f64,
    count: u32,
    json: bool,
) -> Result<(), String> {
    let a = competitor(1, "Challenger", skill_a)?;
    let b = competitor(2, "Defender", skill_b)?;
    let summary = run_trials(&a, &b, config, count).map_err(|e| format!("trial error: {e}"))?;

    if json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("cannot serialize summary: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "  {} {count} matches {}",
        "Trials".bold(),
        format!("(seeds {}..)", config.seed).dimmed()
    );
    println!();
    println!(
        "  {} (skill {skill_a:.2}) wins {:.1}%",
        a.name.bold(),
        summary.win_rate_a() * 100.0
    );
    println!(
        "  {} (skill {skill_b:.2}) wins {:.1}%",
        b.name.bold(),
        summary.win_rate_b() * 100.0
    );
    if summary.draws > 0 {
        println!("  {} drawn", summary.draws);
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Method", "Matches"]);
    for (method, matches) in &summary.by_method {
        table.add_row(vec![method.to_string(), matches.to_string()]);
    }
    println!("{table}");
    Ok(())
}

fn competitor(id: u32, name: &str, skill: f64) -> Result<Actor, String> {
    if !(0.0..=1.0).contains(&skill) {
        return Err(format!("skill must be within [0, 1], got {skill}"));
    }
    let attributes = Attributes::with_skill(skill).map_err(|e| e.to_string())?;
    Ok(Actor::new(ActorId(id), name, attributes, 100, 100))
}
