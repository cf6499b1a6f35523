use std::thread;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use arena_mechanics::Side;
use arena_simulation::{
    FinishMethod, MatchConfig, MatchController, MatchEvent, MatchEventKind, MatchObserver,
    MatchResult, TickSnapshot,
};

/// How the match should be reported.
pub struct Output {
    pub verbose: bool,
    pub json: bool,
    pub live: bool,
    pub pace_ms: u64,
}

pub fn run(config: &MatchConfig, output: Output) -> Result<(), String> {
    let (mut actors, _) = super::generate_competitors(config, 2)?;
    let b = actors.pop().ok_or("competitor generation returned too few actors")?;
    let a = actors.pop().ok_or("competitor generation returned too few actors")?;

    let mut controller = MatchController::new(a, b, config.clone())
        .map_err(|e| format!("invalid match setup: {e}"))?;
    if output.live {
        controller.add_observer(LiveFeed {
            pace: Duration::from_millis(output.pace_ms),
        });
    }
    controller
        .run_to_completion()
        .map_err(|e| format!("match error: {e}"))?;

    let result = MatchResult::from_state(controller.state())
        .ok_or("match stopped before reaching a result")?;

    if output.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("cannot serialize result: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let [a, b] = &result.actors;
    println!(
        "  {} {} vs {} {}",
        "Match".bold(),
        a.name,
        b.name,
        format!("(seed={})", config.seed).dimmed()
    );
    println!();

    if output.verbose {
        let log = controller.events();
        println!("  {}", "Event Log".bold().underline());
        println!();
        if log.dropped() > 0 {
            println!("  {}", format!("({} earlier events not kept)", log.dropped()).dimmed());
        }
        for event in log.events() {
            let label = format!("[R{} #{:>3}]", event.round, event.tick).dimmed();
            println!("  {label} {}", colorize_event(event));
        }
        println!();
    }

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &MatchResult) {
    let verdict = match (result.winner_actor(), result.method) {
        (Some(winner), method) => format!("{} wins by {method}", winner.name).green().bold(),
        (None, FinishMethod::Draw) => "Draw".yellow().bold(),
        (None, _) => "No result".red().bold(),
    };
    println!(
        "  {verdict} {}",
        format!(
            "(round {}, {} actions, {})",
            result.round_number,
            result.ticks,
            super::format_time(result.elapsed_time)
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Competitor",
        "Health",
        "Stamina",
        "Score",
        "Landed",
        "Accuracy",
        "Damage",
        "Crits",
    ]);
    for side in Side::both() {
        let actor = &result.actors[side.index()];
        let stats = &result.stats[side.index()];
        table.add_row(vec![
            actor.name.clone(),
            format!("[{}] {}", super::format_bar(actor.health_ratio()), actor.health),
            format!("[{}] {}", super::format_bar(actor.stamina_ratio()), actor.stamina),
            actor.score.to_string(),
            format!("{}/{}", stats.landed, stats.attempts),
            format!("{:.0}%", stats.accuracy() * 100.0),
            stats.damage_dealt.to_string(),
            stats.criticals.to_string(),
        ]);
    }
    println!("{table}");
}

fn colorize_event(event: &MatchEvent) -> colored::ColoredString {
    let description = event.description.as_str();
    match &event.kind {
        MatchEventKind::MatchStarted | MatchEventKind::RoundStarted { .. } => description.cyan(),
        MatchEventKind::RoundEnded { .. } => description.blue(),
        MatchEventKind::Finished { .. } => description.bold(),
        MatchEventKind::Action { outcome } if outcome.critical => description.red().bold(),
        MatchEventKind::Action { outcome } if outcome.success => description.normal(),
        MatchEventKind::Action { .. } => description.dimmed(),
    }
}

/// Prints every event as it happens and paces the match.
struct LiveFeed {
    pace: Duration,
}

impl MatchObserver for LiveFeed {
    fn on_tick(&mut self, snapshot: &TickSnapshot<'_>) {
        if snapshot.outcome.is_some() {
            let [a, b] = snapshot.state.actors();
            println!(
                "           {} {}  {} {}",
                a.name.dimmed(),
                super::format_bar(a.health_ratio()),
                b.name.dimmed(),
                super::format_bar(b.health_ratio())
            );
        }
        thread::sleep(self.pace);
    }

    fn on_event(&mut self, event: &MatchEvent) {
        let label = format!("[R{} #{:>3}]", event.round, event.tick).dimmed();
        println!("{label} {}", colorize_event(event));
    }
}
