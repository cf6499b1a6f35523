pub mod play_match;
pub mod preset;
pub mod tournament;
pub mod trials;

use std::fs;
use std::path::Path;

use arena_mechanics::{Actor, GeneratorConfig, generate};
use arena_simulation::MatchConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Resolve the match config from a preset or a JSON file, then apply the seed override.
pub fn load_config(
    preset: Option<&str>,
    file: Option<&Path>,
    seed: Option<u64>,
) -> Result<MatchConfig, String> {
    let config = match (preset, file) {
        (Some(name), _) => arena_simulation::preset(name).map_err(|e| e.to_string())?,
        (None, Some(path)) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            MatchConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        (None, None) => MatchConfig::default(),
    };
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    log::debug!("using seed {}", config.seed);
    Ok(config)
}

/// Generate `count` competitors from the config's seed.
///
/// Returns the RNG so callers can keep drawing from the same stream.
fn generate_competitors(config: &MatchConfig, count: usize) -> Result<(Vec<Actor>, StdRng), String> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let actors = generate(&GeneratorConfig::default().with_count(count), &mut rng)
        .map_err(|e| format!("cannot generate competitors: {e}"))?;
    Ok((actors, rng))
}

/// Format simulated seconds as `m:ss`.
fn format_time(seconds: f64) -> String {
    let secs = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// A ten-segment bar for a 0..=1 ratio.
fn format_bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled))
}
