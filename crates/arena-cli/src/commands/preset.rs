use arena_simulation::{PRESET_NAMES, preset};

pub fn run(name: &str) -> Result<(), String> {
    let config = preset(name)
        .map_err(|e| format!("{e} (available: {})", PRESET_NAMES.join(", ")))?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("cannot serialize preset: {e}"))?;
    println!("{json}");
    Ok(())
}
