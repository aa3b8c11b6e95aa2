use {
    crate::config::PERSISTENCE,
    crate::domain::Timeframe,
    crate::models::TogglesState,
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    std::fs::File,
    std::io::{BufReader, BufWriter},
    std::path::Path,
};

/// What survives between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub timeframe: Timeframe,
    pub toggles: TogglesState,
}

pub fn save_preferences(prefs: &Preferences, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(Path::new(PERSISTENCE.preferences.path));
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, prefs)?;

    #[cfg(debug_assertions)]
    if crate::config::DEBUG_FLAGS.log_preferences {
        log::info!("Saved preferences to {}", path.display());
    }
    Ok(())
}

/// A missing file yields defaults. A corrupt one is an error.
pub fn load_preferences(path: Option<&Path>) -> Result<Preferences> {
    let path = path.unwrap_or(Path::new(PERSISTENCE.preferences.path));
    if !path.exists() {
        return Ok(Preferences::default());
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let prefs = serde_json::from_reader(reader)
        .with_context(|| format!("decoding preferences from {}", path.display()))?;

    #[cfg(debug_assertions)]
    if crate::config::DEBUG_FLAGS.log_preferences {
        log::info!("Loaded preferences from {}", path.display());
    }
    Ok(prefs)
}
