//! Runner configuration read from the process environment.
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "crates/game/content/data";
const DEFAULT_ROSTER: &str = "courtyard";
const DEFAULT_MAX_STEPS: usize = 50_000;

/// Settings of one headless encounter run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    /// Balance file; `config.toml` of the data directory when unset.
    pub config_path: Option<PathBuf>,
    pub roster: String,
    pub seed: u64,
    pub max_steps: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            config_path: None,
            roster: DEFAULT_ROSTER.to_string(),
            seed: 0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_DATA_DIR` - Content directory (default: crates/game/content/data)
    /// - `SKIRMISH_CONFIG` - Balance TOML file (default: `<data dir>/config.toml`)
    /// - `SKIRMISH_ROSTER` - Encounter name under `encounters/` (default: courtyard)
    /// - `SKIRMISH_SEED` - RNG seed (default: 0)
    /// - `SKIRMISH_MAX_STEPS` - Driver steps before giving up (default: 50000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("SKIRMISH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.config_path = lookup("SKIRMISH_CONFIG").map(PathBuf::from);
        if let Some(roster) = lookup("SKIRMISH_ROSTER") {
            config.roster = roster;
        }
        if let Some(seed) = parse(&lookup, "SKIRMISH_SEED") {
            config.seed = seed;
        }
        if let Some(steps) = parse::<usize>(&lookup, "SKIRMISH_MAX_STEPS") {
            config.max_steps = steps.max(1);
        }

        config
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), CliConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("SKIRMISH_DATA_DIR", "/srv/data"),
            ("SKIRMISH_CONFIG", "/srv/hard.toml"),
            ("SKIRMISH_ROSTER", "ambush"),
            ("SKIRMISH_SEED", "99"),
            ("SKIRMISH_MAX_STEPS", "0"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.config_path, Some(PathBuf::from("/srv/hard.toml")));
        assert_eq!(config.roster, "ambush");
        assert_eq!(config.seed, 99);
        assert_eq!(config.max_steps, 1);
    }

    #[test]
    fn unparsable_numbers_keep_defaults() {
        let config = config_from(&[("SKIRMISH_SEED", "lucky"), ("SKIRMISH_MAX_STEPS", "-3")]);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
    }
}
