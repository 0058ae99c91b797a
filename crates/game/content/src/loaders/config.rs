//! Game configuration loader.

use std::path::Path;

use skirmish_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Every table is optional; missing keys keep their default tuning.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            max_decisions_per_turn = 4

            [ap]
            ap_per_speed = 2.0

            [combat.dual_wield]
            secondary = 0.4

            [stances.raised_guard]
            activation_ap = 12
            energy_per_tick = 6
            npc_switch_chance = 0.0
            lowers_on_block = true
            modifiers = { shield_block = 2.0 }
            "#,
        )
        .unwrap();

        let defaults = GameConfig::default();
        assert_eq!(config.max_decisions_per_turn, 4);
        assert_eq!(config.max_ap(20.0), 40);
        assert_eq!(config.combat.dual_wield.secondary, 0.4);
        assert_eq!(config.combat.dual_wield.primary, defaults.combat.dual_wield.primary);
        assert_eq!(config.stances.raised_guard.activation_ap, 12);
        assert_eq!(config.stances.raised_guard.modifiers.shield_block, 2.0);
        assert_eq!(config.stances.raised_guard.modifiers.dodge, 1.0);
        assert_eq!(config.costs, defaults.costs);
    }

    #[test]
    fn load_reads_file_and_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[perception]\nvision_range = 5").unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.perception.vision_range, 5);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[ap\nap_per_speed = ").unwrap();
        let error = ConfigLoader::load(broken.path()).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config TOML"));
    }
}
