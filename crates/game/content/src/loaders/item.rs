//! Item catalog loader.

use std::path::Path;

use crate::catalog::ItemCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for item catalogs from RON files.
///
/// Stat block fields are optional and default to an unremarkable item, so a
/// catalog entry only lists what makes the item special.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{ItemCategory, WeaponType};

    use super::*;

    #[test]
    fn parses_partial_stat_blocks() {
        let catalog = ItemLoader::parse(
            r#"(items: {
                "spear": (category: Weapon, weapon_type: Spear, damage: 7, max_range: 2, weight: 3.0),
                "tonic": (category: Consumable, consumable: Some((heal: 10, energy: 20))),
            })"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let spear = catalog.get("spear").unwrap();
        assert_eq!(spear.weapon_type, WeaponType::Spear);
        assert!(spear.in_range(2));
        assert_eq!(spear.accuracy_modifier, 1.0);

        let tonic = catalog.get("tonic").unwrap();
        assert_eq!(tonic.category, ItemCategory::Consumable);
        assert_eq!(tonic.consumable.map(|effect| effect.heal), Some(10));
        assert!(catalog.get("missing").is_none());
    }
}
