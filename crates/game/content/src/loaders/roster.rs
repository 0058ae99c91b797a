//! Encounter roster loader.

use std::path::Path;

use crate::catalog::ItemCatalog;
use crate::encounter::{Encounter, EncounterSpec, RosterEntry, RosterUnit};
use crate::loaders::{LoadResult, read_file};

/// Loader for encounter rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Loads a roster and resolves its item names against `catalog`.
    pub fn load(path: &Path, catalog: &ItemCatalog) -> LoadResult<Encounter> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
    }

    pub fn parse(content: &str, catalog: &ItemCatalog) -> LoadResult<Encounter> {
        let spec: EncounterSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;
        Self::resolve(spec, catalog)
    }

    /// Resolves item names and `follow` references.
    ///
    /// Unknown item names, unknown or self `follow` targets and a roster
    /// without units are errors.
    pub fn resolve(spec: EncounterSpec, catalog: &ItemCatalog) -> LoadResult<Encounter> {
        if spec.units.is_empty() {
            anyhow::bail!("Encounter on map '{}' has no units", spec.map);
        }

        let names: Vec<&str> = spec.units.iter().map(|entry| entry.unit.name.as_str()).collect();
        let mut units = Vec::with_capacity(spec.units.len());
        for (index, entry) in spec.units.iter().enumerate() {
            let follow = match &entry.follow {
                None => None,
                Some(leader) => {
                    let found = names.iter().position(|name| name == leader);
                    match found {
                        Some(target) if target != index => Some(target),
                        _ => anyhow::bail!(
                            "Unit '{}' follows '{}', which is not another unit of the roster",
                            entry.unit.name,
                            leader
                        ),
                    }
                }
            };
            units.push(Self::resolve_entry(entry, follow, catalog)?);
        }

        Ok(Encounter {
            map: spec.map,
            units,
        })
    }

    fn resolve_entry(
        entry: &RosterEntry,
        follow: Option<usize>,
        catalog: &ItemCatalog,
    ) -> LoadResult<RosterUnit> {
        let lookup = |item: &str| {
            catalog.get(item).ok_or_else(|| {
                anyhow::anyhow!("Unknown item '{}' for unit '{}'", item, entry.unit.name)
            })
        };

        let equipped = entry
            .equipment
            .iter()
            .map(|(slot, item)| lookup(item.as_str()).map(|stats| (*slot, stats)))
            .collect::<LoadResult<Vec<_>>>()?;
        let carried = entry
            .carried
            .iter()
            .map(|item| lookup(item.as_str()))
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(RosterUnit {
            spec: entry.unit.clone(),
            equipped,
            carried,
            patrol: entry.patrol.clone(),
            follow,
        })
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Control, EquipSlot, ItemStats, Position, WeaponType};

    use super::*;

    fn catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.insert("sword", ItemStats::weapon(WeaponType::Sword, 6, 3.0));
        catalog.insert("buckler", ItemStats::shield(1.0, 4, 3.0));
        catalog
    }

    const ROSTER: &str = r#"(
        map: "yard",
        units: [
            (
                unit: (name: "hero", control: Human, position: (x: 1, y: 1), health: 40),
                equipment: {MainHand: "sword", OffHand: "buckler"},
            ),
            (
                unit: (name: "squire", faction: (0), position: (x: 2, y: 1), health: 20),
                carried: ["sword"],
                follow: Some("hero"),
            ),
            (
                unit: (name: "bandit", faction: (1), position: (x: 8, y: 1), health: 25),
                patrol: [(x: 8, y: 1), (x: 8, y: 5)],
            ),
        ],
    )"#;

    #[test]
    fn resolves_items_and_follow_targets() {
        let encounter = RosterLoader::parse(ROSTER, &catalog()).unwrap();

        assert_eq!(encounter.map, "yard");
        assert_eq!(encounter.units.len(), 3);

        let hero = &encounter.units[0];
        assert_eq!(hero.spec.control, Control::Human);
        assert_eq!(hero.equipped.len(), 2);
        assert_eq!(hero.equipped[0].0, EquipSlot::MainHand);

        let squire = &encounter.units[1];
        assert_eq!(squire.follow, Some(0));
        assert_eq!(squire.carried.len(), 1);

        let bandit = &encounter.units[2];
        assert_eq!(bandit.patrol, vec![Position::new(8, 1), Position::new(8, 5)]);
        assert_eq!(bandit.spec.control, Control::Autonomous);
    }

    #[test]
    fn unknown_items_are_reported_by_name() {
        let error = RosterLoader::parse(ROSTER, &ItemCatalog::new()).unwrap_err();
        assert!(error.to_string().contains("Unknown item 'sword'"));
    }

    #[test]
    fn follow_must_name_another_unit() {
        let roster = r#"(map: "yard", units: [
            (unit: (name: "loner", position: (x: 0, y: 0), health: 10), follow: Some("loner")),
        ])"#;
        let error = RosterLoader::parse(roster, &catalog()).unwrap_err();
        assert!(error.to_string().contains("follows 'loner'"));
    }

    #[test]
    fn empty_rosters_are_rejected() {
        let error = RosterLoader::parse(r#"(map: "yard", units: [])"#, &catalog()).unwrap_err();
        assert!(error.to_string().contains("no units"));
    }
}
