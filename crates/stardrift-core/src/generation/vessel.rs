//! Vessel templates and spawning.
//!
//! Templates are data: which derelict to spawn, how bad its air is, who
//! is aboard and in what shape. The built-in set is embedded from
//! `data/vessel_manifest.json`; scenarios can register more at runtime.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use stardrift_logic::respiration::Atmosphere;
use stardrift_logic::vitals::Damage;

use crate::components::{
    ChemStream, DistressObjective, Grid, Humanoid, IffMarker, MapId, ObjectiveKind, Position,
    Respirator, SalvageCargo, Vec2, Vitals,
};

use super::{generate_person_name, generate_vessel_name};

/// Embedded vessel content, shared with the headless harness.
pub const VESSEL_MANIFEST: &str = include_str!("../../../../data/vessel_manifest.json");

/// Extent of random victim/cargo placement around the grid origin.
const PLACEMENT_SPREAD: f32 = 20.0;

/// Initial condition of one victim aboard a derelict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VictimSpec {
    pub brute: f32,
    pub burn: f32,
    pub toxin: f32,
    pub airloss: f32,
    /// Losing this victim ends the event outright.
    pub critical: bool,
}

impl VictimSpec {
    pub fn damage(&self) -> Damage {
        Damage::new(self.brute, self.burn, self.toxin, self.airloss)
    }
}

/// One piece of recoverable cargo aboard a derelict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoSpec {
    pub label: String,
}

/// A spawnable derelict vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselTemplate {
    pub id: String,
    /// Display name pattern; `{}` takes a random serial.
    pub name_template: String,
    pub atmosphere: Atmosphere,
    pub victims: Vec<VictimSpec>,
    pub cargo: Vec<CargoSpec>,
}

/// Vessel templates by id.
#[derive(Debug, Clone, Default)]
pub struct VesselRegistry {
    templates: HashMap<String, VesselTemplate>,
}

impl VesselRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The embedded manifest. A malformed manifest is a build defect;
    /// it logs and yields an empty registry rather than panicking.
    pub fn builtin() -> Self {
        match Self::from_json(VESSEL_MANIFEST) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("Embedded vessel manifest failed to parse: {}", e);
                Self::empty()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let templates: Vec<VesselTemplate> = serde_json::from_str(json)?;
        let mut registry = Self::empty();
        for template in templates {
            registry.register(template);
        }
        Ok(registry)
    }

    /// Add or replace a template.
    pub fn register(&mut self, template: VesselTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Option<&VesselTemplate> {
        self.templates.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn templates(&self) -> impl Iterator<Item = &VesselTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Instantiate a vessel template as a grid on `map`, with its victims
/// and cargo aboard. Returns the grid entity.
pub fn spawn_vessel(
    world: &mut World,
    template: &VesselTemplate,
    map: MapId,
    grid_id: u32,
    rng: &mut impl Rng,
) -> Entity {
    let name = generate_vessel_name(&template.name_template, rng);
    let grid = world.spawn((
        Grid::new(grid_id, name.clone(), map).with_atmosphere(template.atmosphere),
        IffMarker::default(),
    ));

    for spec in &template.victims {
        let objective = if spec.critical {
            DistressObjective::critical(ObjectiveKind::RescueVictim)
        } else {
            DistressObjective::new(ObjectiveKind::RescueVictim)
        };
        world.spawn((
            Humanoid,
            generate_person_name(rng),
            Vitals::new(spec.damage()),
            Respirator::default(),
            ChemStream::default(),
            objective,
            Position::on_grid(random_spot(rng), grid, grid_id),
        ));
    }

    for spec in &template.cargo {
        world.spawn((
            SalvageCargo {
                label: spec.label.clone(),
            },
            DistressObjective::new(ObjectiveKind::RecoverCargo),
            Position::on_grid(random_spot(rng), grid, grid_id),
        ));
    }

    log::info!(
        "Spawned vessel '{}' as {} with {} victims, {} cargo",
        template.id,
        name,
        template.victims.len(),
        template.cargo.len()
    );
    grid
}

fn random_spot(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(-PLACEMENT_SPREAD..PLACEMENT_SPREAD),
        rng.gen_range(-PLACEMENT_SPREAD..PLACEMENT_SPREAD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_manifest_parses() {
        let registry = VesselRegistry::builtin();
        assert!(!registry.is_empty());
        assert!(registry.get("derelict_kestrel").is_some());
        assert!(registry.get("derelict_meridian").is_some());
        assert!(registry.get("no_such_vessel").is_none());
    }

    #[test]
    fn test_spawn_vessel_populates_grid() {
        let mut world = World::new();
        let registry = VesselRegistry::builtin();
        let template = registry.get("derelict_kestrel").unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let grid = spawn_vessel(&mut world, template, MapId(5), 1, &mut rng);

        let grid_comp = world.get::<&Grid>(grid).unwrap();
        assert_eq!(grid_comp.map, MapId(5));
        assert_eq!(grid_comp.atmosphere, template.atmosphere);
        assert!(grid_comp.name.starts_with("SDV Kestrel "));
        drop(grid_comp);

        let victims = world
            .query::<(&Humanoid, &DistressObjective, &Position)>()
            .iter()
            .filter(|(_, (_, objective, position))| {
                objective.kind == ObjectiveKind::RescueVictim && position.grid == Some(grid)
            })
            .count();
        assert_eq!(victims, template.victims.len());

        let cargo = world
            .query::<(&SalvageCargo, &DistressObjective)>()
            .iter()
            .filter(|(_, (_, objective))| objective.kind == ObjectiveKind::RecoverCargo)
            .count();
        assert_eq!(cargo, template.cargo.len());

        // Exactly one critical objective aboard the kestrel.
        let critical = world
            .query::<&DistressObjective>()
            .iter()
            .filter(|(_, objective)| objective.critical)
            .count();
        assert_eq!(critical, 1);
    }
}
