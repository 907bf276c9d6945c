//! Spatial queries and grid attachment.
//!
//! Positions are grid-relative while attached and world coordinates while
//! detached. Everything that moves entities between those two frames goes
//! through here so the conversion happens in exactly one place.

use hecs::{Entity, World};

use crate::components::{Grid, MapId, Position, Vec2};

/// The grid an entity currently occupies, if any.
pub fn grid_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<&Position>(entity).ok().and_then(|pos| pos.grid)
}

/// Resolve an entity's map and world position.
///
/// Attached entities resolve through their grid's origin; a dangling grid
/// handle resolves to `None`.
pub fn world_position(world: &World, entity: Entity) -> Option<(MapId, Vec2)> {
    let pos = world.get::<&Position>(entity).ok()?;
    match pos.grid {
        Some(grid_entity) => {
            let grid = world.get::<&Grid>(grid_entity).ok()?;
            Some((grid.map, grid.origin + pos.local))
        }
        None => Some((pos.map, pos.local)),
    }
}

/// Detach an entity from its grid, keeping its world position.
pub fn detach_from_grid(world: &mut World, entity: Entity) {
    let Some((map, world_pos)) = world_position(world, entity) else {
        return;
    };

    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.grid = None;
        pos.grid_id = None;
        pos.map = map;
        pos.local = world_pos;
    }
}

/// Place a detached entity at a world position on a map.
pub fn place_on_map(world: &mut World, entity: Entity, map: MapId, position: Vec2) {
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.grid = None;
        pos.grid_id = None;
        pos.map = map;
        pos.local = position;
    }
}

/// Despawn a grid and everything still attached to it.
///
/// Callers that want to keep any of the grid's occupants must detach them
/// first; attachment at deletion time means going down with the ship.
pub fn delete_grid(world: &mut World, grid: Entity) {
    let attached: Vec<Entity> = world
        .query::<&Position>()
        .iter()
        .filter(|(_, pos)| pos.grid == Some(grid))
        .map(|(entity, _)| entity)
        .collect();

    for entity in attached {
        let _ = world.despawn(entity);
    }
    let _ = world.despawn(grid);
}
