//! Grid relocation: FTL journeys and transponder control.

use hecs::{Entity, World};

use crate::components::{Color, FtlJourney, Grid, IffMarker, MapId, Vec2};

/// Seconds a grid spends in FTL before arriving.
pub const FTL_TRAVEL_TIME: f32 = 20.0;

/// Apply a transponder color to a grid, adding the marker if absent.
pub fn set_iff_color(world: &mut World, grid: Entity, color: Color) {
    if let Ok(mut iff) = world.get::<&mut IffMarker>(grid) {
        iff.color = color;
        return;
    }
    let _ = world.insert_one(grid, IffMarker { color });
}

/// Start an FTL journey toward a world position on a map.
///
/// Replaces any journey already in progress.
pub fn ftl_travel(
    world: &mut World,
    grid: Entity,
    destination: Vec2,
    dest_map: MapId,
    travel_time: f32,
) {
    let name = match world.get::<&Grid>(grid) {
        Ok(g) => g.name.clone(),
        Err(_) => {
            log::error!("FTL travel requested for an entity that is not a grid.");
            return;
        }
    };

    let _ = world.insert_one(
        grid,
        FtlJourney {
            destination,
            dest_map,
            remaining: travel_time,
        },
    );
    log::info!(
        "{} entered FTL toward {:.0}, {:.0}",
        name,
        destination.x,
        destination.y
    );
}

/// Advance in-flight journeys; grids relocate on arrival.
pub fn ftl_system(world: &mut World, dt: f32) {
    let mut arrived = Vec::new();

    for (entity, journey) in world.query_mut::<&mut FtlJourney>() {
        journey.remaining -= dt;
        if journey.remaining <= 0.0 {
            arrived.push((entity, journey.destination, journey.dest_map));
        }
    }

    for (entity, destination, dest_map) in arrived {
        if let Ok(mut grid) = world.get::<&mut Grid>(entity) {
            grid.origin = destination;
            grid.map = dest_map;
            log::info!("{} dropped out of FTL", grid.name);
        }
        let _ = world.remove_one::<FtlJourney>(entity);
    }
}
