//! Chemical injection and metabolism.

use hecs::{Entity, World};

use stardrift_logic::chemistry;

use crate::components::{ChemStream, Humanoid, Injector, Vitals};

/// Why an injection was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum InjectError {
    /// The source entity carries no injector.
    NotAnInjector,
    /// The reservoir is empty.
    EmptySolution,
    /// The injector only accepts mob targets.
    InvalidTarget,
    /// The target has no bloodstream to inject into.
    NoChemStream,
    /// The target's bloodstream can't take any more.
    TargetFull,
}

/// Inject one dose from an injector into a target's bloodstream.
///
/// Returns the volume actually transferred.
pub fn inject(world: &mut World, injector: Entity, target: Entity) -> Result<f32, InjectError> {
    // Validate before touching anything.
    {
        let source = world
            .get::<&Injector>(injector)
            .map_err(|_| InjectError::NotAnInjector)?;
        if source.solution.is_empty() {
            return Err(InjectError::EmptySolution);
        }
        if source.only_mobs && world.get::<&Humanoid>(target).is_err() {
            return Err(InjectError::InvalidTarget);
        }
    }

    let target_space = world
        .get::<&ChemStream>(target)
        .map_err(|_| InjectError::NoChemStream)?
        .solution
        .available_volume();

    let mut source = world
        .get::<&mut Injector>(injector)
        .map_err(|_| InjectError::NotAnInjector)?;
    let dose = chemistry::injection_dose(
        source.transfer_amount,
        source.solution.total_volume(),
        target_space,
    );
    if dose <= 0.0 {
        return Err(InjectError::TargetFull);
    }

    let taken = source.solution.split(dose);
    drop(source);

    let mut stream = world
        .get::<&mut ChemStream>(target)
        .map_err(|_| InjectError::NoChemStream)?;
    for (id, qty) in &taken.reagents {
        stream.solution.add(id, *qty);
    }

    log::debug!(
        "Injected {:.1}u into entity {:?} ({} reagents)",
        dose,
        target,
        taken.reagents.len()
    );
    Ok(dose)
}

/// Burn bloodstream reagents down and apply their effects.
///
/// Dead mobs don't metabolise.
pub fn metabolism_system(world: &mut World, dt: f32) {
    for (_, (stream, vitals)) in world.query_mut::<(&mut ChemStream, &mut Vitals)>() {
        if vitals.is_dead() {
            continue;
        }

        let consumed = chemistry::metabolise(&mut stream.solution, stream.metabolism_rate, dt);
        for (id, used) in consumed {
            if let Some((kind, per_unit)) = chemistry::reagent_effect(&id) {
                vitals.damage.heal(kind, per_unit * used);
            }
        }
    }
}
