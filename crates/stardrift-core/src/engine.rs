//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{DistressSignal, Grid, Humanoid, MapId};
use crate::generation::VesselRegistry;
use crate::systems::*;

/// Handle to a scheduled timer, usable for cancellation.
pub type TimerId = u64;

/// Work to perform when a timer fires.
#[derive(Debug, Clone, Copy)]
pub enum TimerTask {
    /// Confirm a distress signal's provisional outcome.
    DistressDebounce { rule: Entity },
}

/// One pending delayed callback.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTimer {
    pub id: TimerId,
    /// Sim time at which to fire.
    pub fire_at: f64,
    pub task: TimerTask,
}

/// Single-threaded delayed-callback queue.
///
/// Timers fire on the simulation tick, never concurrently with it, and
/// handlers re-validate state rather than trusting the schedule. Not
/// persisted: pending timers are re-armed from component state after a
/// load.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<ScheduledTimer>,
    next_id: TimerId,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task and return its cancellation handle.
    pub fn schedule(&mut self, fire_at: f64, task: TimerTask) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(ScheduledTimer { id, fire_at, task });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Remove and return every timer due at `now`, in schedule order.
    pub fn pop_due(&mut self, now: f64) -> Vec<ScheduledTimer> {
        let mut due: Vec<ScheduledTimer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.fire_at <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
        due
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Simulation time in seconds since start
    pub sim_time: f64,
    /// Spawnable vessel content
    pub registry: VesselRegistry,
    /// Global broadcast log
    pub announcements: AnnouncementLog,
    /// Shipboard news feed
    pub news: NewsDesk,
    /// Delayed callbacks
    pub timers: TimerQueue,
    /// Grid → distress rule lookup
    pub distress_index: DistressIndex,

    // Allocators
    next_map_id: u32,
    next_grid_id: u32,

    // Configuration
    time_scale: f32,
}

impl SimulationEngine {
    /// The map permanent content plays out on. Spawned vessels get their
    /// own maps and FTL into this one.
    pub const DEFAULT_MAP: MapId = MapId(0);

    /// Create a new empty simulation with the built-in vessel content.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            registry: VesselRegistry::builtin(),
            announcements: AnnouncementLog::new(),
            news: NewsDesk::new(),
            timers: TimerQueue::new(),
            distress_index: DistressIndex::default(),
            next_map_id: 1,
            next_grid_id: 1,
            time_scale: 1.0,
        }
    }

    /// Rebuild an engine from a loaded save.
    ///
    /// The distress index is reconstructed from live rule components;
    /// timers start empty and re-arm from component state on the next
    /// update.
    pub fn from_loaded(loaded: crate::persistence::LoadedSimulation) -> Self {
        let distress_index = DistressIndex::rebuild(&loaded.world);
        Self {
            world: loaded.world,
            sim_time: loaded.sim_time,
            registry: loaded.registry,
            announcements: loaded.announcements,
            news: loaded.news,
            timers: TimerQueue::new(),
            distress_index,
            next_map_id: loaded.next_map_id,
            next_grid_id: loaded.next_grid_id,
            time_scale: loaded.time_scale,
        }
    }

    /// Snapshot the whole simulation to a writer.
    pub fn save_to<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_simulation(
            writer,
            &self.world,
            self.sim_time,
            self.time_scale,
            self.next_map_id,
            self.next_grid_id,
            &self.registry,
            &self.announcements,
            &self.news,
        )
    }

    /// Allocate a fresh, empty map.
    pub fn allocate_map(&mut self) -> MapId {
        let id = MapId(self.next_map_id);
        self.next_map_id += 1;
        id
    }

    /// Launch a distress signal event.
    pub fn start_distress_signal(
        &mut self,
        config: DistressConfig,
    ) -> Result<Entity, DistressStartError> {
        let mut rng = rand::thread_rng();
        self.start_distress_signal_with_rng(config, &mut rng)
    }

    /// Launch a distress signal event with a caller-supplied RNG, for
    /// deterministic scenarios.
    pub fn start_distress_signal_with_rng(
        &mut self,
        config: DistressConfig,
        rng: &mut impl Rng,
    ) -> Result<Entity, DistressStartError> {
        let fresh_map = self.allocate_map();
        start_distress_signal(
            &mut self.world,
            &self.registry,
            &mut self.distress_index,
            &mut self.announcements,
            config,
            fresh_map,
            Self::DEFAULT_MAP,
            &mut self.next_grid_id,
            self.sim_time,
            rng,
        )
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        let scaled = delta_seconds * self.time_scale;
        self.sim_time += scaled as f64;

        // Grid relocation (every frame)
        ftl_system(&mut self.world, scaled);

        // Life support loop (systems self-throttle per breath cycle)
        respirator_system(&mut self.world, scaled, self.sim_time);
        metabolism_system(&mut self.world, scaled);

        // Objective evaluation runs before the rule ticks so lazily
        // registered objectives are visible to the zero-objective check.
        evaluate_objectives(&mut self.world, &self.distress_index);

        let rules: Vec<Entity> = self
            .world
            .query::<&DistressSignal>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for rule in rules {
            distress_active_tick(
                &mut self.world,
                rule,
                &mut self.distress_index,
                &mut self.timers,
                &mut self.announcements,
                self.sim_time,
            );
        }

        // Delayed callbacks fire last, against fully settled state.
        for timer in self.timers.pop_due(self.sim_time) {
            match timer.task {
                TimerTask::DistressDebounce { rule } => handle_debounce_fired(
                    &mut self.world,
                    rule,
                    &mut self.distress_index,
                    &mut self.timers,
                    &mut self.announcements,
                    self.sim_time,
                ),
            }
        }
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Get current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Get current simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Count active distress signal events
    pub fn active_distress_signals(&self) -> usize {
        self.world.query::<&DistressSignal>().iter().count()
    }

    /// Count humanoid mobs in the simulation
    pub fn humanoid_count(&self) -> usize {
        self.world.query::<&Humanoid>().iter().count()
    }

    /// Count grids
    pub fn grid_count(&self) -> usize {
        self.world.query::<&Grid>().iter().count()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
