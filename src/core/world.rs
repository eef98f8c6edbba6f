use std::f64::consts::TAU;

use tracing::{debug, error, trace, warn};

use crate::bodies::{BodyCore, BodyFlags, BodyId, BodyState, CelestialBody};
use crate::collision::{BroadPhase, CollisionPair, CollisionTracker, SweepAndPrune};
use crate::core::checkpoint::{BodyRecord, BodySnapshot, Checkpoint, Snapshot};
use crate::core::detect_collisions::detect_collisions;
use crate::core::diagnostics::{self, EnergyMonitor, EnergyReport};
use crate::core::events::{BodyCounts, EventQueue, TickTelemetry};
use crate::core::{BodyRegistry, FixedStepClock, FloatingOrigin, SimulationConfig};
use crate::error::{PhysicsError, StateField};
use crate::forces::{create_gravity, FieldSource, GravityAlgorithm, GravityCalculator};
use crate::integration::{create_integrator, IntegrationState, Integrator, IntegratorKind};
use crate::math::{wrap_angle, Vector3};
use crate::orbits::soi::{in_close_encounter, laplace_soi, InfluenceSource, SoiTracker};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Callback run after every successful tick
pub type TickObserver = Box<dyn FnMut(&TickTelemetry) + Send>;

/// Clock and frame state of an engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct EngineState {
    /// Simulation time, s
    pub time: f64,

    /// Completed ticks
    pub tick: u64,

    /// Banked frame time not yet simulated, s
    pub accumulator: f64,

    /// Offset consumers subtract from stored positions
    pub origin_offset: Vector3,

    /// Body anchoring the origin; `None` means automatic re-basing
    pub origin_body_id: Option<BodyId>,
}

/// The simulation engine: owns the bodies and advances them in fixed ticks
pub struct NBodyWorld {
    /// All registered bodies
    bodies: BodyRegistry,

    /// Configuration for the simulation
    config: SimulationConfig,

    gravity: Box<dyn GravityCalculator>,
    default_integrator: Box<dyn Integrator>,
    encounter_integrator: Box<dyn Integrator>,

    /// Set when the gravity structure no longer matches the stored positions
    field_dirty: bool,

    clock: FixedStepClock,
    origin: FloatingOrigin,
    soi: SoiTracker,
    broad_phase: Box<dyn BroadPhase>,
    collisions: CollisionTracker,

    /// Queue of simulation events
    events: EventQueue,

    energy_monitor: EnergyMonitor,
    observer: Option<TickObserver>,
    last_telemetry: Option<TickTelemetry>,

    /// The total elapsed simulation time
    time: f64,
    tick: u64,
}

impl NBodyWorld {
    /// Creates a new world with default settings
    pub fn new() -> Self {
        let config = SimulationConfig::default();
        Self::build(config)
    }

    /// Creates a new world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected simulation config");
            return Err(err);
        }
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyRegistry::new(),
            gravity: create_gravity(
                config.gravity_algorithm,
                config.barnes_hut_theta,
                config.octree_max_depth,
            ),
            default_integrator: create_integrator(config.default_integrator, config.rk45),
            encounter_integrator: create_integrator(config.close_encounter_integrator, config.rk45),
            field_dirty: true,
            clock: FixedStepClock::new(
                config.dt,
                config.time_scale,
                config.max_frame_dt,
                config.max_substeps_per_update,
            ),
            origin: FloatingOrigin::new(config.floating_origin_threshold),
            soi: SoiTracker::new(),
            broad_phase: Box::new(SweepAndPrune::new()),
            collisions: CollisionTracker::new(),
            events: EventQueue::new(),
            energy_monitor: EnergyMonitor::new(),
            observer: None,
            last_telemetry: None,
            time: 0.0,
            tick: 0,
            config,
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Returns the number of completed ticks
    pub fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Adds a body to the world and returns its id
    ///
    /// Fails without touching the registry if the id is taken or the body is
    /// physically invalid.
    pub fn add_body(&mut self, core: BodyCore, state: BodyState) -> Result<BodyId> {
        core.validate()?;
        state.validate(core.id())?;

        let state = BodyState {
            rotation: wrap_angle(state.rotation),
            ..state
        };
        let massive = core.is_massive();
        let id = self.bodies.insert(CelestialBody::new(core, state))?.clone();
        if massive {
            self.field_dirty = true;
        }

        debug!(body = %id, massive, "body added");
        Ok(id)
    }

    /// Removes a body; returns false if no body has that id
    pub fn remove_body(&mut self, id: &str) -> bool {
        let body = match self.bodies.remove(id) {
            Some(body) => body,
            None => return false,
        };

        if body.core().is_massive() {
            self.field_dirty = true;
            self.soi.forget_massive(id);
        } else {
            self.soi.forget_passive(id);
        }
        self.collisions.forget(id);

        if self.origin.anchor().map_or(false, |anchor| anchor == id) {
            self.origin.set_anchor(None);
        }

        debug!(body = %id, "body removed");
        true
    }

    /// Gets a reference to a body by its id
    pub fn get_body(&self, id: &str) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    /// All bodies in registration order
    pub fn get_all_bodies(&self) -> &[CelestialBody] {
        self.bodies.as_slice()
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Overwrites a body's state, discarding its integrator history
    pub fn set_body_state(&mut self, id: &str, state: BodyState) -> Result<()> {
        let body = self.bodies.get_body_mut(id)?;
        state.validate(body.id())?;

        *body.state_mut() = BodyState {
            rotation: wrap_angle(state.rotation),
            ..state
        };
        body.history.invalidate();
        if body.core().is_massive() {
            self.field_dirty = true;
        }
        Ok(())
    }

    /// Banks `frame_dt` of real time and runs the ticks it pays for
    ///
    /// Returns the number of ticks performed. The event queue is cleared
    /// first when at least one tick runs.
    ///
    /// If a tick fails the rest of the frame is abandoned: the failed tick's
    /// time goes back into the accumulator, the time of the ticks after it is
    /// dropped. The accumulator then holds at most one tick plus the frame's
    /// leftover fraction, so a retry reruns exactly the failed tick.
    pub fn update(&mut self, frame_dt: f64) -> Result<usize> {
        let plan = self.clock.plan(frame_dt)?;

        if plan.dropped > 0 {
            warn!(
                dropped_ticks = plan.dropped,
                cap = self.config.max_substeps_per_update,
                "substep cap reached, discarding banked time"
            );
        }

        if plan.ticks > 0 {
            self.events.clear();
        }

        let dt = self.config.dt;
        for done in 0..plan.ticks {
            self.clock.consume();
            if let Err(err) = self.advance(dt) {
                self.clock.refund();
                let unrun = plan.ticks - done - 1;
                self.clock.discard(unrun);
                warn!(tick = self.tick + 1, discarded_ticks = unrun, "tick failed, frame abandoned");
                return Err(err);
            }
        }

        Ok(plan.ticks as usize)
    }

    /// Runs exactly one tick of length `dt`, bypassing the accumulator
    ///
    /// Events are appended to the queue; use `get_events_mut().clear()` to
    /// drain them between calls.
    pub fn tick(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "tick length must be positive and finite, got {}",
                dt
            )));
        }
        self.advance(dt)
    }

    /// Fraction of a tick banked but not simulated, for render interpolation
    pub fn get_interpolation_alpha(&self) -> f64 {
        self.clock.alpha()
    }

    /// Massive bodies as field sources, in registry order
    fn field_sources(&self, positions: &[Vector3]) -> Vec<FieldSource> {
        let softening = self.config.softening_default;
        self.bodies
            .iter()
            .zip(positions)
            .filter(|(body, _)| body.core().is_massive())
            .map(|(body, &position)| {
                let core = body.core();
                FieldSource::new(position, core.mass(), core.mu(), core.softening_or(softening))
            })
            .collect()
    }

    fn rebuild_field(&mut self) {
        let positions: Vec<Vector3> = self.bodies.iter().map(|b| b.state().position).collect();
        let sources = self.field_sources(&positions);
        self.gravity.prepare(&sources);
        self.field_dirty = false;
    }

    /// Index of each body among the field sources
    fn source_indices(&self) -> Vec<Option<usize>> {
        let mut next = 0;
        self.bodies
            .iter()
            .map(|body| {
                body.core().is_massive().then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }

    /// Integrator for every body this tick, re-evaluated from scratch
    fn select_integrators(&self, sources: &[Option<usize>]) -> Vec<IntegratorKind> {
        let influence = influence_sources(&self.bodies);
        let factor = self.config.close_encounter_factor;
        let default_kind = self.default_integrator.kind();
        let encounter_kind = self.encounter_integrator.kind();

        self.bodies
            .iter()
            .zip(sources)
            .map(|(body, &source)| {
                if in_close_encounter(&body.state().position, &influence, factor, source) {
                    encounter_kind
                } else {
                    default_kind
                }
            })
            .collect()
    }

    fn integrator_for(&self, kind: IntegratorKind) -> &dyn Integrator {
        if kind == self.default_integrator.kind() {
            &*self.default_integrator
        } else {
            &*self.encounter_integrator
        }
    }

    /// One full tick. Nothing is committed unless every body stays finite.
    fn advance(&mut self, dt: f64) -> Result<()> {
        let time = self.time;

        if self.field_dirty {
            // Cached accelerations were taken in the old field
            self.invalidate_histories();
            self.rebuild_field();
        }

        let sources = self.source_indices();
        let kinds = self.select_integrators(&sources);

        let mut staged: Vec<IntegrationState> = self
            .bodies
            .iter()
            .zip(&kinds)
            .zip(&sources)
            .map(|((body, &kind), &source)| {
                let state = body.state();
                let core = body.core();
                let mut working =
                    IntegrationState::new(state.position, state.velocity, core.mass(), core.mu());

                // History is only reused by the scheme that produced it
                working.accel = match body.history.scheme {
                    Some(scheme) if scheme == kind => body.history.accel,
                    _ => None,
                };
                if working.accel.is_none() {
                    working.accel = Some(self.gravity.acceleration_at(&state.position, source));
                }
                working
            })
            .collect();

        // Non-split schemes step against the field at t
        {
            let gravity = &*self.gravity;
            for ((working, &kind), &source) in staged.iter_mut().zip(&kinds).zip(&sources) {
                if kind.is_split() {
                    continue;
                }
                let acceleration = |_t: f64, p: &Vector3| gravity.acceleration_at(p, source);
                self.integrator_for(kind).step(working, dt, time, &acceleration);
            }
        }

        // Massive split bodies drift together
        for ((working, &kind), source) in staged.iter_mut().zip(&kinds).zip(&sources) {
            if source.is_none() {
                continue;
            }
            if let Some(split) = self.integrator_for(kind).as_split() {
                let accel = working.accel.unwrap_or(Vector3::ZERO);
                split.advance(working, dt, accel);
            }
        }

        // Field at t + dt
        let positions: Vec<Vector3> = staged.iter().map(|working| working.position).collect();
        let field = self.field_sources(&positions);
        self.gravity.prepare(&field);

        {
            let gravity = &*self.gravity;
            for ((working, &kind), &source) in staged.iter_mut().zip(&kinds).zip(&sources) {
                let integrator = self.integrator_for(kind);
                match (source, integrator.as_split()) {
                    (Some(_), Some(split)) => {
                        let accel_new = gravity.acceleration_at(&working.position, source);
                        split.complete(working, dt, accel_new);
                    }
                    (None, Some(_)) => {
                        let acceleration = |_t: f64, p: &Vector3| gravity.acceleration_at(p, None);
                        integrator.step(working, dt, time, &acceleration);
                    }
                    (_, None) => {
                        working.accel = Some(gravity.acceleration_at(&working.position, source));
                    }
                }
            }
        }

        if let Err(err) = self.check_finite(&staged) {
            // The structure now describes positions that were never committed
            self.field_dirty = true;
            if let PhysicsError::NumericalDivergence { body, field, value, tick } = &err {
                error!(body = %body, %field, %value, tick, "numerical divergence, tick aborted");
            }
            return Err(err);
        }

        self.commit(&staged, &kinds);

        let now = time + dt;
        self.advance_rotation(dt);

        if self.config.enable_collisions {
            detect_collisions(
                self.bodies.as_slice(),
                &mut *self.broad_phase,
                &mut self.collisions,
                now,
                &mut self.events,
            );
        } else {
            self.collisions.clear();
        }

        if self.config.enable_soi {
            self.update_soi(now);
        }

        self.update_origin();

        self.time = now;
        self.tick += 1;

        self.emit_telemetry();
        Ok(())
    }

    fn check_finite(&self, staged: &[IntegrationState]) -> Result<()> {
        for (body, working) in self.bodies.iter().zip(staged) {
            let failed = if !working.position.is_finite() {
                Some((StateField::Position, working.position))
            } else if !working.velocity.is_finite() {
                Some((StateField::Velocity, working.velocity))
            } else {
                None
            };

            if let Some((field, value)) = failed {
                return Err(PhysicsError::NumericalDivergence {
                    body: body.id().clone(),
                    field,
                    value,
                    tick: self.tick + 1,
                });
            }
        }
        Ok(())
    }

    fn commit(&mut self, staged: &[IntegrationState], kinds: &[IntegratorKind]) {
        let encounter_kind = self.encounter_integrator.kind();

        for ((body, working), &kind) in self.bodies.iter_mut().zip(staged).zip(kinds) {
            if body.history.scheme.is_some() && body.history.scheme != Some(kind) {
                trace!(
                    body = %body.id(),
                    encounter = kind == encounter_kind,
                    integrator = %kind,
                    "integrator switched"
                );
            }

            let state = body.state_mut();
            state.position = working.position;
            state.velocity = working.velocity;
            body.history.accel = working.accel;
            body.history.scheme = Some(kind);
        }
    }

    fn advance_rotation(&mut self, dt: f64) {
        for body in self.bodies.iter_mut() {
            let period = body.core().rotation_period();
            if period != 0.0 {
                let state = body.state_mut();
                state.rotation = wrap_angle(state.rotation + TAU / period * dt);
            }
        }
    }

    fn update_soi(&mut self, timestamp: f64) {
        let influence = influence_sources(&self.bodies);
        let passives = self
            .bodies
            .passive()
            .filter(|body| body.core().flags().contains(BodyFlags::TRACK_SOI))
            .map(|body| (body.id(), body.state().position));

        let transitions = self.soi.update(passives, &influence, timestamp, self.tick + 1);
        for event in transitions {
            trace!(body = %event.body, from = ?event.from, to = ?event.to, "SOI transition");
            self.events.add_soi_event(event);
        }
    }

    fn update_origin(&mut self) {
        if let Some(anchor) = self.origin.anchor() {
            if let Some(body) = self.bodies.get(anchor.as_str()) {
                let position = body.state().position;
                self.origin.track(position);
            }
            return;
        }

        // First of equal masses wins
        let heaviest = self.bodies.massive().fold(None, |best: Option<&CelestialBody>, body| {
            match best {
                Some(current) if current.core().mass() >= body.core().mass() => Some(current),
                _ => Some(body),
            }
        });

        if let Some(body) = heaviest {
            let position = body.state().position;
            if self.origin.recenter(position) {
                debug!(body = %body.id(), offset = %position, "floating origin re-based");
            }
        }
    }

    fn emit_telemetry(&mut self) {
        let massive = self.bodies.massive().count();
        let energy = if self.config.telemetry_energy {
            let report = self.calculate_energy();
            self.energy_monitor.sample(report.total);
            Some(report)
        } else {
            None
        };

        let telemetry = TickTelemetry {
            time: self.time,
            tick: self.tick,
            body_counts: BodyCounts {
                massive,
                passive: self.bodies.len() - massive,
            },
            energy,
        };

        if let Some(observer) = self.observer.as_mut() {
            observer(&telemetry);
        }
        self.last_telemetry = Some(telemetry);
    }

    /// Clock and origin state
    pub fn get_state(&self) -> EngineState {
        EngineState {
            time: self.time,
            tick: self.tick,
            accumulator: self.clock.accumulator(),
            origin_offset: self.origin.offset(),
            origin_body_id: self.origin.anchor().cloned(),
        }
    }

    /// Kinetic, potential and total energy of the massive bodies
    pub fn calculate_energy(&self) -> EnergyReport {
        diagnostics::energy(self.bodies.as_slice())
    }

    /// Total energy of the massive bodies, J
    pub fn calculate_total_energy(&self) -> f64 {
        self.calculate_energy().total
    }

    /// Total angular momentum of the massive bodies about the stored origin
    pub fn calculate_angular_momentum(&self) -> Vector3 {
        diagnostics::angular_momentum(self.bodies.as_slice())
    }

    /// Total linear momentum of the massive bodies
    pub fn calculate_linear_momentum(&self) -> Vector3 {
        diagnostics::linear_momentum(self.bodies.as_slice())
    }

    /// Barycenter of the massive bodies in the stored frame
    pub fn calculate_center_of_mass(&self) -> Vector3 {
        diagnostics::center_of_mass(self.bodies.as_slice())
    }

    /// Records the current total energy and returns its drift from the first sample
    pub fn sample_energy(&mut self) -> f64 {
        let total = self.calculate_total_energy();
        self.energy_monitor.sample(total)
    }

    /// Worst relative energy drift recorded so far
    pub fn energy_drift(&self) -> f64 {
        self.energy_monitor.max_drift()
    }

    pub fn energy_monitor(&self) -> &EnergyMonitor {
        &self.energy_monitor
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<()> {
        self.clock.set_time_scale(time_scale)?;
        self.config.time_scale = time_scale;
        Ok(())
    }

    /// Swaps the default integrator and drops every acceleration history
    pub fn set_default_integrator(&mut self, kind: IntegratorKind) {
        self.default_integrator = create_integrator(kind, self.config.rk45);
        self.config.default_integrator = kind;
        self.invalidate_histories();
        debug!(integrator = %kind, "default integrator set");
    }

    /// Swaps the close-encounter integrator and drops every acceleration history
    pub fn set_close_encounter_integrator(&mut self, kind: IntegratorKind) {
        self.encounter_integrator = create_integrator(kind, self.config.rk45);
        self.config.close_encounter_integrator = kind;
        self.invalidate_histories();
        debug!(integrator = %kind, "close-encounter integrator set");
    }

    /// Switches the gravity strategy; the new structure is built on the next tick
    pub fn set_gravity_algorithm(&mut self, algorithm: GravityAlgorithm) {
        self.gravity = create_gravity(
            algorithm,
            self.config.barnes_hut_theta,
            self.config.octree_max_depth,
        );
        self.config.gravity_algorithm = algorithm;
        self.field_dirty = true;
        debug!(%algorithm, "gravity algorithm set");
    }

    /// Changes the Barnes-Hut opening angle
    pub fn set_barnes_hut_theta(&mut self, theta: f64) -> Result<()> {
        if !theta.is_finite() || theta < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "barnes_hut_theta must be non-negative and finite, got {}",
                theta
            )));
        }
        self.config.barnes_hut_theta = theta;
        self.set_gravity_algorithm(self.config.gravity_algorithm);
        Ok(())
    }

    fn invalidate_histories(&mut self) {
        for body in self.bodies.iter_mut() {
            body.history.invalidate();
        }
    }

    /// Anchors the floating origin to a body, or returns to automatic re-basing
    pub fn set_origin_body(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => {
                let body = self.bodies.get_body(id)?;
                let position = body.state().position;
                self.origin.set_anchor(Some(body.id().clone()));
                self.origin.track(position);
            }
            None => self.origin.set_anchor(None),
        }
        Ok(())
    }

    /// Converts a stored position into the current origin frame
    pub fn to_frame(&self, position: Vector3) -> Vector3 {
        self.origin.to_frame(position)
    }

    /// Current dominant massive body of a passive body
    pub fn dominant_body(&self, id: &str) -> Option<&BodyId> {
        self.soi.assignment(id)
    }

    /// Sets each massive child's SOI radius to its Laplace radius about its parent
    ///
    /// Uses the current separation as the semi-major axis. Returns how many
    /// bodies were updated.
    pub fn assign_laplace_soi_radii(&mut self) -> usize {
        let radii: Vec<(usize, f64)> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.core().is_massive())
            .filter_map(|(slot, body)| {
                let parent = self.bodies.get(body.core().parent_id()?.as_str())?;
                if !parent.core().is_massive() {
                    return None;
                }
                let distance = body.state().position.distance(&parent.state().position);
                let radius = laplace_soi(distance, body.core().mass(), parent.core().mass());
                (radius > 0.0).then_some((slot, radius))
            })
            .collect();

        let bodies = self.bodies.as_mut_slice();
        for &(slot, radius) in &radii {
            bodies[slot].core_mut().set_soi_radius(Some(radius));
        }
        radii.len()
    }

    /// Installs a callback run after every successful tick
    pub fn set_tick_observer(&mut self, observer: TickObserver) {
        self.observer = Some(observer);
    }

    pub fn clear_tick_observer(&mut self) {
        self.observer = None;
    }

    /// Telemetry of the most recent tick
    pub fn last_telemetry(&self) -> Option<&TickTelemetry> {
        self.last_telemetry.as_ref()
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Presentation snapshot for a transport layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            time: self.time,
            origin_offset: self.origin.offset().to_array(),
            bodies: self.bodies.iter().map(BodySnapshot::from).collect(),
        }
    }

    /// Full restorable state
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            config: self.config.clone(),
            state: self.get_state(),
            bodies: self
                .bodies
                .iter()
                .map(|body| BodyRecord {
                    core: body.core().clone(),
                    state: *body.state(),
                })
                .collect(),
            soi_assignments: self
                .soi
                .assignments()
                .map(|(body, dominant)| (body.clone(), dominant.clone()))
                .collect(),
            active_collisions: self
                .collisions
                .active_pairs()
                .map(|pair| (pair.body_a.clone(), pair.body_b.clone()))
                .collect(),
        }
    }

    /// Rebuilds an engine from a checkpoint
    ///
    /// Assignments and anchors that reference missing bodies are dropped.
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Result<Self> {
        let mut world = Self::with_config(checkpoint.config)?;

        for record in checkpoint.bodies {
            world.add_body(record.core, record.state)?;
        }

        let state = checkpoint.state;
        if !state.time.is_finite() || !state.origin_offset.is_finite() {
            return Err(PhysicsError::InvalidParameter(
                "checkpoint engine state must be finite".into(),
            ));
        }
        world.time = state.time;
        world.tick = state.tick;
        world.clock.set_accumulator(state.accumulator);

        let anchor = state
            .origin_body_id
            .filter(|id| world.bodies.contains(id.as_str()));
        world.origin.restore(state.origin_offset, anchor);

        let bodies = &world.bodies;
        let assignments: Vec<(BodyId, BodyId)> = checkpoint
            .soi_assignments
            .into_iter()
            .filter(|(body, dominant)| {
                bodies.get(body.as_str()).map_or(false, |b| !b.core().is_massive())
                    && bodies.get(dominant.as_str()).map_or(false, |b| b.core().is_massive())
            })
            .collect();
        world.soi.restore(assignments);

        let pairs: Vec<CollisionPair> = checkpoint
            .active_collisions
            .into_iter()
            .filter(|(a, b)| bodies.contains(a.as_str()) && bodies.contains(b.as_str()))
            .map(|(a, b)| CollisionPair::new(a, b))
            .collect();
        world.collisions.restore(pairs);

        debug!(bodies = world.body_count(), tick = world.tick, "restored from checkpoint");
        Ok(world)
    }

    /// Removes every body and resets the clock
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.soi.clear();
        self.collisions.clear();
        self.events.clear();
        self.energy_monitor.reset();
        self.clock.set_accumulator(0.0);
        self.origin = FloatingOrigin::new(self.config.floating_origin_threshold);
        self.last_telemetry = None;
        self.field_dirty = true;
        self.time = 0.0;
        self.tick = 0;
    }
}

/// Massive bodies as seen by the SOI tracker, in registry order
fn influence_sources(bodies: &BodyRegistry) -> Vec<InfluenceSource<'_>> {
    bodies
        .massive()
        .map(|body| InfluenceSource {
            id: body.id(),
            position: body.state().position,
            mass: body.core().mass(),
            radius: body.core().radius(),
            soi_radius: body.core().soi_radius(),
        })
        .collect()
}

impl Default for NBodyWorld {
    fn default() -> Self {
        Self::new()
    }
}
