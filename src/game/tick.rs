//! Match Loop
//!
//! Per-frame orchestration of a duel. `MatchLoop` exclusively owns both
//! ships, every projectile and every area effect; hosts feed it one
//! `FrameInput` per frame and read back a `TickResult` and, when drawing,
//! a `FrameSnapshot`.
//!
//! Given identical archetypes, config and input sequences, the loop
//! produces identical state on the same machine (checked with
//! `compute_hash`).

use std::sync::Arc;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::frame::frames_to_secs;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::game::catalog::{CatalogError, ClassArchetype, ClassCatalog};
use crate::game::collision::{mark_projectile_clashes, mark_projectile_hits, splash_hits};
use crate::game::combatant::Combatant;
use crate::game::effect::{AreaEffect, EffectKind};
use crate::game::events::{GameEvent, HitKind};
use crate::game::input::{FrameInput, InputRecording};
use crate::game::projectile::Projectile;
use crate::game::snapshot::FrameSnapshot;
use crate::game::state::{MatchState, PlayerId, Playfield};

/// Result of a frame.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this frame, in priority order
    pub events: Vec<GameEvent>,
    /// Whether the match state changed this frame
    pub state_changed: bool,
    /// Whether the results delay elapsed this frame
    pub results_ready: bool,
}

/// Configuration for match simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Radius of an explosive round's blast
    pub explosion_radius: f32,
    /// Splash damage at the centre of a blast
    pub max_splash_damage: i32,
    /// Radius of the wreck effect left by a destroyed ship
    pub wreck_radius: f32,
    /// Seconds between the end of a match and `ResultsReady`
    pub results_delay_secs: f32,
    /// Distance of the spawn points from the top and bottom edges
    pub spawn_margin: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            explosion_radius: 50.0,
            max_splash_damage: 3,
            wreck_radius: 80.0,
            results_delay_secs: 1.0,
            spawn_margin: 50.0,
        }
    }
}

impl MatchConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A running duel.
#[derive(Clone, Debug)]
pub struct MatchLoop {
    combatants: [Combatant; 2],
    projectiles: Vec<Projectile>,
    effects: Vec<AreaEffect>,
    state: MatchState,
    tick: u32,
    bounds: Playfield,
    config: MatchConfig,
    archetypes: [Arc<ClassArchetype>; 2],
    /// Seconds left before `ResultsReady`, armed when the match ends
    results_delay: Option<f32>,
}

impl MatchLoop {
    /// Create a loop and start the first match.
    pub fn new(
        archetypes: (Arc<ClassArchetype>, Arc<ClassArchetype>),
        bounds: Playfield,
        config: MatchConfig,
    ) -> Self {
        let (first, second) = archetypes;
        let mut match_loop = Self {
            combatants: [
                Combatant::new(PlayerId::One, bounds.spawn_point(PlayerId::One, config.spawn_margin)),
                Combatant::new(PlayerId::Two, bounds.spawn_point(PlayerId::Two, config.spawn_margin)),
            ],
            projectiles: Vec::with_capacity(64),
            effects: Vec::with_capacity(8),
            state: MatchState::InProgress,
            tick: 0,
            bounds,
            config,
            archetypes: [first.clone(), second.clone()],
            results_delay: None,
        };
        match_loop.start_match(first, second);
        match_loop
    }

    /// Create a loop flying the catalog's default pair.
    pub fn with_catalog(
        catalog: &ClassCatalog,
        bounds: Playfield,
        config: MatchConfig,
    ) -> Result<Self, CatalogError> {
        let pair = catalog.default_pair().ok_or(CatalogError::Empty)?;
        Ok(Self::new(pair, bounds, config))
    }

    /// Start a fresh match with the given classes.
    ///
    /// Resets both ships to their spawns, clears projectiles and effects,
    /// cancels a pending results delay and returns to `InProgress`,
    /// whatever state the previous match was in.
    pub fn start_match(&mut self, first: Arc<ClassArchetype>, second: Arc<ClassArchetype>) {
        self.projectiles.clear();
        self.effects.clear();
        self.results_delay = None;
        self.state = MatchState::InProgress;
        self.tick = 0;

        let [one, two] = &mut self.combatants;
        one.set_archetype(first.clone(), Some(second.as_ref()));
        two.set_archetype(second.clone(), Some(first.as_ref()));
        for ship in self.combatants.iter_mut() {
            ship.reset(self.bounds.spawn_point(ship.id, self.config.spawn_margin));
        }

        info!("Match started: {} vs {}", first.name, second.name);
        self.archetypes = [first, second];
    }

    /// Start a fresh match with the same classes.
    pub fn restart(&mut self) {
        let [first, second] = self.archetypes.clone();
        self.start_match(first, second);
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current match state.
    pub fn current_state(&self) -> MatchState {
        self.state
    }

    /// Frames simulated since the match started.
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Ship of a seat.
    pub fn combatant(&self, player: PlayerId) -> &Combatant {
        &self.combatants[player.index()]
    }

    /// Both ships in seat order.
    pub fn combatants(&self) -> &[Combatant; 2] {
        &self.combatants
    }

    /// Projectiles in flight.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Active area effects.
    pub fn effects(&self) -> &[AreaEffect] {
        &self.effects
    }

    /// Current playfield.
    pub fn bounds(&self) -> Playfield {
        self.bounds
    }

    /// Match configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Whether the results delay is armed.
    pub fn results_pending(&self) -> bool {
        self.results_delay.is_some()
    }

    // =========================================================================
    // FRAME
    // =========================================================================

    /// Simulate one frame.
    pub fn tick(&mut self, input: &FrameInput) -> TickResult {
        let mut result = TickResult::default();
        let dt = input.clamped_delta();

        self.tick += 1;
        self.bounds = input.bounds;

        if self.state.is_terminal() {
            self.advance_aftermath(dt, &mut result);
            return result;
        }

        // 1. Sample and sanitize input
        let moves = [input.move_for(PlayerId::One), input.move_for(PlayerId::Two)];

        // 2. Ship-vs-ship knockback
        let [one, two] = &mut self.combatants;
        if one.check_collision(two) {
            one.resolve_collision(two);
        }

        // 3. Move ships
        for ship in self.combatants.iter_mut() {
            ship.update(dt, moves[ship.id.index()], &self.bounds);
        }

        // 4. Fire weapons off cooldown
        self.fire_weapons(&mut result);

        // 5-7. Projectiles, blasts, hits and clashes
        self.update_projectiles(dt, &mut result);

        // 8. Area effects
        self.update_effects(dt);

        // 9. Terminal check after all damage
        self.check_end_conditions(&mut result);

        #[cfg(feature = "debug-tracing")]
        trace!(
            tick = self.tick,
            projectiles = self.projectiles.len(),
            effects = self.effects.len(),
            "frame"
        );

        result.events.sort();
        result
    }

    fn fire_weapons(&mut self, result: &mut TickResult) {
        for ship in self.combatants.iter_mut() {
            if !ship.ready_to_fire() {
                continue;
            }

            let shots = ship.shoot();
            ship.shoot_timer = 0.0;

            if let Some(first) = shots.first() {
                result.events.push(GameEvent::projectile_fired(
                    self.tick,
                    ship.id,
                    first.weapon,
                    shots.len() as u8,
                ));
            }
            self.projectiles.extend(shots);
        }
    }

    fn update_projectiles(&mut self, dt: f32, result: &mut TickResult) {
        let tick = self.tick;
        let bounds = self.bounds;
        let mut marked = vec![false; self.projectiles.len()];
        let mut blasts = Vec::new();

        for (index, projectile) in self.projectiles.iter_mut().enumerate() {
            let signal = projectile.update(dt, &bounds);
            if signal.explode {
                blasts.push((projectile.position, projectile.owner));
            }
            if signal.remove {
                marked[index] = true;
            }
        }

        for (center, owner) in blasts {
            self.effects.push(AreaEffect::new(center, self.config.explosion_radius, EffectKind::Blast));
            result.events.push(GameEvent::explosion(tick, owner, center));

            let hits = splash_hits(
                center,
                owner,
                &self.combatants,
                self.config.explosion_radius,
                self.config.max_splash_damage,
            );
            for hit in hits {
                let ship = &mut self.combatants[hit.target.index()];
                ship.take_damage(hit.damage);
                debug!(target_ship = %hit.target, damage = hit.damage, distance = hit.distance, "Splash hit");
                result.events.push(GameEvent::combatant_hit(
                    tick,
                    hit.target,
                    owner,
                    HitKind::Splash,
                    hit.damage,
                    ship.health,
                ));
            }
        }

        for hit in mark_projectile_hits(&self.projectiles, &mut marked, &self.combatants) {
            let attacker = self.projectiles[hit.projectile].owner;
            let ship = &mut self.combatants[hit.target.index()];
            ship.take_damage(1);
            result.events.push(GameEvent::combatant_hit(
                tick,
                hit.target,
                attacker,
                HitKind::Direct,
                1,
                ship.health,
            ));
        }

        for (first, _) in mark_projectile_clashes(&self.projectiles, &mut marked) {
            result
                .events
                .push(GameEvent::projectiles_clashed(tick, self.projectiles[first].position));
        }

        let mut flags = marked.into_iter();
        self.projectiles.retain(|_| !flags.next().unwrap_or(false));
    }

    fn update_effects(&mut self, dt: f32) {
        self.effects.retain_mut(|effect| !effect.update(dt));
    }

    fn check_end_conditions(&mut self, result: &mut TickResult) {
        let [one, two] = &self.combatants;
        let Some(outcome) = MatchState::from_eliminations(one.health <= 0, two.health <= 0) else {
            return;
        };

        for ship in self.combatants.iter().filter(|ship| ship.health <= 0) {
            self.effects
                .push(AreaEffect::new(ship.position, self.config.wreck_radius, EffectKind::Wreck));
            result
                .events
                .push(GameEvent::combatant_destroyed(self.tick, ship.id, ship.position));
        }

        self.state = outcome;
        self.results_delay = Some(self.config.results_delay_secs);
        result.state_changed = true;
        result.events.push(GameEvent::match_ended(self.tick, outcome));

        info!("Match ended at frame {}: {}", self.tick, outcome);
    }

    /// Frames after the match ended: effects, death fades and the results
    /// delay only.
    fn advance_aftermath(&mut self, dt: f32, result: &mut TickResult) {
        self.update_effects(dt);
        for ship in self.combatants.iter_mut() {
            ship.advance_death(dt);
        }

        if let Some(remaining) = self.results_delay.as_mut() {
            *remaining -= frames_to_secs(dt);
            if *remaining <= 0.0 {
                self.results_delay = None;
                result.results_ready = true;
                result.events.push(GameEvent::results_ready(self.tick, self.state));
                debug!("Results ready at frame {}", self.tick);
            }
        }
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Read-only view of the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            state: self.state,
            bounds: self.bounds,
            combatants: [(&self.combatants[0]).into(), (&self.combatants[1]).into()],
            projectiles: self.projectiles.iter().map(Into::into).collect(),
            effects: self.effects.iter().map(Into::into).collect(),
        }
    }

    /// Digest of the full simulation state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u8(self.state.tag());

            for ship in &self.combatants {
                hasher.update_vec2(ship.position);
                hasher.update_vec2(ship.velocity);
                hasher.update_i32(ship.health);
                hasher.update_f32(ship.shoot_timer);
                hasher.update_vec2(ship.last_facing);
                hasher.update_bool(ship.alive);
                hasher.update_f32(ship.death_timer.unwrap_or(-1.0));
            }

            hasher.update_u32(self.projectiles.len() as u32);
            for p in &self.projectiles {
                hasher.update_u8(p.owner.number());
                hasher.update_u8(p.weapon as u8);
                hasher.update_vec2(p.position);
                hasher.update_vec2(p.velocity);
                hasher.update_f32(p.age);
                hasher.update_u32(p.bounces);
                hasher.update_bool(p.visible);
            }

            hasher.update_u32(self.effects.len() as u32);
            for e in &self.effects {
                hasher.update_vec2(e.position);
                hasher.update_f32(e.current_radius);
                hasher.update_f32(e.age);
            }

            hasher.update_f32(self.results_delay.unwrap_or(-1.0));
        })
    }
}

/// Replay a match from a recording.
///
/// Returns the loop after the last recorded frame and every event it
/// produced.
pub fn replay_match(
    archetypes: (Arc<ClassArchetype>, Arc<ClassArchetype>),
    config: MatchConfig,
    recording: &InputRecording,
) -> (MatchLoop, Vec<GameEvent>) {
    let mut match_loop = MatchLoop::new(archetypes, recording.bounds, config);
    let mut all_events = Vec::new();

    for input in recording.replay_iter() {
        let result = match_loop.tick(&input);
        all_events.extend(result.events);
    }

    (match_loop, all_events)
}
