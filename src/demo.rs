//! Headless demo
//!
//! A toy point-mass world standing in for the real physics engine, a seeded
//! bot that swipes like a player, and a `Session` that runs them against a
//! `Game` frame by frame.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::AudioCue;
use crate::consts::{BALL_RADIUS, MAX_SUBSTEPS, RIM_SENSOR_RADIUS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{
    BallBody, BallPhase, Contact, Game, GameEvent, GameSummary, PressEvent, Surface, TickInput,
    World, park_position,
};

/// Ball mass (kg); scales launch impulses into velocities
pub const BALL_MASS: f32 = 0.113;
/// Rim tube radius (m)
pub const RING_TUBE_RADIUS: f32 = 0.02;
/// Rim circle radius (m)
pub const RING_RADIUS: f32 = 0.5;
/// Rim sensor half height (m)
pub const RIM_SENSOR_HALF_HEIGHT: f32 = 0.3;

const FLOOR_RESTITUTION: f32 = 0.55;
const RING_RESTITUTION: f32 = 0.5;
/// Horizontal speed kept per substep while touching the floor
const FLOOR_FRICTION: f32 = 0.98;
/// Slower floor impacts come to rest silently
const REST_SPEED: f32 = 0.5;

/// Point-mass ball body
#[derive(Debug, Clone, PartialEq)]
pub struct ToyBody {
    pub pos: Vec3,
    pub vel: Vec3,
    pub angvel: Vec3,
    pub mass: f32,
    in_sensor: bool,
}

impl ToyBody {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            mass: BALL_MASS,
            in_sensor: false,
        }
    }
}

impl BallBody for ToyBody {
    fn translation(&self) -> Vec3 {
        self.pos
    }

    fn linvel(&self) -> Vec3 {
        self.vel
    }

    fn set_translation(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    fn set_linvel(&mut self, vel: Vec3) {
        self.vel = vel;
    }

    fn set_angvel(&mut self, angvel: Vec3) {
        self.angvel = angvel;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.vel += impulse / self.mass;
    }
}

/// Collision output of one world step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    Contact(Contact),
    SensorExit { ball: usize, ball_y: f32 },
}

/// Gravity, a floor, a rim and the rim sensor
#[derive(Debug, Clone)]
pub struct ToyWorld {
    bodies: Vec<ToyBody>,
    rim: Vec3,
    gravity: f32,
    floor_threshold: f32,
    accumulator: f32,
}

impl ToyWorld {
    /// Every ball starts parked
    pub fn new(settings: &Settings) -> Self {
        Self {
            bodies: (0..settings.total_balls)
                .map(|i| ToyBody::new(park_position(i)))
                .collect(),
            rim: settings.ring_position,
            gravity: settings.shot.gravity,
            floor_threshold: settings.floor_threshold,
            accumulator: 0.0,
        }
    }

    pub fn body(&self, index: usize) -> Option<&ToyBody> {
        self.bodies.get(index)
    }

    /// Advance by a frame delta in fixed substeps
    pub fn step(&mut self, dt: f32) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.substep(SIM_DT, &mut events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn substep(&mut self, dt: f32, events: &mut Vec<WorldEvent>) {
        let rim = self.rim;
        for (i, body) in self.bodies.iter_mut().enumerate() {
            // Parked
            if body.pos.y < self.floor_threshold {
                continue;
            }

            body.vel.y -= self.gravity * dt;
            body.pos += body.vel * dt;

            // Floor
            if body.pos.y < BALL_RADIUS {
                body.pos.y = BALL_RADIUS;
                if body.vel.y < 0.0 {
                    let impact = -body.vel.y;
                    if impact > REST_SPEED {
                        events.push(WorldEvent::Contact(Contact {
                            ball: i,
                            surface: Surface::Floor,
                            ball_y: body.pos.y,
                        }));
                        body.vel.y = impact * FLOOR_RESTITUTION;
                    } else {
                        body.vel.y = 0.0;
                    }
                }
                body.vel.x *= FLOOR_FRICTION;
                body.vel.z *= FLOOR_FRICTION;
            }

            // Rim, as a thin torus
            let flat = Vec3::new(body.pos.x - rim.x, 0.0, body.pos.z - rim.z);
            let radial = flat.try_normalize().unwrap_or(Vec3::X);
            let closest = rim + radial * RING_RADIUS;
            let offset = body.pos - closest;
            let dist = offset.length();
            let reach = BALL_RADIUS + RING_TUBE_RADIUS;
            if dist < reach && dist > f32::EPSILON {
                let normal = offset / dist;
                body.pos = closest + normal * reach;
                let vn = body.vel.dot(normal);
                if vn < 0.0 {
                    body.vel -= (1.0 + RING_RESTITUTION) * vn * normal;
                    events.push(WorldEvent::Contact(Contact {
                        ball: i,
                        surface: Surface::Ring,
                        ball_y: body.pos.y,
                    }));
                }
            }

            // Rim sensor
            let inside = flat.length() < RIM_SENSOR_RADIUS
                && (body.pos.y - rim.y).abs() < RIM_SENSOR_HALF_HEIGHT;
            if body.in_sensor && !inside {
                events.push(WorldEvent::SensorExit {
                    ball: i,
                    ball_y: body.pos.y,
                });
            }
            body.in_sensor = inside;
        }
    }
}

impl World for ToyWorld {
    type Body = ToyBody;

    fn ball_mut(&mut self, index: usize) -> Option<&mut ToyBody> {
        self.bodies.get_mut(index)
    }

    fn rim_position(&self) -> Option<Vec3> {
        Some(self.rim)
    }
}

/// Screen point the bot starts its swipes from
const SWIPE_ORIGIN: (f32, f32) = (400.0, 700.0);
/// Swipe the shot model rates a full-power, on-tempo shot
const PERFECT_DY: f32 = 200.0;
const PERFECT_DURATION: f32 = 0.125;

/// Seeded player
#[derive(Debug, Clone)]
pub struct Bot {
    rng: Pcg32,
    /// 0 = perfect swipes, 1 = sloppy
    skill: f32,
    /// Only starts the game, never shoots
    idle: bool,
}

impl Bot {
    pub fn new(seed: u64, skill: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            skill: skill.clamp(0.0, 1.0),
            idle: false,
        }
    }

    /// A bot that starts the game and then watches the clock run out
    pub fn idle(seed: u64) -> Self {
        Self {
            idle: true,
            ..Self::new(seed, 0.0)
        }
    }

    fn jitter(&mut self, amplitude: f32) -> f32 {
        self.rng.random_range(-1.0f32..=1.0) * amplitude * self.skill
    }

    fn swipe(&mut self, now: f64) -> TickInput {
        let dx = self.jitter(20.0);
        let dy = PERFECT_DY + self.jitter(40.0);
        let duration = (PERFECT_DURATION + self.jitter(0.06)).max(0.01);

        let (x, y) = SWIPE_ORIGIN;
        TickInput::swipe(
            PressEvent::new(x, y, now - f64::from(duration)),
            PressEvent::new(x - dx, y - dy, now),
        )
    }

    /// Input for the next frame
    pub fn input(&mut self, game: &Game) -> TickInput {
        let now = game.now();
        if game.is_idle() {
            return self.swipe(now);
        }
        if self.idle {
            return TickInput::default();
        }

        let store = game.store();
        if !store.is_playing() {
            return TickInput::default();
        }
        let ready = game.ball_phase(store.current_ball()) == Some(BallPhase::Playing);
        let rested = now - store.last_shot() > game.settings().shot_interval();
        if ready && rested {
            self.swipe(now)
        } else {
            TickInput::default()
        }
    }
}

/// A game wired to the toy world, optionally played by a bot
#[derive(Debug, Clone)]
pub struct Session {
    pub game: Game,
    pub world: ToyWorld,
    bot: Option<Bot>,
    /// Every game event so far
    pub history: Vec<GameEvent>,
    /// Every audio cue so far
    pub cues: Vec<AudioCue>,
}

impl Session {
    pub fn new(settings: Settings, bot: Option<Bot>) -> Self {
        let world = ToyWorld::new(&settings);
        Self {
            game: Game::new(settings),
            world,
            bot,
            history: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// One frame: bot input, game tick, world step, collision callbacks
    pub fn frame(&mut self, dt: f32) {
        let input = match self.bot.as_mut() {
            Some(bot) => bot.input(&self.game),
            None => TickInput::default(),
        };
        self.frame_with(&input, dt);
    }

    /// One frame with explicit input
    pub fn frame_with(&mut self, input: &TickInput, dt: f32) {
        self.game.tick(&mut self.world, input, dt);

        for event in self.world.step(dt) {
            match event {
                WorldEvent::Contact(contact) => self.game.on_contact(contact),
                WorldEvent::SensorExit { ball, ball_y } => {
                    self.game.on_rim_sensor_exit(ball, ball_y)
                }
            }
        }

        for event in self.game.drain_events() {
            log::debug!("{:?}", event);
            self.history.push(event);
        }
        self.cues
            .extend(self.game.drain_audio().into_iter().map(|queued| queued.cue));
    }

    /// Run fixed frames until the result is in or `max_seconds` pass
    pub fn run(&mut self, frame_dt: f32, max_seconds: f64) -> Option<GameSummary> {
        let frames = (max_seconds / f64::from(frame_dt)).ceil() as u64;
        for _ in 0..frames {
            self.frame(frame_dt);
            if let Some(summary) = self.game.summary() {
                return Some(*summary);
            }
        }
        log::warn!("No result after {max_seconds:.1}s");
        None
    }
}
