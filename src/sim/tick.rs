//! Frame driver
//!
//! `Game::tick` is the single per-frame entry point. Within a frame the order
//! is fixed: accumulate time, apply pointer input (start swipe or shot), run
//! the clock, update every active ball in index order, then the end-of-game
//! summary timer. Collision and sensor callbacks from the engine go through
//! `on_contact` / `on_rim_sensor_exit` between frames.

use glam::Vec3;

use super::ball::{BallLifecycle, BallPhase};
use super::body::{Contact, Surface, World};
use super::clock::{ClockEvent, GameClock};
use super::input::{PressEvent, Swipe, SwipeTracker};
use super::rack::{rack_positions, spawn_position};
use super::store::{GameStore, Snapshot};
use super::summary::GameSummary;
use crate::audio::{AudioCue, AudioManager, QueuedCue};
use crate::settings::Settings;

/// Things that happened during a frame, for logging and presentation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// First swipe started a game
    Started,
    /// Back to the idle screen
    Restarted,
    /// Shot accepted
    Shot { ball: usize, power: f32 },
    /// Ball changed phase
    BallPhase { ball: usize, phase: BallPhase },
    Make { ball: usize },
    Miss { ball: usize },
    /// Ball dropped out of the world and was parked
    FellOut { ball: usize },
    /// Resolved ball left the court
    BallRemoved { ball: usize },
    TimeUp,
    /// Final ball resolved
    GameOver,
    /// Result ready to show
    Finished(GameSummary),
}

/// Pointer input delivered with a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press(PressEvent),
    Release(PressEvent),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Presses and releases since the previous frame, in order
    pub pointer: Vec<PointerInput>,
    /// Restart button
    pub restart: bool,
}

impl TickInput {
    /// A whole swipe delivered in one frame
    pub fn swipe(start: PressEvent, end: PressEvent) -> Self {
        Self {
            pointer: vec![PointerInput::Press(start), PointerInput::Release(end)],
            restart: false,
        }
    }
}

/// The game: store, clock and per-ball lifecycles driven frame by frame
#[derive(Debug, Clone)]
pub struct Game {
    settings: Settings,
    store: GameStore,
    clock: GameClock,
    balls: Vec<BallLifecycle>,
    racks: Vec<Vec3>,
    swipes: SwipeTracker,
    audio: AudioManager,
    events: Vec<GameEvent>,
    /// Seconds since creation (sum of frame deltas)
    now: f64,
    /// Last rim position reported by the engine
    rim: Vec3,
    /// A game was started since the last restart
    started: bool,
    /// When the game-over state was first seen
    over_since: Option<f64>,
    summary: Option<GameSummary>,
    games_played: usize,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let store = GameStore::new(&settings);
        let clock = GameClock::new(settings.game_time, settings.display_interval);
        let racks = rack_positions(&settings);
        let balls = (0..store.total_balls())
            .map(|i| BallLifecycle::new(i, spawn_position(i, &racks, &settings)))
            .collect();
        let audio = AudioManager::new(&settings.audio);
        let rim = settings.ring_position;

        Self {
            settings,
            store,
            clock,
            balls,
            racks,
            swipes: SwipeTracker::new(),
            audio,
            events: Vec::new(),
            now: 0.0,
            rim,
            started: false,
            over_since: None,
            summary: None,
            games_played: 0,
        }
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn rim(&self) -> Vec3 {
        self.rim
    }

    pub fn racks(&self) -> &[Vec3] {
        &self.racks
    }

    pub fn balls(&self) -> &[BallLifecycle] {
        &self.balls
    }

    pub fn ball_phase(&self, index: usize) -> Option<BallPhase> {
        self.balls.get(index).map(|b| b.phase())
    }

    /// Waiting for the start swipe
    pub fn is_idle(&self) -> bool {
        !self.started
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// Score card headline, alternating wording between games
    pub fn headline(&self) -> Option<&'static str> {
        self.summary
            .as_ref()
            .map(|s| s.rating.headline(self.games_played))
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn drain_audio(&mut self) -> Vec<QueuedCue> {
        self.audio.drain()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Frame ===

    /// Advance one frame of `dt` seconds
    pub fn tick<W: World>(&mut self, world: &mut W, input: &TickInput, dt: f32) {
        let dt = dt.max(0.0);
        self.now += f64::from(dt);
        let now = self.now;

        if let Some(rim) = world.rim_position() {
            self.rim = rim;
        }

        if input.restart {
            self.restart_game(world);
        }

        for pointer in &input.pointer {
            match *pointer {
                PointerInput::Press(event) => self.swipes.press(event),
                PointerInput::Release(event) => {
                    if let Some(swipe) = self.swipes.release(event) {
                        self.on_swipe(world, swipe);
                    }
                }
            }
        }

        if self.clock.tick(now, &mut self.store) == Some(ClockEvent::TimeUp) {
            self.audio.play(AudioCue::Buzzer, now);
            self.events.push(GameEvent::TimeUp);
        }

        for (i, ball) in self.balls.iter_mut().enumerate() {
            if !self.store.ball(i).is_some_and(|b| b.active) {
                continue;
            }
            ball.update(
                world.ball_mut(i),
                &mut self.store,
                self.rim,
                dt,
                &self.settings,
                &mut self.events,
            );
        }

        self.update_summary(now);
    }

    fn update_summary(&mut self, now: f64) {
        if !self.started || self.summary.is_some() {
            return;
        }
        if !self.store.is_game_over() || self.store.is_playing() {
            self.over_since = None;
            return;
        }

        let since = *self.over_since.get_or_insert(now);
        if now - since < self.settings.result_delay {
            return;
        }

        let summary = GameSummary::from_store(&self.store, self.settings.success_threshold);
        let cue = if summary.success {
            AudioCue::Success
        } else {
            AudioCue::Fail
        };
        self.audio.play(cue, now);
        log::info!(
            "Final score: {}/{} in {} ({})",
            summary.makes,
            summary.total_shots,
            summary.elapsed_label(),
            summary.rating.headline(self.games_played)
        );
        self.summary = Some(summary);
        self.events.push(GameEvent::Finished(summary));
    }

    fn on_swipe<W: World>(&mut self, world: &mut W, swipe: Swipe) {
        if !self.started {
            if swipe.is_upward_enough(self.settings.min_vertical_delta) {
                self.start_game(world);
            }
            return;
        }

        let ball = self.store.current_ball();
        let Some(body) = world.ball_mut(ball) else {
            log::debug!("Shot ignored: no body for ball {ball}");
            return;
        };

        let gesture = swipe.at_ball(ball);
        match self
            .store
            .throw_ball(ball, &gesture, self.now, body, self.rim, &self.settings)
        {
            Ok(shot) => {
                self.audio.play(AudioCue::Throw, self.now);
                self.events.push(GameEvent::Shot {
                    ball,
                    power: shot.power,
                });
            }
            Err(reason) => log::debug!("Shot ignored: {reason}"),
        }
    }

    // === Game flow ===

    /// Start a fresh game, from idle or over a finished one
    pub fn start_game<W: World>(&mut self, world: &mut W) {
        let now = self.now;
        self.swipes.cancel();
        self.reset_balls(world);
        self.started = true;
        self.over_since = None;
        self.summary = None;
        self.games_played += 1;

        self.audio.enable();
        self.audio.play(AudioCue::Throw, now);

        self.clock.reset(self.settings.game_time, &mut self.store);
        self.store.reset_game(now);
        self.store.start();
        self.clock.start(now, &self.store);

        log::info!("Game {} started", self.games_played);
        self.events.push(GameEvent::Started);
    }

    /// Back to idle with every ball parked
    pub fn restart_game<W: World>(&mut self, world: &mut W) {
        self.clock.reset(self.settings.game_time, &mut self.store);
        self.store.reset_game(self.now);
        self.swipes.cancel();
        self.started = false;
        self.over_since = None;
        self.summary = None;
        self.reset_balls(world);

        log::info!("Game reset");
        self.events.push(GameEvent::Restarted);
    }

    /// Every lifecycle back to `Waiting` and every body parked
    fn reset_balls<W: World>(&mut self, world: &mut W) {
        for (i, ball) in self.balls.iter_mut().enumerate() {
            ball.reset();
            if let Some(body) = world.ball_mut(i) {
                ball.park(body);
            }
        }
    }

    // === Engine callbacks ===

    /// Collision start between a ball and something
    pub fn on_contact(&mut self, contact: Contact) {
        match contact.surface {
            // Quiet while a ball rises onto its rack
            Surface::Floor if contact.ball_y >= self.settings.bounce_min_height => {
                self.audio.play(AudioCue::Bounce, self.now);
            }
            Surface::Ring => {
                self.audio.play(AudioCue::Ring, self.now);
            }
            _ => {}
        }
    }

    /// A ball left the rim sensor
    pub fn on_rim_sensor_exit(&mut self, ball: usize, ball_y: f32) {
        if ball_y > self.rim.y - self.settings.make_depth {
            return;
        }
        if self.store.register_make(ball) {
            self.audio.play(AudioCue::Swish, self.now);
            self.events.push(GameEvent::Make { ball });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rack::park_position;
    use crate::sim::store::tests::RecordingBody;

    const DT: f32 = 1.0 / 60.0;

    struct StillWorld {
        bodies: Vec<RecordingBody>,
        rim: Option<Vec3>,
    }

    impl StillWorld {
        fn new(balls: usize) -> Self {
            Self {
                bodies: (0..balls).map(|_| RecordingBody::default()).collect(),
                rim: Some(Vec3::new(0.0, 3.0, -2.4)),
            }
        }
    }

    impl World for StillWorld {
        type Body = RecordingBody;

        fn ball_mut(&mut self, index: usize) -> Option<&mut RecordingBody> {
            self.bodies.get_mut(index)
        }

        fn rim_position(&self) -> Option<Vec3> {
            self.rim
        }
    }

    fn swipe_up(game: &Game) -> TickInput {
        let now = game.now();
        TickInput::swipe(
            PressEvent::new(300.0, 600.0, now - 0.125),
            PressEvent::new(300.0, 400.0, now),
        )
    }

    fn run(game: &mut Game, world: &mut StillWorld, seconds: f32) {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            game.tick(world, &TickInput::default(), DT);
        }
    }

    fn started_game(world: &mut StillWorld) -> Game {
        let mut game = Game::new(Settings::default());
        let input = swipe_up(&game);
        game.tick(world, &input, DT);
        game
    }

    #[test]
    fn test_idle_game_does_not_count_down() {
        let mut world = StillWorld::new(10);
        let mut game = Game::new(Settings::default());
        run(&mut game, &mut world, 5.0);

        assert!(game.is_idle());
        assert_eq!(game.snapshot().remaining_time, 24.0);
        assert!(!game.clock().is_running());
        assert!(game.drain_audio().is_empty());
    }

    #[test]
    fn test_swipe_starts_game() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);

        assert!(!game.is_idle());
        assert!(game.snapshot().is_playing);
        assert!(game.clock().is_running());
        assert!(game.drain_events().contains(&GameEvent::Started));
        let cues: Vec<AudioCue> = game.drain_audio().iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![AudioCue::Throw]);
        assert_eq!(game.ball_phase(0), Some(BallPhase::Entering));
        assert_eq!(game.ball_phase(1), Some(BallPhase::Waiting));
    }

    #[test]
    fn test_tap_does_not_start_game() {
        let mut world = StillWorld::new(10);
        let mut game = Game::new(Settings::default());
        let input = TickInput::swipe(
            PressEvent::new(300.0, 400.0, 0.0),
            PressEvent::new(350.0, 400.0, 0.1),
        );
        game.tick(&mut world, &input, DT);
        assert!(game.is_idle());
    }

    #[test]
    fn test_swipe_shoots_current_ball() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 1.0);
        assert_eq!(game.ball_phase(0), Some(BallPhase::Playing));

        let input = swipe_up(&game);
        game.tick(&mut world, &input, DT);

        let snap = game.snapshot();
        assert_eq!(snap.total_shots, 1);
        assert_eq!(snap.current_ball, 1);
        assert_eq!(world.bodies[0].impulses.len(), 1);
        assert!(
            game.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Shot { ball: 0, .. }))
        );
    }

    #[test]
    fn test_quick_second_swipe_ignored() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 1.0);

        let input = swipe_up(&game);
        game.tick(&mut world, &input, DT);
        game.tick(&mut world, &input, DT);
        assert_eq!(game.snapshot().total_shots, 1);
    }

    #[test]
    fn test_rim_exit_scores_once() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        game.drain_audio();

        // Still at rim height: not through yet
        game.on_rim_sensor_exit(0, 2.95);
        assert_eq!(game.snapshot().makes, 0);

        game.on_rim_sensor_exit(0, 2.8);
        game.on_rim_sensor_exit(0, 2.7);
        assert_eq!(game.snapshot().makes, 1);
        let cues: Vec<AudioCue> = game.drain_audio().iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![AudioCue::Swish]);
    }

    #[test]
    fn test_contact_cues() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 0.5);
        game.drain_audio();

        game.on_contact(Contact {
            ball: 0,
            surface: Surface::Floor,
            ball_y: 0.05,
        });
        assert!(game.drain_audio().is_empty());

        game.on_contact(Contact {
            ball: 0,
            surface: Surface::Floor,
            ball_y: 0.3,
        });
        run(&mut game, &mut world, 0.5);
        game.on_contact(Contact {
            ball: 0,
            surface: Surface::Ring,
            ball_y: 3.0,
        });
        game.on_contact(Contact {
            ball: 0,
            surface: Surface::Net,
            ball_y: 2.8,
        });
        let cues: Vec<AudioCue> = game.drain_audio().iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![AudioCue::Bounce, AudioCue::Ring]);
    }

    #[test]
    fn test_time_up_then_summary() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        game.drain_audio();
        game.drain_events();

        run(&mut game, &mut world, 24.5);
        let snap = game.snapshot();
        assert!(snap.is_time_up && snap.is_game_over && !snap.is_playing);
        assert_eq!(snap.remaining_time, 0.0);
        let events = game.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::TimeUp).count(), 1);
        assert!(game.summary().is_none());

        run(&mut game, &mut world, 1.6);
        let summary = *game.summary().expect("summary");
        assert_eq!(summary.makes, 0);
        assert!(!summary.success);
        assert_eq!(game.headline(), Some("Time's up!"));

        let cues: Vec<AudioCue> = game.drain_audio().iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![AudioCue::Buzzer, AudioCue::Fail]);
        assert!(
            game.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Finished(_)))
        );
    }

    #[test]
    fn test_restart_returns_to_idle() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 2.0);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        game.tick(&mut world, &input, DT);

        assert!(game.is_idle());
        let snap = game.snapshot();
        assert_eq!(snap.remaining_time, 24.0);
        assert!(!snap.is_playing && !snap.is_game_over);
        assert_eq!(game.ball_phase(0), Some(BallPhase::Waiting));
        assert_eq!(world.bodies[0].pos, park_position(0));
        assert!(!game.clock().is_running());
    }

    #[test]
    fn test_start_over_finished_game_resets_balls() {
        let mut world = StillWorld::new(10);
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 1.0);

        // Shoot ball 0 and let it fall past the rim
        let input = swipe_up(&game);
        game.tick(&mut world, &input, DT);
        world.bodies[0].pos = Vec3::new(0.0, 1.8, 0.0);
        world.bodies[0].vel = Vec3::new(0.0, -3.0, 0.0);
        run(&mut game, &mut world, 0.5);
        assert_eq!(game.ball_phase(0), Some(BallPhase::Exiting));

        run(&mut game, &mut world, 26.0);
        assert!(game.summary().is_some());

        game.start_game(&mut world);
        assert!(game.summary().is_none());
        assert_eq!(game.ball_phase(0), Some(BallPhase::Waiting));
        assert!((1..10).all(|i| world.bodies[i].pos == park_position(i)));

        run(&mut game, &mut world, 2.0);
        assert_eq!(game.ball_phase(0), Some(BallPhase::Playing));
        let snap = game.snapshot();
        assert!(snap.is_playing);
        assert_eq!((snap.current_ball, snap.total_shots), (0, 0));
        assert!(game.store().ball(0).is_some_and(|b| b.active));

        let input = swipe_up(&game);
        game.tick(&mut world, &input, DT);
        assert_eq!(game.snapshot().total_shots, 1);
    }

    #[test]
    fn test_missing_bodies_do_not_stall() {
        let mut world = StillWorld::new(0);
        world.rim = None;
        let mut game = started_game(&mut world);
        run(&mut game, &mut world, 2.0);

        assert_eq!(game.ball_phase(0), Some(BallPhase::Waiting));
        assert!(game.snapshot().is_playing);
        assert_eq!(game.rim(), Settings::default().ring_position);
    }
}
