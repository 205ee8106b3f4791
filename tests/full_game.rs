use hoop_shot::AudioCue;
use hoop_shot::Settings;
use hoop_shot::demo::{Bot, Session};
use hoop_shot::sim::{BallPhase, Game, GameEvent, PressEvent, Rating, TickInput};

const FRAME: f32 = 1.0 / 60.0;

fn count(cues: &[AudioCue], cue: AudioCue) -> usize {
    cues.iter().filter(|c| **c == cue).count()
}

#[test]
fn test_perfect_bot_game_ends_on_last_ball() {
    let mut session = Session::new(Settings::default(), Some(Bot::new(1, 0.0)));
    let summary = session.run(FRAME, 40.0).expect("game finished");

    assert_eq!(summary.total_shots, 10);
    assert_eq!(summary.makes, 10);
    assert_eq!(summary.rating, Rating::Perfect);
    assert!(summary.success);
    assert!(summary.elapsed < 24.0);

    let snap = session.game.snapshot();
    assert!(snap.is_game_over && !snap.is_playing && !snap.is_time_up);
    assert!(snap.remaining_time > 0.0);
    assert_eq!(snap.current_ball, 9);

    assert!(session.history.contains(&GameEvent::GameOver));
    assert!(!session.history.contains(&GameEvent::TimeUp));

    // Start swipe plus one per shot
    assert_eq!(count(&session.cues, AudioCue::Throw), 11);
    assert_eq!(count(&session.cues, AudioCue::Swish), 10);
    assert_eq!(count(&session.cues, AudioCue::Buzzer), 0);
    assert_eq!(count(&session.cues, AudioCue::Success), 1);
}

fn swipe(game: &Game, dy: f32) -> TickInput {
    let now = game.now();
    TickInput::swipe(
        PressEvent::new(400.0, 700.0, now - 0.125),
        PressEvent::new(400.0, 700.0 - dy, now),
    )
}

#[test]
fn test_weak_last_shot_still_ends_game() {
    let mut session = Session::new(Settings::default(), None);
    let interval = session.game.settings().shot_interval();

    let mut summary = None;
    for _ in 0..3600 {
        let game = &session.game;
        let store = game.store();
        let ready = game.ball_phase(store.current_ball()) == Some(BallPhase::Playing)
            && game.now() - store.last_shot() > interval;
        let input = if game.is_idle() {
            swipe(game, 200.0)
        } else if store.is_playing() && ready {
            // A flick too short to lift the final ball
            let dy = if store.total_shots() == 9 { 50.0 } else { 200.0 };
            swipe(game, dy)
        } else {
            TickInput::default()
        };
        session.frame_with(&input, FRAME);

        if let Some(result) = session.game.summary() {
            summary = Some(*result);
            break;
        }
    }

    let summary = summary.expect("game finished");
    assert_eq!(summary.total_shots, 10);
    assert_eq!(summary.makes, 9);
    assert!(session.history.contains(&GameEvent::Miss { ball: 9 }));
    assert!(session.history.contains(&GameEvent::GameOver));
    assert!(!session.game.snapshot().is_time_up);
    assert_eq!(session.game.ball_phase(9), Some(BallPhase::Ended));
}

#[test]
fn test_idle_game_ends_on_time_up() {
    let mut session = Session::new(Settings::default(), Some(Bot::idle(1)));
    let summary = session.run(FRAME, 40.0).expect("game finished");

    assert_eq!(summary.rating, Rating::TimeUp);
    assert_eq!(summary.total_shots, 0);
    assert!((summary.elapsed - 24.0).abs() < 1e-9);

    let snap = session.game.snapshot();
    assert!(snap.is_time_up && snap.is_game_over && !snap.is_playing);
    assert_eq!(snap.remaining_time, 0.0);

    assert_eq!(count(&session.cues, AudioCue::Buzzer), 1);
    assert_eq!(count(&session.cues, AudioCue::Fail), 1);
    assert_eq!(
        session
            .history
            .iter()
            .filter(|e| **e == GameEvent::TimeUp)
            .count(),
        1
    );
}

#[test]
fn test_sloppy_bot_is_reproducible() {
    let play = |seed| {
        let mut session = Session::new(Settings::default(), Some(Bot::new(seed, 0.9)));
        let summary = session.run(FRAME, 40.0);
        (summary, session.game.snapshot())
    };

    let (a, snap_a) = play(11);
    let (b, snap_b) = play(11);
    assert_eq!(a, b);
    assert_eq!(snap_a, snap_b);

    let summary = a.expect("game finished");
    assert!(summary.makes <= summary.total_shots);
    assert!(summary.total_shots <= 10);
}

#[test]
fn test_restart_and_play_again() {
    let mut session = Session::new(Settings::default(), Some(Bot::new(5, 0.0)));
    session.run(FRAME, 40.0).expect("first game");

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    session.frame_with(&restart, FRAME);
    assert!(session.game.is_idle());
    assert!(session.game.summary().is_none());
    assert_eq!(session.game.snapshot().total_shots, 0);

    let summary = session.run(FRAME, 40.0).expect("second game");
    assert_eq!(summary.total_shots, 10);
    assert_eq!(count(&session.cues, AudioCue::Success), 2);
}

#[test]
fn test_without_player_nothing_happens() {
    let mut session = Session::new(Settings::default(), None);
    assert!(session.run(FRAME, 5.0).is_none());
    assert!(session.game.is_idle());
    assert!(session.cues.is_empty());
}
