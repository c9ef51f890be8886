//! Full runs through the fixture story.

use std::path::PathBuf;
use std::time::Duration;

use lesson_rules::{Act, ContentError, GameStatus, Pathway, SceneId, StoryBook};
use story_core::{PlayerInput, SessionConfig, SessionEvent, StoryError, StorySession};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn book() -> StoryBook {
    StoryBook::load(fixture("immune_response.toml")).expect("fixture story should load")
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn scene(session: &StorySession) -> &str {
    session
        .current_scene_id()
        .map(|id| id.as_str())
        .unwrap_or("<none>")
}

/// Play act1 up to and including the pathway choice.
fn play_act1(session: &mut StorySession, pathway: Pathway) {
    assert_eq!(scene(session), "intro");
    session.tick(ms(3000)).unwrap();
    assert_eq!(scene(session), "zoom_in");
    session.tick(ms(1500)).unwrap();
    assert_eq!(scene(session), "card_innate");
    session.handle(PlayerInput::Continue).unwrap();
    assert_eq!(scene(session), "q_first_responders");
    session.handle(PlayerInput::ChooseOption(0)).unwrap();
    assert_eq!(scene(session), "q_fever");
    session.handle(PlayerInput::AnswerTrueFalse(true)).unwrap();
    assert_eq!(scene(session), "q_barriers");
    session.handle(PlayerInput::SubmitSelection(vec![2, 0])).unwrap();
    assert_eq!(scene(session), "antigen_presentation");
    session.handle(PlayerInput::Continue).unwrap();
    assert_eq!(scene(session), "choose_defence");
    session.handle(PlayerInput::SelectPathway(pathway)).unwrap();
}

#[test]
fn fixture_story_is_valid() {
    let book = book();
    assert_eq!(book.title, "The Splinter");
    assert_eq!(book.scene_count(), 18);
    assert_eq!(StoryBook::question_count(&book.act1), 3);
    assert_eq!(StoryBook::question_count(&book.cell_mediated), 4);
    assert_eq!(StoryBook::question_count(&book.humoral), 4);
}

#[test]
fn cell_mediated_run_reaches_victory() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    play_act1(&mut session, Pathway::CellMediated);

    assert_eq!(session.act(), Act::Pathway);
    assert_eq!(scene(&session), "cm_briefing");
    let progress = session.progress();
    assert_eq!((progress.position, progress.total), (3, 7));

    session.handle(PlayerInput::Continue).unwrap();
    session
        .handle(PlayerInput::SubmitPairs(vec![(0, 0), (1, 1)]))
        .unwrap();
    session
        .handle(PlayerInput::SubmitOrder(vec![0, 1, 2]))
        .unwrap();
    assert_eq!(scene(&session), "cm_timing");

    session.tick(ms(500)).unwrap();
    session.handle(PlayerInput::Press).unwrap();
    session.tick(ms(1000)).unwrap();
    session.handle(PlayerInput::Press).unwrap();
    assert_eq!(scene(&session), "cm_gallery");

    session.handle(PlayerInput::Shoot(0)).unwrap();
    let events = session.handle(PlayerInput::Shoot(2)).unwrap();

    assert!(events.contains(&SessionEvent::Victory {
        answered: 7,
        mistakes: 0
    }));
    assert_eq!(session.act(), Act::Victory);
    assert_eq!(session.progress().percent(), 100);
    assert_eq!(session.lives().remaining, 3);
}

#[test]
fn humoral_run_reaches_victory() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    play_act1(&mut session, Pathway::Humoral);
    assert_eq!(session.pathway(), Some(Pathway::Humoral));

    session.tick(ms(2000)).unwrap();
    assert_eq!(scene(&session), "hu_fill");
    session
        .handle(PlayerInput::SubmitText("  Plasma Cell ".into()))
        .unwrap();

    session
        .handle(PlayerInput::Place { item: 0, target: 0 })
        .unwrap();
    session
        .handle(PlayerInput::Place { item: 1, target: 1 })
        .unwrap();
    session.handle(PlayerInput::SubmitPlacement).unwrap();
    assert_eq!(scene(&session), "hu_timed");

    session.tick(ms(1000)).unwrap();
    session.handle(PlayerInput::ChooseOption(0)).unwrap();
    assert_eq!(scene(&session), "hu_circle");

    session.tick(ms(1400)).unwrap();
    let events = session.handle(PlayerInput::Press).unwrap();
    assert!(events.iter().any(SessionEvent::is_terminal));
    assert_eq!(session.act(), Act::Victory);
}

#[test]
fn timeouts_drain_lives_to_game_over() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    session.jump_to(&SceneId::from("hu_timed")).unwrap();

    let first = session.tick(ms(5000)).unwrap();
    assert_eq!(
        first,
        vec![SessionEvent::AnswerRejected {
            scene: SceneId::from("hu_timed"),
            lives_remaining: 2
        }]
    );

    // The retry gets a fresh clock
    assert!(session.tick(ms(4999)).unwrap().is_empty());
    session.tick(ms(1)).unwrap();
    let last = session.tick(ms(5000)).unwrap();

    assert!(last.contains(&SessionEvent::GameOver {
        scene: SceneId::from("hu_timed")
    }));
    assert_eq!(session.act(), Act::GameOver);
    assert!(session.lives().is_depleted());
}

#[test]
fn missed_timing_bar_costs_a_life_and_resets() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    session.jump_to(&SceneId::from("cm_timing")).unwrap();

    // The cursor starts at 0, outside the 40..60 zone.
    assert!(session.handle(PlayerInput::Press).unwrap().is_empty());
    assert!(session.handle(PlayerInput::Press).unwrap().is_empty());
    let events = session.handle(PlayerInput::Press).unwrap();
    assert_eq!(
        events,
        vec![SessionEvent::AnswerRejected {
            scene: SceneId::from("cm_timing"),
            lives_remaining: 2
        }]
    );

    assert_eq!(scene(&session), "cm_timing");
    let interaction = session.interaction().unwrap();
    assert_eq!(interaction.game_status(), Some(GameStatus::Running));

    session.tick(ms(500)).unwrap();
    session.handle(PlayerInput::Press).unwrap();
    session.tick(ms(1000)).unwrap();
    let events = session.handle(PlayerInput::Press).unwrap();
    assert!(events.contains(&SessionEvent::AnswerAccepted {
        scene: SceneId::from("cm_timing"),
        attempts: 1
    }));
    assert_eq!(scene(&session), "cm_gallery");
}

#[test]
fn shrinking_circle_runs_out_then_retries() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    session.jump_to(&SceneId::from("hu_circle")).unwrap();

    let events = session.tick(ms(2000)).unwrap();
    assert_eq!(
        events,
        vec![SessionEvent::AnswerRejected {
            scene: SceneId::from("hu_circle"),
            lives_remaining: 2
        }]
    );

    // A fresh circle, back at full radius
    session.tick(ms(1400)).unwrap();
    let events = session.handle(PlayerInput::Press).unwrap();
    assert!(events.iter().any(SessionEvent::is_terminal));
    assert_eq!(session.act(), Act::Victory);
    assert_eq!(session.lives().remaining, 2);
}

#[test]
fn game_over_then_retry_pathway() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    play_act1(&mut session, Pathway::CellMediated);
    session.handle(PlayerInput::Continue).unwrap();

    for _ in 0..3 {
        session
            .handle(PlayerInput::SubmitPairs(vec![(0, 1), (1, 0)]))
            .unwrap();
    }
    assert_eq!(session.act(), Act::GameOver);
    let frozen = session.progress();

    let events = session.retry_pathway().unwrap();
    assert_eq!(events[0], SessionEvent::Restarted);
    assert_eq!(scene(&session), "cm_briefing");
    assert_eq!(session.lives().remaining, 3);
    assert_eq!(session.progress(), frozen);
}

#[test]
fn progress_never_decreases() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    let mut last = session.progress().ratio();
    let mut check = |session: &StorySession| {
        let now = session.progress().ratio();
        assert!(now >= last, "progress dropped from {last} to {now}");
        last = now;
    };

    session.tick(ms(3000)).unwrap();
    check(&session);
    session.handle(PlayerInput::Continue).unwrap();
    check(&session);
    session.handle(PlayerInput::Continue).unwrap();
    check(&session);
    session.handle(PlayerInput::ChooseOption(2)).unwrap();
    check(&session);
    session.handle(PlayerInput::ChooseOption(0)).unwrap();
    check(&session);
    session.handle(PlayerInput::AnswerTrueFalse(true)).unwrap();
    check(&session);
    session.handle(PlayerInput::SubmitSelection(vec![0, 2])).unwrap();
    check(&session);
    session.handle(PlayerInput::Continue).unwrap();
    check(&session);
    session
        .handle(PlayerInput::SelectPathway(Pathway::Humoral))
        .unwrap();
    check(&session);
}

#[test]
fn pathway_is_selected_once() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    play_act1(&mut session, Pathway::Humoral);

    let err = session
        .handle(PlayerInput::SelectPathway(Pathway::CellMediated))
        .unwrap_err();
    assert!(matches!(err, StoryError::UnexpectedInput { .. }));
    assert_eq!(session.pathway(), Some(Pathway::Humoral));
}

#[test]
fn restart_clears_the_run() {
    let mut session = StorySession::with_defaults(book()).unwrap();
    play_act1(&mut session, Pathway::Humoral);

    let events = session.restart();
    assert!(events.contains(&SessionEvent::ActChanged {
        from: Act::Pathway,
        to: Act::Act1
    }));
    assert_eq!(scene(&session), "intro");
    assert_eq!(session.pathway(), None);
    assert_eq!(session.progress().position, 0);
    assert_eq!(session.snapshot().answered, 0);
}

#[test]
fn config_from_file_changes_lives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "starting_lives = 1\nauto_advance_dialogue = false\n").unwrap();

    let config = SessionConfig::load(&path).unwrap();
    let mut session = StorySession::new(book(), config).unwrap();

    // Dialogue with an explicit delay still auto-advances
    session.tick(ms(3000)).unwrap();
    session.tick(ms(1500)).unwrap();
    session.handle(PlayerInput::Continue).unwrap();

    let events = session.handle(PlayerInput::ChooseOption(1)).unwrap();
    assert!(events.iter().any(|e| matches!(e, SessionEvent::GameOver { .. })));
}

#[test]
fn missing_files_report_their_path() {
    let err = StoryBook::load(fixture("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, ContentError::Io { .. }));

    let err = SessionConfig::load(fixture("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, StoryError::ConfigIo { .. }));
}
