//! Headless демо дверей
//!
//! Скриптованный сценарий без рендера: lock → попытка открыть →
//! unlock → open → auto-close. Feedback печатается в консоль.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use doorway_simulation::{
    create_headless_app, spawn_door, AudioCue, DoorAction, DoorCommand, DoorConfig, DoorFeedback,
    DoorPanel, DoorwayPlugin, PlayClipAt,
};

/// Шаг симуляции (10 кадров в секунду)
const FRAME: Duration = Duration::from_millis(100);

#[derive(Resource)]
struct DemoDoor(Entity);

fn setup(mut commands: Commands) {
    let mut config = DoorConfig::default().with_auto_close(2.0);
    config.open.audio_cue = Some(AudioCue::new("door_open"));
    config.close.audio_cue = Some(AudioCue::new("door_close"));
    config.locked_attempt.audio_cue = Some(AudioCue::new("door_rattle"));

    let door = spawn_door(
        &mut commands,
        1,
        Transform::from_xyz(0.0, 0.0, -3.0),
        config,
        DoorPanel::default(),
    );
    commands.insert_resource(DemoDoor(door));
}

fn print_feedback(
    mut feedback_events: EventReader<DoorFeedback>,
    mut clip_events: EventReader<PlayClipAt>,
    time: Res<Time>,
) {
    for clip in clip_events.read() {
        println!(
            "[{:>5.2}s] clip '{}' at {:?}",
            time.elapsed_secs(),
            clip.cue.0,
            clip.position
        );
    }
    for feedback in feedback_events.read() {
        println!("[{:>5.2}s] feedback {:?}", time.elapsed_secs(), feedback.kind);
    }
}

fn main() {
    println!("Starting doorway headless demo");

    let mut app = create_headless_app();
    app.add_plugins(DoorwayPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_systems(Startup, setup)
        .add_systems(Last, print_feedback);

    // Первый update: Startup (спавн двери)
    app.update();

    let Some(door) = app.world().get_resource::<DemoDoor>().map(|demo| demo.0) else {
        eprintln!("Demo door was not spawned");
        return;
    };

    // (кадр, действие)
    let script = [
        (1, DoorAction::SetLocked(true)),
        (2, DoorAction::Toggle(1)),
        (5, DoorAction::SetLocked(false)),
        (6, DoorAction::Open(1)),
    ];

    for frame in 1..80 {
        for (_, action) in script.iter().filter(|(at, _)| *at == frame) {
            println!("Frame {}: {:?}", frame, action);
            app.world_mut().send_event(DoorCommand::new(door, *action));
        }
        app.update();
    }

    println!("Demo complete!");
}
