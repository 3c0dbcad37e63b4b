//! Interaction integration test
//!
//! Headless App без physics: targeting (raycast) не подключаем,
//! target probe'а ставим вручную. Invocation работает как в игре.
//!
//! Проверяем:
//! - Зажатая кнопка переключает дверь ровно один раз
//! - Направление открытия по взгляду агента (через DoorHandle)
//! - Без target'а input ничего не делает
//! - Исчезнувшая дверь → NoTarget

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use doorway_simulation::interaction::probe::{invoke_interactions, read_interaction_keys};
use doorway_simulation::*;

/// Helper: App с DoorPlugin + invocation фазой probe'а
fn create_interaction_app() -> App {
    let mut app = create_headless_app();
    app.add_plugins(DoorPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .add_systems(
            Update,
            (read_interaction_keys, invoke_interactions)
                .chain()
                .after(DoorSystems::Advance)
                .before(DoorSystems::Apply),
        );

    app.update();
    app
}

struct Scene {
    door: Entity,
    panel: Entity,
    agent: Entity,
}

/// Дверь в 1.5m перед агентом; оба смотрят в -Z
fn spawn_scene(app: &mut App, config: DoorConfig) -> Scene {
    let (door, agent) = {
        let mut commands = app.world_mut().commands();
        let door = spawn_door(
            &mut commands,
            7,
            Transform::from_xyz(0.0, 0.0, -1.5),
            config,
            DoorPanel::default(),
        );
        let agent = spawn_interactor(
            &mut commands,
            Transform::from_xyz(0.0, 1.6, 0.0),
            InteractionProbe::default(),
        );
        (door, agent)
    };
    app.world_mut().flush();

    let world = app.world_mut();
    let mut handles = world.query::<(Entity, &DoorHandle)>();
    let (panel, _) = handles.single(world).expect("one panel");

    // Первый update: GlobalTransform пропагируется
    app.update();

    Scene { door, panel, agent }
}

fn aim_at_panel(app: &mut App, scene: &Scene) {
    let mut probe = app
        .world_mut()
        .get_mut::<InteractionProbe>(scene.agent)
        .unwrap();
    probe.set_target(Some(DoorTarget::Handle {
        handle: scene.panel,
        door: scene.door,
    }));
}

fn set_pressed(app: &mut App, agent: Entity, pressed: bool) {
    app.world_mut()
        .get_mut::<InteractionInput>(agent)
        .unwrap()
        .pressed = pressed;
}

fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn is_open(app: &App, door: Entity) -> bool {
    app.world().get::<Door>(door).unwrap().is_open()
}

/// Test: удержание кнопки = одно переключение
#[test]
fn test_held_input_toggles_once() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default());
    aim_at_panel(&mut app, &scene);

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 10);

    // Два переключения вернули бы дверь в закрытое состояние
    assert!(is_open(&app, scene.door));

    set_pressed(&mut app, scene.agent, false);
    run(&mut app, 1);
    assert!(is_open(&app, scene.door));

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 1);
    assert!(!is_open(&app, scene.door));
}

/// Test: агент смотрит вдоль forward двери → открытие в -1
#[test]
fn test_opening_direction_follows_agent_view() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default());
    aim_at_panel(&mut app, &scene);

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 1);

    let door = app.world().get::<Door>(scene.door).unwrap();
    assert!(door.is_open());
    assert_eq!(door.open_direction(), Some(OpenDirection::Negative));
}

/// Test: inverted дверь открывается в другую сторону
#[test]
fn test_inverted_door_flips_direction() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default().inverted());
    aim_at_panel(&mut app, &scene);

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 1);

    let door = app.world().get::<Door>(scene.door).unwrap();
    assert_eq!(door.open_direction(), Some(OpenDirection::Positive));
}

/// Test: нет target'а → input игнорируется
#[test]
fn test_no_target_no_toggle() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default());

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 3);

    assert!(!is_open(&app, scene.door));
}

/// Test: кнопка зажата до наведения → не срабатывает
#[test]
fn test_press_before_aiming_does_not_fire() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default());

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 2);

    aim_at_panel(&mut app, &scene);
    run(&mut app, 3);

    assert!(!is_open(&app, scene.door));
}

/// Test: запертая дверь через probe → LockedAttempt, дверь закрыта
#[test]
fn test_locked_door_through_probe() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default().locked());
    aim_at_panel(&mut app, &scene);

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 1);

    assert!(!is_open(&app, scene.door));
    assert!(app.world().get::<Door>(scene.door).unwrap().is_locked());
}

/// Test: дверь исчезла → probe возвращается в NoTarget без паники
#[test]
fn test_despawned_door_clears_target() {
    let mut app = create_interaction_app();
    let scene = spawn_scene(&mut app, DoorConfig::default());
    aim_at_panel(&mut app, &scene);

    app.world_mut().entity_mut(scene.door).despawn();
    run(&mut app, 1);

    let probe = app.world().get::<InteractionProbe>(scene.agent).unwrap();
    assert_eq!(probe.state(), ProbeState::NoTarget);

    set_pressed(&mut app, scene.agent, true);
    run(&mut app, 2);
}

/// Test: InteractionKey → InteractionInput через ButtonInput<KeyCode>
#[test]
fn test_interaction_key_drives_input() {
    let mut app = create_interaction_app();
    app.init_resource::<ButtonInput<KeyCode>>();
    let scene = spawn_scene(&mut app, DoorConfig::default());
    app.world_mut()
        .entity_mut(scene.agent)
        .insert(InteractionKey(KeyCode::KeyF));
    aim_at_panel(&mut app, &scene);

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyF);
    run(&mut app, 1);

    assert!(app.world().get::<InteractionInput>(scene.agent).unwrap().pressed);
    assert!(is_open(&app, scene.door));
}
