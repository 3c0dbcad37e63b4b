//! InteractionProbe: агент ищет дверь перед собой и открывает её по кнопке
//!
//! Две независимые фазы:
//! - Targeting (FixedUpdate): raycast вперёд на `max_distance` по door groups,
//!   ближайшее попадание → `DoorTarget` (дверь или handle), иначе NoTarget.
//! - Invocation (Update): rising edge interaction input → направление по
//!   взгляду агента → `toggle_state(dir)` на текущем target'е.
//!
//! Target: не-владеющая ссылка (Entity): дверь может исчезнуть между
//! тиками, тогда probe молча возвращается в NoTarget.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group, QueryFilter, RapierContext, ReadRapierContext};

use crate::collision_layers::DOOR_PROBE_FILTER;
use crate::door::{DoorControl, DoorError, DoorResolver, DoorTarget, Doors};
use crate::logger;

/// Состояние probe'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ProbeState {
    #[default]
    NoTarget,
    HasTarget(DoorTarget),
}

/// Probe агента (обычно игрок)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(InteractionInput)]
pub struct InteractionProbe {
    /// Дальность raycast (метры)
    pub max_distance: f32,
    /// Битовая маска collision groups, по которым ищем двери
    pub layer_mask: u32,
    state: ProbeState,
    /// Input прошлого кадра (для rising edge)
    was_pressed: bool,
}

impl Default for InteractionProbe {
    fn default() -> Self {
        Self {
            max_distance: 2.0,
            layer_mask: DOOR_PROBE_FILTER.bits(),
            state: ProbeState::NoTarget,
            was_pressed: false,
        }
    }
}

impl InteractionProbe {
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            ..Default::default()
        }
    }

    pub fn with_layers(mut self, layers: Group) -> Self {
        self.layer_mask = layers.bits();
        self
    }

    pub fn layers(&self) -> Group {
        Group::from_bits_truncate(self.layer_mask)
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    pub fn target(&self) -> Option<DoorTarget> {
        match self.state {
            ProbeState::NoTarget => None,
            ProbeState::HasTarget(target) => Some(target),
        }
    }

    /// Ставит target; true если состояние изменилось
    pub fn set_target(&mut self, target: Option<DoorTarget>) -> bool {
        let next = match target {
            Some(target) => ProbeState::HasTarget(target),
            None => ProbeState::NoTarget,
        };
        let changed = self.state != next;
        self.state = next;
        changed
    }

    pub fn clear(&mut self) {
        self.state = ProbeState::NoTarget;
    }

    /// Результат raycast'а → новый target
    ///
    /// Промах, не-дверь и устаревший handle одинаково дают NoTarget.
    pub fn retarget(
        &mut self,
        hit: Option<Entity>,
        resolve: impl FnOnce(Entity) -> Result<DoorTarget, DoorError>,
    ) -> bool {
        let target = match hit.map(resolve) {
            Some(Ok(target)) => Some(target),
            Some(Err(err @ DoorError::StaleReference(_))) => {
                logger::log_warning(&format!("InteractionProbe: {}", err));
                None
            }
            Some(Err(_)) | None => None,
        };

        self.set_target(target)
    }

    /// Регистрирует уровень input'а этого кадра; true только на rising edge
    ///
    /// Edge отслеживается независимо от наличия target'а: кнопка, зажатая
    /// до наведения на дверь, не срабатывает.
    pub fn register_input(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        rising
    }
}

/// Interaction input агента: "кнопка зажата в этом кадре"
///
/// Заполняется хостом (или `read_interaction_keys`).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InteractionInput {
    pub pressed: bool,
}

/// Привязка interaction input к клавише
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct InteractionKey(pub KeyCode);

impl Default for InteractionKey {
    fn default() -> Self {
        Self(KeyCode::KeyE)
    }
}

/// Spatial probe service: ближайший коллайдер вдоль луча
pub trait DoorProbeBackend {
    fn cast_forward(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: Group,
        exclude: Option<Entity>,
    ) -> Option<Entity>;
}

impl DoorProbeBackend for RapierContext<'_> {
    fn cast_forward(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: Group,
        exclude: Option<Entity>,
    ) -> Option<Entity> {
        let mut filter = QueryFilter::new()
            .exclude_sensors()
            .groups(CollisionGroups::new(Group::ALL, layers));

        if let Some(agent) = exclude {
            filter = filter.exclude_collider(agent);
        }

        self.cast_ray(origin, direction, max_distance, true, filter)
            .map(|(entity, _toi)| entity)
    }
}

/// Один шаг targeting'а для агента (без ECS, удобно тестировать)
pub fn probe_step(
    probe: &mut InteractionProbe,
    backend: Option<&impl DoorProbeBackend>,
    agent: Entity,
    transform: &GlobalTransform,
    resolve: impl FnOnce(Entity) -> Result<DoorTarget, DoorError>,
) -> bool {
    let hit = backend.and_then(|backend| {
        backend.cast_forward(
            transform.translation(),
            transform.forward().as_vec3(),
            probe.max_distance,
            probe.layers(),
            Some(agent),
        )
    });

    probe.retarget(hit, resolve)
}

/// Invocation: направление по взгляду агента → toggle_state
///
/// Результат toggle не интерпретируем (fire-and-forget), только отдаём.
pub fn interact(door: &mut impl DoorControl, agent_forward: Vec3) -> bool {
    let dir = door.opening_direction(agent_forward);
    door.toggle_state(dir)
}

/// Система: targeting (FixedUpdate, physics rate)
///
/// Без physics context (rapier не подключен): все probe'ы в NoTarget.
pub fn update_probe_targets(
    rapier: ReadRapierContext,
    mut probes: Query<(Entity, &GlobalTransform, &mut InteractionProbe)>,
    resolver: DoorResolver,
) {
    let context = rapier.single().ok();

    for (agent, transform, mut probe) in probes.iter_mut() {
        let changed = probe_step(&mut probe, context.as_ref(), agent, transform, |entity| {
            resolver.resolve(entity)
        });

        if changed {
            logger::log(&format!(
                "InteractionProbe {:?}: target → {:?}",
                agent,
                probe.state()
            ));
        }
    }
}

/// Система: keyboard → InteractionInput (если ButtonInput есть в мире)
pub fn read_interaction_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut agents: Query<(&InteractionKey, &mut InteractionInput)>,
) {
    let Some(keys) = keys else {
        return;
    };

    for (key, mut input) in agents.iter_mut() {
        input.pressed = keys.pressed(key.0);
    }
}

/// Система: invocation (Update, input rate)
pub fn invoke_interactions(
    mut agents: Query<(Entity, &GlobalTransform, &InteractionInput, &mut InteractionProbe)>,
    mut doors: Doors,
) {
    for (agent, transform, input, mut probe) in agents.iter_mut() {
        let rising = probe.register_input(input.pressed);

        let Some(target) = probe.target() else {
            continue;
        };

        // Дверь/handle исчезли между тиками → NoTarget
        let Some(mut door) = doors.control(target) else {
            logger::log_warning(&format!(
                "InteractionProbe {:?}: target {:?} is gone",
                agent, target
            ));
            probe.clear();
            continue;
        };

        if !rising {
            continue;
        }

        let toggled = interact(&mut door, transform.forward().as_vec3());
        logger::log(&format!(
            "InteractionProbe {:?}: toggle {:?} → {}",
            agent, target, toggled
        ));
    }
}

/// Спавнит агента с probe'ом и input'ом
pub fn spawn_interactor(
    commands: &mut Commands,
    transform: Transform,
    probe: InteractionProbe,
) -> Entity {
    commands
        .spawn((Name::new("Interactor"), transform, probe, InteractionInput::default()))
        .id()
}
