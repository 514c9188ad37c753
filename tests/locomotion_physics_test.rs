//! End-to-end locomotion tests: the controller drives a real Rapier3D body
//! inside a `PhysicsWorld`, the way a host game loop would (tick, then step).
//!
//! Run with: cargo test --test locomotion_physics_test -- --nocapture

use locomotion::config::ControllerConfig;
use locomotion::game::input::InputScript;
use locomotion::game::{
    CharacterBody, InputFrame, LayerMask, LocomotionState, PhysicsWorld, PlayerController, ScriptedInput,
    TickReport,
};
use nalgebra::Vector3;
use rapier3d::prelude::RigidBodyHandle;
use std::path::Path;

const DT: f32 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Shared scene
// ---------------------------------------------------------------------------

/// Floor with its top face at y=0 and a character standing on it.
struct Scene {
    world: PhysicsWorld,
    character: RigidBodyHandle,
    controller: PlayerController,
}

impl Scene {
    fn new() -> Self {
        Self::with_floor_layer(LayerMask::GROUND)
    }

    fn with_floor_layer(layers: LayerMask) -> Self {
        let mut world = PhysicsWorld::new();
        world.add_static_box([0.0, -0.5, 0.0], [50.0, 0.5, 50.0], layers);
        let character = world.add_default_character([0.0, 1.0, 0.0]);

        let mut scene = Self {
            world,
            character,
            controller: PlayerController::new(ControllerConfig::default()),
        };
        // Let contacts settle before driving the body.
        for _ in 0..30 {
            scene.world.step(DT);
        }
        scene
    }

    fn add_ladder_at(&mut self, x: f32) {
        self.world
            .add_ladder([x, 1.5, 0.0], [0.1, 1.5, 0.5], LayerMask::LADDER);
    }

    fn tick(&mut self, input: InputFrame) -> TickReport {
        let report = {
            let mut body = self.world.character(self.character);
            self.controller.tick(DT, &input, &mut body)
        };
        self.world.step(DT);
        report
    }

    fn position(&self) -> [f32; 3] {
        self.world.get_position(self.character).unwrap()
    }

    fn velocity(&self) -> [f32; 3] {
        self.world.get_velocity(self.character).unwrap()
    }

    fn gravity_enabled(&mut self) -> bool {
        self.world.character(self.character).gravity_enabled()
    }
}

// ---------------------------------------------------------------------------
// Ground and walking
// ---------------------------------------------------------------------------

#[test]
fn test_idle_on_floor_stays_put() {
    let mut scene = Scene::new();
    let start = scene.position();

    for _ in 0..30 {
        let report = scene.tick(InputFrame::default());
        assert_eq!(report.state, LocomotionState::Idle);
        assert!(report.grounded, "character resting on the floor should be grounded");
    }

    let end = scene.position();
    assert!((end[0] - start[0]).abs() < 1e-3);
    assert!((end[2] - start[2]).abs() < 1e-3);
}

#[test]
fn test_floor_on_other_layer_is_not_ground() {
    let mut scene = Scene::with_floor_layer(LayerMask::INTERACTABLE);
    let report = scene.tick(InputFrame::default().with_jump());

    assert!(!report.grounded);
    assert_eq!(report.resolved, LocomotionState::Idle);
    assert!(report.impulse.is_none());
}

#[test]
fn test_walk_along_x_for_one_second() {
    let mut scene = Scene::new();

    for _ in 0..60 {
        let report = scene.tick(InputFrame::new(1.0, 0.0));
        assert_eq!(report.state, LocomotionState::Walking);
    }

    let pos = scene.position();
    println!("After walking: {:?}", pos);
    assert!((pos[0] - 5.0).abs() < 0.1, "expected ~5 units along +X, got {}", pos[0]);
    assert!(pos[2].abs() < 0.05);

    let facing = scene.world.character(scene.character).rotation() * Vector3::z();
    assert!(facing.x > 0.99, "character should face +X, facing={:?}", facing);
}

#[test]
fn test_walk_reversal_turns_around() {
    let mut scene = Scene::new();
    for _ in 0..30 {
        scene.tick(InputFrame::new(0.0, 1.0));
    }
    for _ in 0..60 {
        scene.tick(InputFrame::new(0.0, -1.0));
    }

    let facing = scene.world.character(scene.character).rotation() * Vector3::z();
    assert!(facing.z < -0.99, "character should face -Z, facing={:?}", facing);
}

// ---------------------------------------------------------------------------
// Jumping
// ---------------------------------------------------------------------------

#[test]
fn test_jump_launches_and_returns_to_idle() {
    let mut scene = Scene::new();
    let report = scene.tick(InputFrame::default().with_jump());

    assert_eq!(report.resolved, LocomotionState::Jumping);
    assert_eq!(report.state, LocomotionState::Idle);
    assert_eq!(report.impulse, Some([0.0, 5.0, 0.0]));

    let vy = scene.velocity()[1];
    assert!(vy > 4.0, "unit-mass body should launch near jump_force, vy={}", vy);

    let mut peak = scene.position()[1];
    let mut airborne_ticks = 0;
    for _ in 0..20 {
        let report = scene.tick(InputFrame::default());
        assert_eq!(report.state, LocomotionState::Idle);
        if !report.grounded {
            airborne_ticks += 1;
        }
        peak = peak.max(scene.position()[1]);
    }
    assert!(peak > 1.5, "peak height {}", peak);
    assert!(airborne_ticks > 0);
}

#[test]
fn test_jump_not_repeated_in_air() {
    let mut scene = Scene::new();
    scene.tick(InputFrame::default().with_jump());
    for _ in 0..10 {
        scene.tick(InputFrame::default());
    }

    let report = scene.tick(InputFrame::default().with_jump());
    assert!(!report.grounded);
    assert!(report.impulse.is_none());
}

// ---------------------------------------------------------------------------
// Ladders
// ---------------------------------------------------------------------------

#[test]
fn test_interact_far_from_ladder_returns_to_idle() {
    let mut scene = Scene::new();
    scene.add_ladder_at(5.0);

    let report = scene.tick(InputFrame::default().with_interact());
    assert_eq!(report.resolved, LocomotionState::Interacting);
    assert_eq!(report.ladder_found, Some(false));
    assert_eq!(report.state, LocomotionState::Idle);
    assert!(scene.gravity_enabled());
}

#[test]
fn test_climb_up_and_dismount() {
    let mut scene = Scene::new();
    scene.add_ladder_at(0.8);

    let report = scene.tick(InputFrame::default().with_interact());
    assert_eq!(report.state, LocomotionState::Climbing);
    assert_eq!(report.ladder_found, Some(true));
    assert!(!scene.gravity_enabled(), "gravity should be off on the ladder");

    let start_y = scene.position()[1];
    for _ in 0..60 {
        let report = scene.tick(InputFrame::new(0.0, 1.0));
        assert_eq!(report.state, LocomotionState::Climbing);
    }
    let vel = scene.velocity();
    assert!((vel[1] - 3.0).abs() < 1e-3, "climb velocity {:?}", vel);
    assert!(vel[0].abs() < 1e-3 && vel[2].abs() < 1e-3);

    let climbed = scene.position()[1] - start_y;
    println!("Climbed {:.2} units", climbed);
    assert!(climbed > 3.0, "climbed only {}", climbed);

    // Holding still on the ladder: no sliding down.
    let hold_y = scene.position()[1];
    for _ in 0..30 {
        scene.tick(InputFrame::default());
    }
    assert!((scene.position()[1] - hold_y).abs() < 1e-3);

    let report = scene.tick(InputFrame::default().with_interact());
    assert_eq!(report.state, LocomotionState::Idle);
    assert_eq!(report.gravity_enabled, Some(true));
    assert!(scene.gravity_enabled());

    // Back under gravity: the character falls.
    let y = scene.position()[1];
    for _ in 0..20 {
        scene.tick(InputFrame::default());
    }
    assert!(scene.position()[1] < y);
}

#[test]
fn test_climbing_continues_past_ladder_top() {
    let mut scene = Scene::new();
    scene.add_ladder_at(0.8);
    scene.tick(InputFrame::default().with_interact());

    // Ladder top is at y=3; keep climbing well beyond it.
    for _ in 0..240 {
        scene.tick(InputFrame::new(0.0, 1.0));
    }
    assert_eq!(scene.controller.state(), LocomotionState::Climbing);
    assert!(scene.position()[1] > 10.0);
}

// ---------------------------------------------------------------------------
// Scripted replay of the bundled demos
// ---------------------------------------------------------------------------

#[test]
fn test_demo_config_parses() {
    let config = ControllerConfig::from_file(Path::new("demos/controller.toml"))
        .unwrap_or_else(|e| panic!("demo config should load: {}", e));
    assert_eq!(config.ground_layers, LayerMask::GROUND);
    assert_eq!(config.ladder_layers, LayerMask::LADDER);
}

#[test]
fn test_ladder_demo_replay() {
    let script = InputScript::from_file(Path::new("demos/ladder_climb.toml"))
        .unwrap_or_else(|e| panic!("demo script should load: {}", e));
    let total = script.total_ticks();

    let mut scene = Scene::new();
    scene
        .world
        .add_ladder([2.3, 2.0, 0.0], [0.1, 2.0, 0.5], LayerMask::LADDER);
    let mut input = ScriptedInput::from_script(script);

    let mut climbed = false;
    let mut peak = 0.0f32;
    for _ in 0..total {
        let report = {
            let mut body = scene.world.character(scene.character);
            scene.controller.run(DT, &mut input, &mut body)
        };
        scene.world.step(DT);
        climbed |= report.state == LocomotionState::Climbing;
        peak = peak.max(scene.position()[1]);
    }

    assert!(climbed, "script should reach the ladder and climb it");
    assert!(peak > 4.0, "peak height {}", peak);
    assert_eq!(scene.controller.state(), LocomotionState::Idle);
    assert!(scene.gravity_enabled());
}
