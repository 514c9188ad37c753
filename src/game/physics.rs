use nalgebra::{Isometry3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use super::body::CharacterBody;
use super::constants::physics as consts;
use super::layers::LayerMask;

/// Wrapper around a Rapier3D pipeline holding level geometry and characters.
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

/// Level geometry collides with everything; its layer decides which probes see it.
fn groups_for(layers: LayerMask) -> InteractionGroups {
    InteractionGroups::new(layers.to_group(), Group::ALL)
}

impl PhysicsWorld {
    /// Creates a new physics world with default gravity
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -consts::DEFAULT_GRAVITY, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Sets the gravity for the physics world
    pub fn set_gravity(&mut self, gravity_y: f32) {
        self.gravity = vector![0.0, -gravity_y, 0.0];
    }

    /// Steps the physics simulation forward by dt seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Rebuilds the query structures so overlap tests see freshly inserted colliders.
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Adds a fixed solid box (floors, walls, platforms) on `layers`.
    pub fn add_static_box(&mut self, position: [f32; 3], half_extents: [f32; 3], layers: LayerMask) -> RigidBodyHandle {
        self.add_fixed_box(position, half_extents, layers, false)
    }

    /// Adds a ladder volume on `layers`. Ladders are sensors: the character
    /// overlaps them instead of bumping into them.
    pub fn add_ladder(&mut self, position: [f32; 3], half_extents: [f32; 3], layers: LayerMask) -> RigidBodyHandle {
        self.add_fixed_box(position, half_extents, layers, true)
    }

    fn add_fixed_box(
        &mut self,
        position: [f32; 3],
        half_extents: [f32; 3],
        layers: LayerMask,
        sensor: bool,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position[0], position[1], position[2]])
            .build();
        let handle = self.rigid_body_set.insert(body);

        let [hx, hy, hz] = half_extents;
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .sensor(sensor)
            .collision_groups(groups_for(layers))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.refresh_queries();

        handle
    }

    /// Adds a dynamic character body with an upright capsule collider.
    /// Rotations are locked so the solver never tips the character over;
    /// facing is set explicitly through [`CharacterBody::set_rotation`].
    pub fn add_character(
        &mut self,
        position: [f32; 3],
        radius: f32,
        height: f32,
        mass: f32,
        layers: LayerMask,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .lock_rotations()
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        // Capsule half-height is the cylinder part: total height = 2*half_height + 2*radius
        let half_height = (height - 2.0 * radius).max(0.0) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .mass(mass)
            .collision_groups(groups_for(layers))
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        self.refresh_queries();

        body_handle
    }

    /// Adds a character with the default capsule and mass.
    pub fn add_default_character(&mut self, position: [f32; 3]) -> RigidBodyHandle {
        self.add_character(
            position,
            consts::CHARACTER_RADIUS,
            consts::CHARACTER_HEIGHT,
            consts::CHARACTER_MASS,
            LayerMask::CHARACTER,
        )
    }

    /// Removes a body and its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        let removed = self
            .rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some();
        if removed {
            self.refresh_queries();
        }
        removed
    }

    /// Borrows a character body through the controller's capability set.
    pub fn character(&mut self, handle: RigidBodyHandle) -> RapierCharacter<'_> {
        RapierCharacter { world: self, handle }
    }

    /// Gets the position of a rigid body
    pub fn get_position(&self, handle: RigidBodyHandle) -> Option<[f32; 3]> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            [pos.x, pos.y, pos.z]
        })
    }

    /// Gets the velocity of a rigid body
    pub fn get_velocity(&self, handle: RigidBodyHandle) -> Option<[f32; 3]> {
        self.rigid_body_set.get(handle).map(|body| {
            let vel = body.linvel();
            [vel.x, vel.y, vel.z]
        })
    }

    /// Gets the rotation of a rigid body as quaternion [x, y, z, w]
    pub fn get_rotation(&self, handle: RigidBodyHandle) -> Option<[f32; 4]> {
        self.rigid_body_set.get(handle).map(|body| {
            let rot = body.rotation();
            [rot.i, rot.j, rot.k, rot.w]
        })
    }

    /// Checks whether any collider on `layers` overlaps a sphere.
    /// Colliders attached to `exclude_body` are skipped.
    pub fn overlaps_sphere(
        &self,
        center: [f32; 3],
        radius: f32,
        layers: LayerMask,
        exclude_body: Option<RigidBodyHandle>,
    ) -> bool {
        if layers.is_empty() {
            return false;
        }

        let shape = Ball::new(radius);
        let pos = Isometry3::translation(center[0], center[1], center[2]);

        let mut filter = QueryFilter::default().groups(InteractionGroups::new(Group::ALL, layers.to_group()));
        if let Some(body_handle) = exclude_body {
            filter = filter.exclude_rigid_body(body_handle);
        }

        let mut found = false;
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &pos,
            &shape,
            filter,
            |_| {
                found = true;
                false // stop at the first hit
            },
        );
        found
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// A character body inside a [`PhysicsWorld`], viewed through [`CharacterBody`].
///
/// A stale handle reads as a body at the origin with nothing around it;
/// mutations on it are dropped.
pub struct RapierCharacter<'a> {
    world: &'a mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl RapierCharacter<'_> {
    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    fn body(&self) -> Option<&RigidBody> {
        self.world.rigid_body_set.get(self.handle)
    }

    fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.world.rigid_body_set.get_mut(self.handle)
    }
}

impl CharacterBody for RapierCharacter<'_> {
    fn position(&self) -> Vector3<f32> {
        self.body().map(|b| *b.translation()).unwrap_or_else(Vector3::zeros)
    }

    fn rotation(&self) -> UnitQuaternion<f32> {
        self.body().map(|b| *b.rotation()).unwrap_or_else(UnitQuaternion::identity)
    }

    fn velocity(&self) -> Vector3<f32> {
        self.body().map(|b| *b.linvel()).unwrap_or_else(Vector3::zeros)
    }

    fn set_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        if let Some(body) = self.body_mut() {
            body.set_rotation(rotation, true);
        }
    }

    fn translate(&mut self, delta: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            let next = body.translation() + delta;
            body.set_translation(next, true);
        }
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            body.set_linvel(velocity, true);
        }
    }

    fn apply_impulse(&mut self, impulse: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            body.apply_impulse(impulse, true);
        }
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        if let Some(body) = self.body_mut() {
            body.set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
        }
    }

    fn gravity_enabled(&self) -> bool {
        self.body()
            .map(|b| b.gravity_scale().abs() > consts::EPSILON)
            .unwrap_or(false)
    }

    fn overlaps_sphere(&self, center: Vector3<f32>, radius: f32, layers: LayerMask) -> bool {
        self.world
            .overlaps_sphere([center.x, center.y, center.z], radius, layers, Some(self.handle))
    }
}
