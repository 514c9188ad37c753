//! Locomotion tuning and physics constants.
//! Config defaults and the rapier backend both read from here.

/// Controller tuning defaults
pub mod controller {
    /// Walk speed in units/second
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

    /// Ladder climb speed in units/second
    pub const DEFAULT_CLIMB_SPEED: f32 = 3.0;

    /// Upward impulse applied on jump
    pub const DEFAULT_JUMP_FORCE: f32 = 5.0;

    /// Radius of the ground-check sphere
    pub const DEFAULT_GROUND_CHECK_RADIUS: f32 = 0.1;

    /// Ground-check anchor relative to the body origin (body-local space)
    pub const DEFAULT_GROUND_CHECK_OFFSET: [f32; 3] = [0.0, -1.0, 0.0];

    /// Radius of the ladder search sphere around the body origin
    pub const DEFAULT_LADDER_PROBE_RADIUS: f32 = 1.0;

    /// Movement magnitude above which the character walks
    pub const WALK_THRESHOLD: f32 = 0.1;

    /// Slerp factor per second when turning toward the walk direction
    pub const TURN_RATE: f32 = 10.0;
}

/// Physics constants
pub mod physics {
    /// Default gravity in units/s²
    pub const DEFAULT_GRAVITY: f32 = 9.81;

    /// Fixed timestep for physics simulation (60 Hz)
    pub const TIMESTEP: f32 = 1.0 / 60.0;

    /// Character capsule radius
    pub const CHARACTER_RADIUS: f32 = 0.5;

    /// Character capsule total height
    pub const CHARACTER_HEIGHT: f32 = 2.0;

    /// Character mass, so a jump impulse maps 1:1 onto launch speed
    pub const CHARACTER_MASS: f32 = 1.0;

    /// Small epsilon for float comparisons
    pub const EPSILON: f32 = 0.001;
}
