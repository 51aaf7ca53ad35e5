// Shared tuning constants for the gesture components.

// Finger source
pub const DEFAULT_TAP_THRESHOLD: f32 = 0.2; // seconds a contact may last and still count as a tap
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0; // scaled pixels a contact must travel to count as a swipe
pub const DEFAULT_REFERENCE_DPI: f32 = 200.0; // dpi at which scaled pixels equal screen pixels

// Damping
pub const DEFAULT_DAMPENING: f32 = -1.0; // apply gesture changes instantly
pub const DEFAULT_PULSE_DAMPENING: f32 = 5.0;

// Gestures
pub const MIN_PINCH_DISTANCE: f32 = 1e-5; // last-frame finger spread below this disables pinch

// Pulse scale
pub const DEFAULT_PULSE_INTERVAL: f32 = 1.0; // seconds between pulses
pub const DEFAULT_PULSE_SIZE: f32 = 1.0; // size added per pulse

// Screen depth
pub const DEFAULT_SCREEN_DISTANCE: f32 = 10.0; // world units in front of the camera for FixedDistance
