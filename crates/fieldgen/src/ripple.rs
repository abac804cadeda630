//! Click-driven expanding rings.
//!
//! Pointer-down events land in a fixed-capacity ring buffer; each live slot
//! contributes a radially expanding ring to the field. Slots are reused
//! cyclically, and a slot that has never been written holds a sentinel that
//! is skipped outright during evaluation.

/// Number of click slots; the eleventh click overwrites the first.
pub const CLICK_CAPACITY: usize = 10;

/// One recorded pointer-down, in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub x: f32,
    pub y: f32,
    /// Field time at which the click landed, in seconds.
    pub started: f32,
}

impl ClickEvent {
    /// Marker for an unused slot; negative coordinates never occur for real
    /// clicks, which are recorded in surface pixel space.
    pub const SENTINEL: Self = Self {
        x: -1.0,
        y: -1.0,
        started: 0.0,
    };

    pub fn is_sentinel(&self) -> bool {
        self.x < 0.0
    }
}

/// Fixed-capacity click history with a wrapping write cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickLog {
    slots: [ClickEvent; CLICK_CAPACITY],
    cursor: usize,
}

impl ClickLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a click into the next slot, overwriting whatever was there.
    pub fn record(&mut self, x: f32, y: f32, started: f32) {
        self.slots[self.cursor] = ClickEvent { x, y, started };
        self.cursor = (self.cursor + 1) % CLICK_CAPACITY;
    }

    pub fn slots(&self) -> &[ClickEvent; CLICK_CAPACITY] {
        &self.slots
    }
}

impl Default for ClickLog {
    fn default() -> Self {
        Self {
            slots: [ClickEvent::SENTINEL; CLICK_CAPACITY],
            cursor: 0,
        }
    }
}

/// Ring shape and attenuation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    /// Ring front speed in surface pixels per second.
    pub speed: f32,
    /// Gaussian band width of the ring in pixels.
    pub thickness: f32,
    /// Exponential decay per second of elapsed time.
    pub time_decay: f32,
    /// Exponential decay per pixel of distance from the click.
    pub distance_decay: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            speed: 180.0,
            thickness: 40.0,
            time_decay: 0.8,
            distance_decay: 0.002,
        }
    }
}

/// Strength of a single ring at `distance` pixels from its click,
/// `elapsed` seconds after it landed. Always in `[0, 1]`.
pub fn ring_strength(distance: f32, elapsed: f32, params: &RippleParams) -> f32 {
    if elapsed < 0.0 {
        return 0.0;
    }
    let front = params.speed * elapsed;
    let band = (distance - front) / params.thickness.max(f32::EPSILON);
    (-band * band).exp()
        * (-params.time_decay * elapsed).exp()
        * (-params.distance_decay * distance).exp()
}

/// Combined ring contribution of the whole click history at a pixel.
///
/// Rings combine via `max` so they brighten, never darken, the base field;
/// sentinel slots contribute exactly zero.
pub fn contribution(log: &ClickLog, x: f32, y: f32, now: f32, params: &RippleParams) -> f32 {
    let mut strongest = 0.0_f32;
    for event in log.slots() {
        if event.is_sentinel() {
            continue;
        }
        let distance = ((x - event.x).powi(2) + (y - event.y).powi(2)).sqrt();
        strongest = strongest.max(ring_strength(distance, now - event.started, params));
    }
    strongest
}
