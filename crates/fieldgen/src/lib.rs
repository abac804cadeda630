//! Pure procedural field math for the backdrop scenes.
//!
//! Everything in this crate is platform-free: value noise and fBm, the
//! ordered-dither matrix, the click ring buffer with its expanding rings,
//! palettes, and the per-scene shading functions. The renderer crate drives
//! these either from a CPU pixel loop or from WGSL ports of the same
//! formulas; this crate is the reference implementation both are held to.

pub mod dither;
pub mod noise;
pub mod palette;
pub mod ripple;
pub mod scene;

pub use noise::{fbm, value_noise, FbmParams};
pub use palette::{Palette, PaletteError, Rgba};
pub use ripple::{ClickEvent, ClickLog, RippleParams, CLICK_CAPACITY};
pub use scene::{FieldState, Scene, SceneKind, SceneParams};
