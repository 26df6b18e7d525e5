//! Runtime side of `spindash-rs`.
//!
//! Everything here runs inside the single-threaded game loop:
//!
//! - [`animation`]: per-sprite animation playback
//! - [`timer`]: countdown timers with completion actions
//! - [`sprite`]: sprites, draw requests and the rendering collaborator
//! - [`monitor`]: collidable item monitors and the player state they affect
//! - [`art_cache`]: session-scoped cache of loaded sprite art
//! - [`session`]: owns all of the above and drives one tick at a time
//!
//! A tick always processes timers before animations, so a timer that switches
//! a sprite's animation is visible in the same tick.

pub mod animation;
pub mod art_cache;
mod error;
pub mod monitor;
pub mod prelude;
pub mod session;
pub mod sprite;
pub mod timer;

pub use animation::AnimationState;
pub use art_cache::ArtCache;
pub use error::{AnimationError, SessionError, TimerFailure};
pub use monitor::{Collidable, Monitor, MonitorKind, PlayerState};
pub use session::{Session, World};
pub use sprite::{DrawRequest, Renderer, Sprite, SpriteKind};
pub use timer::{FailedTimer, TickReport, Timer, TimerKind, TimerManager};
