//! Commonly used engine types.

pub use crate::{
	AnimationError, AnimationState, ArtCache, Collidable, DrawRequest, Monitor, MonitorKind,
	PlayerState, Renderer, Session, SessionError, Sprite, SpriteKind, TickReport, Timer,
	TimerFailure, TimerKind, TimerManager, World,
};
