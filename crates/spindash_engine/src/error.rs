//! Error types for the runtime.

use spindash_types::art::LoadError;
use thiserror::Error;

/// Errors raised by animation requests.
///
/// All of them leave the sprite's playback state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
	/// The animation is not declared in the sprite's profile
	#[error("Unknown animation '{name}'")]
	UnknownAnimation {
		/// Requested animation name
		name: String,
	},

	/// The sprite has no art attached
	#[error("Sprite '{sprite}' has no art")]
	MissingArt {
		/// Sprite code
		sprite: String,
	},

	/// No sprite with this code exists
	#[error("Unknown sprite '{sprite}'")]
	UnknownSprite {
		/// Sprite code
		sprite: String,
	},
}

/// Failure reported by a timer's completion action.
///
/// A failing timer is logged and removed like any other expired timer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerFailure {
	/// Free-form failure message
	#[error("{0}")]
	Message(String),

	/// The action tried to change an animation and failed
	#[error(transparent)]
	Animation(#[from] AnimationError),
}

impl TimerFailure {
	/// Creates a failure from a message.
	pub fn message(message: impl Into<String>) -> Self {
		Self::Message(message.into())
	}
}

/// Errors raised by [`Session`](crate::Session) operations.
#[derive(Debug, Error)]
pub enum SessionError {
	/// No sprite with this code exists
	#[error("Unknown sprite '{0}'")]
	UnknownSprite(String),

	/// Animation request failed
	#[error(transparent)]
	Animation(#[from] AnimationError),

	/// Loading art failed
	#[error(transparent)]
	Load(#[from] LoadError),
}
