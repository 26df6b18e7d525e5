//! Animation playback.
//!
//! Each sprite owns an [`AnimationState`]: the name of the animation it is
//! playing, the current step and the ticks left before that step advances.
//! The state never owns art; every operation takes the sprite's
//! [`SpriteArtBundle`] so one bundle can drive any number of sprites.
//!
//! Playback rules:
//!
//! - a fresh state is idle and shows nothing;
//! - starting an animation shows step 0 for its full duration;
//! - every [`advance`](AnimationState::advance) removes one tick, and when the
//!   count reaches zero the next step starts (or the loop target after the
//!   last step);
//! - a one-shot animation holds its last step and reports itself finished.

use log::{debug, trace};
use spindash_types::art::{AnimationStep, DplcFrame, MappingFrame, SpriteArtBundle};

use crate::error::AnimationError;

/// Per-sprite animation playback state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationState {
	current: Option<String>,
	step: usize,
	ticks_remaining: u32,
	finished: bool,
	upload_pending: bool,
}

/// Ticks a step is displayed; zero-length steps still show for one tick.
fn step_ticks(art: &SpriteArtBundle, step: &AnimationStep) -> u32 {
	step.duration.unwrap_or(art.frame_delay()).max(1)
}

impl AnimationState {
	/// Creates an idle state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Name of the animation being played, `None` while idle.
	pub fn current(&self) -> Option<&str> {
		self.current.as_deref()
	}

	/// Current step index.
	pub fn step(&self) -> usize {
		self.step
	}

	/// Ticks left before the current step advances.
	pub fn ticks_remaining(&self) -> u32 {
		self.ticks_remaining
	}

	/// Returns `true` once a one-shot animation has reached its last step.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Returns `true` if no animation has been started.
	pub fn is_idle(&self) -> bool {
		self.current.is_none()
	}

	/// Returns `true` if the displayed frame changed since the last
	/// [`take_upload_pending`](Self::take_upload_pending).
	pub fn upload_pending(&self) -> bool {
		self.upload_pending
	}

	/// Clears and returns the upload flag.
	pub fn take_upload_pending(&mut self) -> bool {
		std::mem::take(&mut self.upload_pending)
	}

	/// Starts animation `name`.
	///
	/// Requesting the animation that is already playing does nothing and keeps
	/// the current position, so callers may re-request their state every tick.
	/// Returns `true` if playback was restarted.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::UnknownAnimation`] if the art does not declare
	/// `name`; the state is left unchanged.
	pub fn set_animation(&mut self, art: &SpriteArtBundle, name: &str) -> Result<bool, AnimationError> {
		if self.current.as_deref() == Some(name) {
			return Ok(false);
		}

		let first = art
			.profile()
			.is_declared(name)
			.then(|| art.animation(name))
			.flatten()
			.and_then(|a| a.step(0))
			.ok_or_else(|| AnimationError::UnknownAnimation {
				name: name.to_string(),
			})?;

		self.ticks_remaining = step_ticks(art, first);
		self.current = Some(name.to_string());
		self.step = 0;
		self.finished = false;
		self.upload_pending = true;

		debug!("animation -> '{name}' (frame {}, {} ticks)", first.frame, self.ticks_remaining);
		Ok(true)
	}

	/// Returns to the idle state.
	pub fn stop(&mut self) {
		*self = Self::default();
	}

	/// Advances playback by one tick.
	///
	/// Returns `true` if the displayed frame changed.
	pub fn advance(&mut self, art: &SpriteArtBundle) -> bool {
		if self.finished {
			return false;
		}
		let Some(animation) = self.current.as_deref().and_then(|name| art.animation(name)) else {
			return false;
		};

		self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
		if self.ticks_remaining > 0 {
			return false;
		}

		let Some(next) = animation.next_step(self.step) else {
			self.finished = true;
			trace!("animation '{}' finished at step {}", self.current.as_deref().unwrap_or_default(), self.step);
			return false;
		};
		let (Some(from), Some(to)) = (animation.step(self.step), animation.step(next)) else {
			return false;
		};

		let changed = from.frame != to.frame;
		self.step = next;
		self.ticks_remaining = step_ticks(art, to);
		self.upload_pending |= changed;

		trace!("step {} -> frame {} ({} ticks)", next, to.frame, self.ticks_remaining);
		changed
	}

	/// Frame index shown for the current step.
	pub fn frame_index(&self, art: &SpriteArtBundle) -> Option<usize> {
		let animation = art.animation(self.current.as_deref()?)?;
		animation.step(self.step).map(|s| s.frame)
	}

	/// Mapping and DPLC frame shown for the current step.
	pub fn current_frame<'a>(&self, art: &'a SpriteArtBundle) -> Option<(&'a MappingFrame, &'a DplcFrame)> {
		art.frame(self.frame_index(art)?)
	}
}
