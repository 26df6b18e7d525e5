//! Animation profiles and animation sets.
//!
//! An [`AnimationSet`] holds, per animation name, the ordered
//! `(frame, duration)` steps and an optional loop target. An
//! [`AnimationProfile`] declares which animations a sprite species has and
//! which frames and loop targets each of them may use.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// One step of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationStep {
	/// Index into the bundle's mapping/DPLC frames
	pub frame: usize,
	/// Display time in ticks; `None` uses the bundle's default frame delay
	#[serde(default)]
	pub duration: Option<u32>,
}

impl AnimationStep {
	/// Creates a step with an explicit duration.
	pub fn new(frame: usize, duration: u32) -> Self {
		Self {
			frame,
			duration: Some(duration),
		}
	}

	/// Creates a step that uses the bundle's default frame delay.
	pub fn with_default_delay(frame: usize) -> Self {
		Self {
			frame,
			duration: None,
		}
	}
}

/// Ordered steps of one named animation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Animation {
	steps: Vec<AnimationStep>,
	#[serde(default)]
	loop_target: Option<usize>,
}

impl Animation {
	/// Creates an animation; `loop_target` of `None` makes it one-shot.
	pub fn new(steps: Vec<AnimationStep>, loop_target: Option<usize>) -> Self {
		Self {
			steps,
			loop_target,
		}
	}

	/// Creates an animation that jumps to `target` after its last step.
	pub fn looping(steps: Vec<AnimationStep>, target: usize) -> Self {
		Self::new(steps, Some(target))
	}

	/// Creates an animation that holds its last step.
	pub fn one_shot(steps: Vec<AnimationStep>) -> Self {
		Self::new(steps, None)
	}

	/// Returns the steps.
	pub fn steps(&self) -> &[AnimationStep] {
		&self.steps
	}

	/// Returns the step at `index`.
	pub fn step(&self, index: usize) -> Option<&AnimationStep> {
		self.steps.get(index)
	}

	/// Step the animation jumps to after its last step, if it loops.
	pub fn loop_target(&self) -> Option<usize> {
		self.loop_target
	}

	/// Returns `true` if the animation holds its last step.
	pub fn is_one_shot(&self) -> bool {
		self.loop_target.is_none()
	}

	/// Number of steps.
	pub fn len(&self) -> usize {
		self.steps.len()
	}

	/// Returns `true` if there are no steps.
	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Step that follows `step`, or `None` when a one-shot animation is done.
	pub fn next_step(&self, step: usize) -> Option<usize> {
		let next = step + 1;
		if next < self.steps.len() {
			Some(next)
		} else {
			self.loop_target
		}
	}

	/// Sum of all explicit step durations, using `default_delay` for the rest.
	pub fn total_ticks(&self, default_delay: u32) -> u64 {
		self.steps.iter().map(|s| u64::from(s.duration.unwrap_or(default_delay).max(1))).sum()
	}
}

/// All animations of a sprite species, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSet {
	animations: BTreeMap<String, Animation>,
}

impl AnimationSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces an animation.
	pub fn insert(&mut self, name: impl Into<String>, animation: Animation) -> Option<Animation> {
		self.animations.insert(name.into(), animation)
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, name: impl Into<String>, animation: Animation) -> Self {
		self.insert(name, animation);
		self
	}

	/// Looks up an animation by name.
	pub fn get(&self, name: &str) -> Option<&Animation> {
		self.animations.get(name)
	}

	/// Returns `true` if `name` has a sequence.
	pub fn contains(&self, name: &str) -> bool {
		self.animations.contains_key(name)
	}

	/// Animation names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.animations.keys().map(String::as_str)
	}

	/// Iterates over `(name, animation)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Animation)> {
		self.animations.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of animations.
	pub fn len(&self) -> usize {
		self.animations.len()
	}

	/// Returns `true` if the set is empty.
	pub fn is_empty(&self) -> bool {
		self.animations.is_empty()
	}
}

/// Playback constraints for one declared animation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
	/// Frame indices the animation may show; empty allows any frame
	#[serde(default)]
	pub allowed_frames: BTreeSet<usize>,
	/// Inclusive range of steps the animation may loop back to
	#[serde(default)]
	pub loop_range: Option<(usize, usize)>,
}

impl ProfileEntry {
	/// Entry without constraints.
	pub fn unrestricted() -> Self {
		Self::default()
	}

	/// Entry restricted to the given frames.
	pub fn with_frames(frames: impl IntoIterator<Item = usize>) -> Self {
		Self {
			allowed_frames: frames.into_iter().collect(),
			loop_range: None,
		}
	}

	/// Restricts loop targets to `first..=last`.
	pub fn with_loop_range(mut self, first: usize, last: usize) -> Self {
		self.loop_range = Some((first, last));
		self
	}

	/// Returns `true` if `frame` may be shown.
	pub fn allows_frame(&self, frame: usize) -> bool {
		self.allowed_frames.is_empty() || self.allowed_frames.contains(&frame)
	}

	/// Returns `true` if looping back to `target` is allowed.
	pub fn allows_loop_target(&self, target: usize) -> bool {
		match self.loop_range {
			Some((first, last)) => (first..=last).contains(&target),
			None => true,
		}
	}
}

/// Declares the animations a sprite species supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationProfile {
	entries: BTreeMap<String, ProfileEntry>,
}

impl AnimationProfile {
	/// Creates an empty profile.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares an animation.
	pub fn declare(&mut self, name: impl Into<String>, entry: ProfileEntry) {
		self.entries.insert(name.into(), entry);
	}

	/// Builder-style [`declare`](Self::declare).
	pub fn with(mut self, name: impl Into<String>, entry: ProfileEntry) -> Self {
		self.declare(name, entry);
		self
	}

	/// Declares every animation of `set` without constraints.
	pub fn unrestricted_for(set: &AnimationSet) -> Self {
		Self {
			entries: set.names().map(|n| (n.to_string(), ProfileEntry::unrestricted())).collect(),
		}
	}

	/// Returns `true` if `name` is declared.
	pub fn is_declared(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Returns the constraints for `name`.
	pub fn get(&self, name: &str) -> Option<&ProfileEntry> {
		self.entries.get(name)
	}

	/// Declared animation names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Number of declared animations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if nothing is declared.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Checks `set` against this profile and a bundle with `frame_count` frames.
	///
	/// # Errors
	///
	/// Returns the first violated constraint.
	pub fn validate(&self, set: &AnimationSet, frame_count: usize) -> Result<(), ValidationError> {
		if let Some(missing) = self.names().find(|name| !set.contains(name)) {
			return Err(ValidationError::MissingSequence(missing.to_string()));
		}

		for (name, animation) in set.iter() {
			let Some(entry) = self.get(name) else {
				return Err(ValidationError::UndeclaredAnimation(name.to_string()));
			};

			if animation.is_empty() {
				return Err(ValidationError::EmptyAnimation(name.to_string()));
			}

			for (step, s) in animation.steps().iter().enumerate() {
				if s.frame >= frame_count {
					return Err(ValidationError::FrameOutOfRange {
						animation: name.to_string(),
						step,
						frame: s.frame,
						frame_count,
					});
				}
				if !entry.allows_frame(s.frame) {
					return Err(ValidationError::FrameNotAllowed {
						animation: name.to_string(),
						step,
						frame: s.frame,
					});
				}
			}

			if let Some(target) = animation.loop_target()
				&& (target >= animation.len() || !entry.allows_loop_target(target))
			{
				return Err(ValidationError::InvalidLoopTarget {
					animation: name.to_string(),
					target,
				});
			}
		}

		Ok(())
	}
}
