//! Countdown timers.
//!
//! A [`TimerManager`] owns every active [`Timer`], keyed by its code. Each
//! [`tick`](TimerManager::tick) decrements all counters, then runs the
//! completion action of every timer that reached zero and drops it. Actions
//! receive a mutable context `C` (the session's world) and may fail; a failed
//! timer is logged, reported in the [`TickReport`] and removed all the same.

use std::{collections::HashMap, fmt::Display};

use log::{trace, warn};

use crate::error::TimerFailure;

/// Completion action of a timer.
pub type TimerAction<C> = Box<dyn FnOnce(&mut C) -> Result<(), TimerFailure>>;

/// Subsystem a timer belongs to; used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerKind {
	/// Drives an animation change
	Animation,
	/// Camera behavior such as a scroll lock
	Camera,
	/// Gameplay effect such as a power-up expiring
	Gameplay,
	/// Anything else
	#[default]
	Other,
}

impl Display for TimerKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Animation => write!(f, "animation"),
			Self::Camera => write!(f, "camera"),
			Self::Gameplay => write!(f, "gameplay"),
			Self::Other => write!(f, "other"),
		}
	}
}

/// A countdown with a completion action.
pub struct Timer<C> {
	code: String,
	kind: TimerKind,
	remaining: i64,
	action: TimerAction<C>,
}

impl<C> Timer<C> {
	/// Creates a timer that fires after `ticks` ticks.
	///
	/// A timer created with `ticks <= 1` fires on the next tick.
	pub fn new(
		code: impl Into<String>,
		kind: TimerKind,
		ticks: i64,
		action: impl FnOnce(&mut C) -> Result<(), TimerFailure> + 'static,
	) -> Self {
		Self {
			code: code.into(),
			kind,
			remaining: ticks,
			action: Box::new(action),
		}
	}

	/// Unique code.
	pub fn code(&self) -> &str {
		&self.code
	}

	/// Owning subsystem.
	pub fn kind(&self) -> TimerKind {
		self.kind
	}

	/// Ticks left before the timer fires.
	pub fn remaining(&self) -> i64 {
		self.remaining
	}

	fn fire(self, context: &mut C) -> Result<(), TimerFailure> {
		(self.action)(context)
	}
}

impl<C> std::fmt::Debug for Timer<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Timer")
			.field("code", &self.code)
			.field("kind", &self.kind)
			.field("remaining", &self.remaining)
			.finish_non_exhaustive()
	}
}

/// A timer whose action failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTimer {
	/// Timer code
	pub code: String,
	/// Timer kind
	pub kind: TimerKind,
	/// Reported failure
	pub failure: TimerFailure,
}

/// Outcome of one [`TimerManager::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
	/// Codes of every timer that fired, in firing order
	pub fired: Vec<String>,
	/// Timers whose action failed
	pub failures: Vec<FailedTimer>,
}

impl TickReport {
	/// Returns `true` if no action failed.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Registry of active timers.
pub struct TimerManager<C> {
	timers: HashMap<String, Timer<C>>,
}

impl<C> Default for TimerManager<C> {
	fn default() -> Self {
		Self {
			timers: HashMap::new(),
		}
	}
}

impl<C> std::fmt::Debug for TimerManager<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_set().entries(self.timers.values()).finish()
	}
}

impl<C> TimerManager<C> {
	/// Creates an empty manager.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `timer`, replacing and returning any timer with the same code.
	pub fn register(&mut self, timer: Timer<C>) -> Option<Timer<C>> {
		trace!("register timer '{}' ({}, {} ticks)", timer.code, timer.kind, timer.remaining);
		self.timers.insert(timer.code.clone(), timer)
	}

	/// Removes the timer with `code`, if any.
	pub fn unregister(&mut self, code: &str) -> Option<Timer<C>> {
		self.timers.remove(code)
	}

	/// Looks up a timer by code.
	pub fn lookup(&self, code: &str) -> Option<&Timer<C>> {
		self.timers.get(code)
	}

	/// Returns `true` if a timer with `code` is registered.
	pub fn contains(&self, code: &str) -> bool {
		self.timers.contains_key(code)
	}

	/// Number of registered timers.
	pub fn len(&self) -> usize {
		self.timers.len()
	}

	/// Returns `true` if no timer is registered.
	pub fn is_empty(&self) -> bool {
		self.timers.is_empty()
	}

	/// Drops every timer without running its action.
	pub fn clear(&mut self) {
		self.timers.clear();
	}

	/// Codes of all registered timers, in no particular order.
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.timers.keys().map(String::as_str)
	}

	/// Advances every timer by one tick and fires the expired ones.
	///
	/// All counters are decremented before any action runs. Expired timers are
	/// taken out of the registry and fired in ascending code order; callers
	/// should not depend on that order. A failed action is logged and reported
	/// but never retried.
	pub fn tick(&mut self, context: &mut C) -> TickReport {
		let mut expired = Vec::new();
		for timer in self.timers.values_mut() {
			timer.remaining = timer.remaining.saturating_sub(1);
			if timer.remaining <= 0 {
				expired.push(timer.code.clone());
			}
		}
		expired.sort_unstable();

		let mut report = TickReport::default();
		for code in expired {
			let Some(timer) = self.timers.remove(&code) else {
				continue;
			};
			let kind = timer.kind;

			if let Err(failure) = timer.fire(context) {
				warn!("timer '{code}' ({kind}) failed: {failure}");
				report.failures.push(FailedTimer {
					code: code.clone(),
					kind,
					failure,
				});
			} else {
				trace!("timer '{code}' ({kind}) fired");
			}
			report.fired.push(code);
		}

		report
	}
}
