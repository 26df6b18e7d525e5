//! Compact animation scripts.
//!
//! Object animation tables in the data image store each animation as a byte
//! script: a delay byte shared by every step, the frame bytes, then a
//! terminating command.
//!
//! ```text
//! Byte    Meaning
//! ------  ------------------------------------------------------
//! 0       delay: each frame is shown for delay + 1 ticks
//!         (0xFF = speed controlled, use the bundle's default delay)
//! 1..     frame indices (< 0xF0)
//! 0xFF    loop to the first step
//! 0xFE n  loop back n steps
//! 0xFD a  switch to animation a
//! 0xFC    hold, advance the object routine
//! 0xFB    hold, reset the object routine
//! 0xFA    hold, advance the secondary routine
//! ```
//!
//! Script tables use the same `u16` offset header as mapping tables.

use std::fmt::Display;

use super::{
	animation::{Animation, AnimationStep},
	constants::{
		SCRIPT_COMMAND_BASE, SCRIPT_LOOP, SCRIPT_LOOP_BACK, SCRIPT_RESET, SCRIPT_ROUTINE,
		SCRIPT_SECONDARY, SCRIPT_SWITCH,
	},
	error::{DecodeError, TableKind},
	table,
};

/// Delay byte meaning "driven by the object's speed".
pub const SPEED_CONTROLLED_DELAY: u8 = 0xFF;

/// What a script does after its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptEnd {
	/// Jump back to step `n`
	Loop(usize),
	/// Switch to another animation id
	Switch(u8),
	/// Hold and advance the object routine
	AdvanceRoutine,
	/// Hold and reset the object routine
	ResetRoutine,
	/// Hold and advance the secondary routine
	AdvanceSecondary,
}

impl Display for ScriptEnd {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Loop(step) => write!(f, "Loop(→{step})"),
			Self::Switch(anim) => write!(f, "Switch({anim})"),
			Self::AdvanceRoutine => write!(f, "AdvanceRoutine"),
			Self::ResetRoutine => write!(f, "ResetRoutine"),
			Self::AdvanceSecondary => write!(f, "AdvanceSecondary"),
		}
	}
}

/// A decoded animation script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationScript {
	delay: u8,
	frames: Vec<u8>,
	end: ScriptEnd,
}

impl AnimationScript {
	/// Raw delay byte.
	pub fn delay(&self) -> u8 {
		self.delay
	}

	/// Frame indices in order.
	pub fn frames(&self) -> &[u8] {
		&self.frames
	}

	/// Terminating command.
	pub fn end(&self) -> ScriptEnd {
		self.end
	}

	/// Ticks each frame is displayed, or `None` when speed controlled.
	pub fn step_duration(&self) -> Option<u32> {
		if self.delay == SPEED_CONTROLLED_DELAY {
			None
		} else {
			Some(u32::from(self.delay) + 1)
		}
	}

	/// Converts the script into an [`Animation`].
	///
	/// Anything other than a loop becomes a one-shot animation holding its
	/// last frame.
	pub fn to_animation(&self) -> Animation {
		let duration = self.step_duration();
		let steps = self
			.frames
			.iter()
			.map(|&frame| AnimationStep {
				frame: frame as usize,
				duration,
			})
			.collect();

		match self.end {
			ScriptEnd::Loop(target) => Animation::looping(steps, target),
			_ => Animation::one_shot(steps),
		}
	}

	/// Decodes a script. Bytes after the terminator are ignored.
	///
	/// # Errors
	///
	/// Returns an error if the script is truncated, has no frames, or uses an
	/// unknown command or an impossible loop-back distance.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		let table = TableKind::AnimationScript;
		let Some(&delay) = data.first() else {
			return Err(DecodeError::insufficient_data(table, 1, 0));
		};

		let mut frames = Vec::new();
		let mut position = 1;
		let end = loop {
			let Some(&byte) = data.get(position) else {
				return Err(DecodeError::insufficient_data(table, position + 1, data.len()));
			};

			if byte < SCRIPT_COMMAND_BASE {
				frames.push(byte);
				position += 1;
				continue;
			}

			let argument = || {
				data.get(position + 1)
					.copied()
					.ok_or_else(|| DecodeError::insufficient_data(table, position + 2, data.len()))
			};

			break match byte {
				SCRIPT_LOOP => ScriptEnd::Loop(0),
				SCRIPT_LOOP_BACK => {
					let back = argument()? as usize;
					if back == 0 || back > frames.len() {
						return Err(DecodeError::InvalidScriptCommand {
							command: byte,
							position,
						});
					}
					ScriptEnd::Loop(frames.len() - back)
				}
				SCRIPT_SWITCH => ScriptEnd::Switch(argument()?),
				SCRIPT_ROUTINE => ScriptEnd::AdvanceRoutine,
				SCRIPT_RESET => ScriptEnd::ResetRoutine,
				SCRIPT_SECONDARY => ScriptEnd::AdvanceSecondary,
				_ => {
					return Err(DecodeError::InvalidScriptCommand {
						command: byte,
						position,
					});
				}
			};
		};

		if frames.is_empty() {
			return Err(DecodeError::EmptyScript);
		}

		Ok(Self {
			delay,
			frames,
			end,
		})
	}
}

impl Display for AnimationScript {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "AnimationScript(delay={}, {} frames, {})", self.delay, self.frames.len(), self.end)
	}
}

/// Decodes an animation script table.
///
/// # Errors
///
/// Returns an error if the offset header or any script is malformed.
pub fn decode_script_table(data: &[u8]) -> Result<Vec<AnimationScript>, DecodeError> {
	table::decode_table(data, TableKind::AnimationScript, AnimationScript::from_bytes)
}
