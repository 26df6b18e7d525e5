//! Constants for the Mega Drive style art tables.
//!
//! All multi-byte values in mapping and DPLC tables are big-endian.

/// Width and height of a tile pattern in pixels
pub const PATTERN_DIMENSION: usize = 8;

/// Number of pixels in a tile pattern
pub const PATTERN_PIXELS: usize = PATTERN_DIMENSION * PATTERN_DIMENSION;

/// Bits per pixel of pattern art
pub const BITS_PER_PIXEL: usize = 4;

/// Size of one encoded tile pattern in bytes (32 bytes)
pub const PATTERN_SIZE: usize = PATTERN_PIXELS * BITS_PER_PIXEL / 8;

/// Size of a frame header (piece or entry count, u16)
pub const FRAME_HEADER_SIZE: usize = 2;

/// Size of a single mapping piece record (8 bytes)
pub const MAPPING_PIECE_SIZE: usize = 8;

/// Size of a single DPLC entry (2 bytes)
pub const DPLC_ENTRY_SIZE: usize = 2;

/// Size of an offset table entry (u16)
pub const OFFSET_ENTRY_SIZE: usize = 2;

/// Highest valid size class byte (`0000wwhh`)
pub const MAX_SIZE_CLASS: u8 = 0x0F;

/// Largest piece width or height in patterns
pub const MAX_PIECE_DIMENSION: u8 = 4;

/// Highest palette line
pub const MAX_PALETTE_LINE: u8 = 3;

/// Pattern word: priority flag
pub const PRIORITY_BIT: u16 = 0x8000;

/// Pattern word: palette line mask (bits 13-14)
pub const PALETTE_MASK: u16 = 0x6000;

/// Pattern word: palette line shift
pub const PALETTE_SHIFT: u16 = 13;

/// Pattern word: vertical flip flag
pub const VFLIP_BIT: u16 = 0x1000;

/// Pattern word: horizontal flip flag
pub const HFLIP_BIT: u16 = 0x0800;

/// Pattern word: pattern index mask (bits 0-10)
pub const PATTERN_INDEX_MASK: u16 = 0x07FF;

/// DPLC entry: source pattern index mask (bits 0-11)
pub const DPLC_INDEX_MASK: u16 = 0x0FFF;

/// DPLC entry: run length shift (bits 12-15 hold `count - 1`)
pub const DPLC_COUNT_SHIFT: u16 = 12;

/// Longest run a single DPLC entry can describe
pub const DPLC_MAX_RUN: u8 = 16;

/// Animation script: loop back to the first step
pub const SCRIPT_LOOP: u8 = 0xFF;

/// Animation script: loop back `n` steps (followed by `n`)
pub const SCRIPT_LOOP_BACK: u8 = 0xFE;

/// Animation script: switch to another animation (followed by its id)
pub const SCRIPT_SWITCH: u8 = 0xFD;

/// Animation script: hold on the last frame and signal the object routine
pub const SCRIPT_ROUTINE: u8 = 0xFC;

/// Animation script: hold on the last frame and reset the object routine
pub const SCRIPT_RESET: u8 = 0xFB;

/// Animation script: hold on the last frame and advance the secondary routine
pub const SCRIPT_SECONDARY: u8 = 0xFA;

/// First byte value treated as a script command rather than a frame
pub const SCRIPT_COMMAND_BASE: u8 = 0xF0;
