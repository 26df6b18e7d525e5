//! Forces dynamic linking of `spindash` when the `dynamic_linking` feature is enabled.
//!
//! Only meant for faster incremental builds during development.

#![allow(clippy::single_component_path_imports)]
#![allow(unused_imports)]

use spindash_internal;
