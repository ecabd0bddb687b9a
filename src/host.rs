// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The host/frontend seam (§6 External Interfaces).
//!
//! This crate has no display, audio or input of its own (the PPU/APU/
//! joypad are Non-goals); a real frontend plugs in through [`HostHooks`]
//! to learn about events the core itself can't act on, like the CPU
//! executing `STOP` or the serial tap capturing a byte.

/// Events the emulator driver reports to its host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
	/// A byte was captured by the serial debug tap.
	SerialByte(u8),
	/// The CPU executed `STOP`.
	Stopped,
}

/// Hooks a host implements to drive the emulator and react to what it
/// does. The default, no-op implementations let a minimal host (a test
/// harness, a headless ROM runner) implement only what it needs.
pub trait HostHooks {
	/// Called once per emulated frame's worth of cycles (or any cadence
	/// the driver chooses) to ask whether the run loop should stop.
	fn quit_requested(&mut self) -> bool {
		false
	}

	/// Called after each step with the wall-clock duration, in
	/// milliseconds, that step's m-cycles represent, so a host pacing
	/// itself to real time can yield for that long.
	fn sleep(&mut self, _ms: u64) {}

	/// Called with each [`Event`] as it happens.
	fn on_event(&mut self, _event: Event) {}
}

/// A [`HostHooks`] that does nothing, for running the core headlessly.
#[derive(Default)]
pub struct NullHost;

impl HostHooks for NullHost {}
