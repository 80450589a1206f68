// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Event State: small state machines that sit between host events and widget
//! behavior.
//!
//! - [`controllable`]: controlled/uncontrolled value reconciliation with exactly-once
//!   change notification.
//! - [`deferred`]: scheduled, cancelable, single-shot deferred tasks driven by
//!   host-supplied millisecond timestamps.
//!
//! Time never comes from a clock inside these types. Every time-dependent call takes
//! `now: u64` in milliseconds, so hosts and tests control it completely.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod controllable;
pub mod deferred;
