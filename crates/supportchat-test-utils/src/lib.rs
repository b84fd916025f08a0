// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the SupportChat widget.
//!
//! Provides [`MockGateway`], a scripted in-memory [`BackendGateway`] for
//! deterministic state-machine tests without a running backend.
//!
//! [`BackendGateway`]: supportchat_core::BackendGateway

pub mod mock_gateway;

pub use mock_gateway::{session, turn, MockGateway};
