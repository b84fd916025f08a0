// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the widget state machine and the outside world.

pub mod gateway;

pub use gateway::BackendGateway;
