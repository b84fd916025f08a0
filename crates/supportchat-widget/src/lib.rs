// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and session state machine for the SupportChat widget.
//!
//! - [`ConversationStore`]: the active session id and its ordered message
//!   log; owns the optimistic send protocol.
//! - [`SessionRegistry`]: the catalogue of backend sessions for the history
//!   browser.
//! - [`FaqIndex`]: FAQ reference entries with case-insensitive search.
//! - [`SupportWidget`]: one widget instance wiring the above together, with
//!   history and FAQ as optional sub-features.

pub mod conversation;
pub mod faq;
pub mod registry;
pub mod widget;

pub use conversation::{ConversationOptions, ConversationStore, PendingSend, SendOutcome};
pub use faq::FaqIndex;
pub use registry::SessionRegistry;
pub use widget::{SupportWidget, WidgetOptions};
