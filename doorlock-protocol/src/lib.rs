//! Doorlock inter-node link protocol
//!
//! The HMI node and the control node share one 9600 8N1 serial line and
//! exchange single bytes only. There is no framing and no checksum; instead,
//! every payload byte is gated by a readiness handshake:
//!
//! ```text
//!   receiver                      sender
//!   ────────                      ──────
//!   send own READY  ───────────▶  discard bytes until peer READY seen
//!   read payload    ◀───────────  send payload byte
//! ```
//!
//! Because each side waits for the other before every byte, the two nodes
//! never drift apart by more than one pending byte.
//!
//! # Vocabulary
//!
//! | byte | meaning                           |
//! |------|-----------------------------------|
//! | 0x10 | HMI node ready                    |
//! | 0x20 | control node ready                |
//! | 0x30 | open the door                     |
//! | 0x40 | change the password               |
//! | 0x50 | wrong password, sound the alarm   |
//!
//! Verdict replies (`Same`/`NotSame`, `Matched`/`NotMatched`) are the bytes
//! 1 and 0 and are only meaningful at the position the protocol expects them.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod link;

pub use command::{Command, NodeRole, Reply};
pub use link::{Awaiting, Link, LinkConfig, LinkError, WaitPolicy};
