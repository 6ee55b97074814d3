//! Readiness-gated byte link between the two nodes
//!
//! A [`Link`] is bound to one [`NodeRole`] and knows both its own and the
//! peer's ready sentinel. All waits are explicit poll loops over a
//! non-blocking read, paced by a [`DelayNs`] and limited by a [`WaitPolicy`].
//!
//! A single ready code can be lost (sent before the peer was listening, or
//! drained after a fault). Both sides recover without a reset:
//!
//! - a sender that hears nothing repeats its own ready code every
//!   [`LinkConfig::nudge_after_ms`]
//! - a receiver waiting for payload answers the peer's ready code by
//!   announcing again
//! - ready codes are never payload, replies or commands, so stale ones are
//!   skipped wherever a data byte is expected

use doorlock_hal::{UartRx, UartTx};
use embedded_hal::delay::DelayNs;

use crate::command::{Command, NodeRole};

/// How long a single wait may poll before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Poll until a byte arrives
    Forever,
    /// Poll for at most this many milliseconds
    Within(u32),
}

impl WaitPolicy {
    fn budget_us(self) -> Option<u64> {
        match self {
            WaitPolicy::Forever => None,
            WaitPolicy::Within(ms) => Some(ms as u64 * 1000),
        }
    }
}

/// Link timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Delay between two empty polls of the receiver
    pub poll_interval_us: u32,
    /// Wait for the peer's ready sentinel and for verdict replies
    pub handshake_wait: WaitPolicy,
    /// Wait for payload bytes and commands, which may follow human input
    pub payload_wait: WaitPolicy,
    /// Silence after which a node waiting for the peer's ready code sends
    /// its own; 0 turns this off
    pub nudge_after_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            poll_interval_us: 100,
            handshake_wait: WaitPolicy::Within(2_000),
            payload_wait: WaitPolicy::Forever,
            nudge_after_ms: 500,
        }
    }
}

/// What a timed-out wait was waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Awaiting {
    /// The peer's ready sentinel
    PeerReady,
    /// A payload byte, reply or command
    Byte,
}

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The underlying UART failed
    Transport(E),
    /// A bounded wait ran out
    Timeout { awaiting: Awaiting },
    /// A byte arrived where a command was expected but decodes to none
    Unexpected(u8),
}

impl<E> From<E> for LinkError<E> {
    fn from(e: E) -> Self {
        LinkError::Transport(e)
    }
}

/// Whether `byte` is either node's ready code
fn is_ready_byte(byte: u8) -> bool {
    Command::from_byte(byte).is_some_and(Command::is_ready)
}

/// Elapsed-time bookkeeping for one wait
struct Wait {
    budget_us: Option<u64>,
    elapsed_us: u64,
}

impl Wait {
    fn new(policy: WaitPolicy) -> Self {
        Self {
            budget_us: policy.budget_us(),
            elapsed_us: 0,
        }
    }

    fn expired(&self) -> bool {
        matches!(self.budget_us, Some(budget) if self.elapsed_us >= budget)
    }
}

/// Handshake link over a byte UART
pub struct Link<U, D> {
    uart: U,
    delay: D,
    role: NodeRole,
    config: LinkConfig,
}

impl<U, D> Link<U, D> {
    /// Create a link with default timing
    pub fn new(uart: U, delay: D, role: NodeRole) -> Self {
        Self::with_config(uart, delay, role, LinkConfig::default())
    }

    /// Create a link with explicit timing
    pub fn with_config(uart: U, delay: D, role: NodeRole, config: LinkConfig) -> Self {
        Self {
            uart,
            delay,
            role,
            config,
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The delay used for polling, for callers pacing their own waits
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Release the UART and delay
    pub fn into_parts(self) -> (U, D) {
        (self.uart, self.delay)
    }
}

impl<U, D, E> Link<U, D>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
    D: DelayNs,
{
    /// Send `payload` one byte at a time, each after the peer's ready sentinel
    pub fn exchange_bytes(&mut self, payload: &[u8]) -> Result<(), LinkError<E>> {
        for &byte in payload {
            self.await_ready()?;
            self.uart.write_byte(byte)?;
        }
        self.uart.flush()?;
        Ok(())
    }

    /// Receive `out.len()` bytes, announcing readiness before each one
    pub fn collect_bytes(&mut self, out: &mut [u8]) -> Result<(), LinkError<E>> {
        for slot in out.iter_mut() {
            self.signal_ready()?;
            *slot = self.read_announced(self.config.payload_wait)?;
        }
        Ok(())
    }

    /// Wait for the peer's ready sentinel, discarding any other byte
    ///
    /// After every `nudge_after_ms` of silence our own sentinel goes out,
    /// which a peer blocked in a payload read answers with a fresh one.
    pub fn await_ready(&mut self) -> Result<(), LinkError<E>> {
        let ready = self.role.peer_ready().to_byte();
        let nudge_us = u64::from(self.config.nudge_after_ms) * 1000;
        let mut next_nudge_us = nudge_us;
        let mut wait = Wait::new(self.config.handshake_wait);
        loop {
            match self.poll(&mut wait)? {
                Some(byte) if byte == ready => return Ok(()),
                Some(_) => continue,
                None if wait.expired() => {
                    return Err(LinkError::Timeout {
                        awaiting: Awaiting::PeerReady,
                    })
                }
                None if nudge_us > 0 && wait.elapsed_us >= next_nudge_us => {
                    self.signal_ready()?;
                    next_nudge_us += nudge_us;
                }
                None => {}
            }
        }
    }

    /// Announce that this node is ready for the next byte
    pub fn signal_ready(&mut self) -> Result<(), LinkError<E>> {
        self.uart.write_byte(self.role.ready().to_byte())?;
        self.uart.flush()?;
        Ok(())
    }

    /// Send a command once the peer is ready
    pub fn send_command(&mut self, command: Command) -> Result<(), LinkError<E>> {
        self.await_ready()?;
        self.uart.write_byte(command.to_byte())?;
        self.uart.flush()?;
        Ok(())
    }

    /// Announce readiness then read and decode one command
    pub fn receive_command(&mut self) -> Result<Command, LinkError<E>> {
        self.signal_ready()?;
        let byte = self.read_announced(self.config.payload_wait)?;
        Command::from_byte(byte).ok_or(LinkError::Unexpected(byte))
    }

    /// Announce readiness then read one raw reply byte
    ///
    /// Ready codes still in flight from the exchange before are skipped; the
    /// query is not repeated for them, since the peer never waits on it twice.
    pub fn query(&mut self) -> Result<u8, LinkError<E>> {
        self.signal_ready()?;
        self.read_data(self.config.handshake_wait, false)
    }

    /// Send one raw reply byte once the peer is ready
    pub fn respond(&mut self, byte: u8) -> Result<(), LinkError<E>> {
        self.await_ready()?;
        self.uart.write_byte(byte)?;
        self.uart.flush()?;
        Ok(())
    }

    /// Discard everything already received; returns the number of bytes dropped
    pub fn drain(&mut self) -> Result<usize, LinkError<E>> {
        let mut dropped = 0;
        while self.uart.try_read_byte()?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }

    /// Read the byte that answers our announcement, announcing again if the
    /// peer shows it missed the first one
    fn read_announced(&mut self, policy: WaitPolicy) -> Result<u8, LinkError<E>> {
        self.read_data(policy, true)
    }

    /// Read the next byte that is not a ready code
    fn read_data(&mut self, policy: WaitPolicy, reannounce: bool) -> Result<u8, LinkError<E>> {
        let peer_ready = self.role.peer_ready().to_byte();
        let mut wait = Wait::new(policy);
        loop {
            match self.poll(&mut wait)? {
                Some(byte) if byte == peer_ready && reannounce => self.signal_ready()?,
                Some(byte) if is_ready_byte(byte) => {}
                Some(byte) => return Ok(byte),
                None if wait.expired() => {
                    return Err(LinkError::Timeout {
                        awaiting: Awaiting::Byte,
                    })
                }
                None => {}
            }
        }
    }

    /// One poll; sleeps the poll interval when nothing had arrived
    fn poll(&mut self, wait: &mut Wait) -> Result<Option<u8>, LinkError<E>> {
        if let Some(byte) = self.uart.try_read_byte()? {
            return Ok(Some(byte));
        }
        if !wait.expired() {
            let interval = self.config.poll_interval_us.max(1);
            self.delay.delay_us(interval);
            wait.elapsed_us += interval as u64;
        }
        Ok(None)
    }
}
