use core::cell::Cell;

use critical_section::Mutex;

use crate::HandshakeState;

/// A one-slot mailbox raised by the transmit-complete interrupt.
///
/// The interrupt handler only calls [`CompletionSignal::signal()`]; the main loop only
/// consumes it through [`CompletionSignal::take()`]. Signals raised before the
/// previous one was taken collapse into one.
///
/// ```
/// use nrf_link::radio::CompletionSignal;
///
/// static TX_COMPLETE: CompletionSignal = CompletionSignal::new();
///
/// // in the IRQ pin's falling-edge handler
/// TX_COMPLETE.signal();
///
/// // in the main loop
/// assert!(TX_COMPLETE.take());
/// assert!(!TX_COMPLETE.take());
/// ```
pub struct CompletionSignal {
    flag: Mutex<Cell<bool>>,
}

impl CompletionSignal {
    pub const fn new() -> Self {
        Self {
            flag: Mutex::new(Cell::new(false)),
        }
    }

    /// Raise the signal. Safe to call from an interrupt handler.
    pub fn signal(&self) {
        critical_section::with(|cs| self.flag.borrow(cs).set(true));
    }

    /// Test and clear the signal in one step.
    ///
    /// Returns `true` exactly once per raised signal.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.flag.borrow(cs).replace(false))
    }

    /// Is a signal waiting to be taken?
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.flag.borrow(cs).get())
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// The send side of the completion handshake.
///
/// ```text
/// Idle --arm()--> AwaitingCompletion --poll() == true--> Idle
///                          |
///                          +--abandon()--> Idle
/// ```
pub struct Handshake<'s> {
    signal: &'s CompletionSignal,
    state: HandshakeState,
    armed: u32,
    completed: u32,
}

impl<'s> Handshake<'s> {
    pub fn new(signal: &'s CompletionSignal) -> Self {
        Self {
            signal,
            state: HandshakeState::Idle,
            armed: 0,
            completed: 0,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// The number of times [`Handshake::arm()`] moved out of [`HandshakeState::Idle`].
    pub fn armed(&self) -> u32 {
        self.armed
    }

    /// The number of transmissions acknowledged by [`Handshake::poll()`].
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Start waiting for a completion.
    ///
    /// A signal left over from an earlier (abandoned) transmission is discarded,
    /// so it can never complete this one.
    pub fn arm(&mut self) {
        self.signal.take();
        if self.state == HandshakeState::Idle {
            self.armed = self.armed.wrapping_add(1);
        }
        self.state = HandshakeState::AwaitingCompletion;
    }

    /// Consume a pending completion.
    ///
    /// Returns `true` (and goes back to [`HandshakeState::Idle`]) if the
    /// completion arrived. Always `false` while [`HandshakeState::Idle`].
    pub fn poll(&mut self) -> bool {
        if self.state != HandshakeState::AwaitingCompletion || !self.signal.take() {
            return false;
        }
        self.state = HandshakeState::Idle;
        self.completed = self.completed.wrapping_add(1);
        true
    }

    /// Give up waiting without a completion.
    pub fn abandon(&mut self) {
        self.state = HandshakeState::Idle;
    }
}
