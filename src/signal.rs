//! System light/dark preference signal.
//!
//! The browser backend wraps `matchMedia("(prefers-color-scheme: dark)")`.
//! A signal holds at most one listener; subscribing again replaces it.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(test)]
#[path = "signal_test.rs"]
mod signal_test;

/// Receives `true` when the system switches to dark, `false` for light.
pub type PreferenceListener = Box<dyn FnMut(bool)>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("system color-scheme preference is not observable here")]
    Unsupported,
    #[error("failed to observe system color-scheme preference: {0}")]
    Rejected(String),
}

pub trait PreferenceSignal {
    /// Current system preference; `false` when unknown.
    fn prefers_dark(&self) -> bool;

    /// # Errors
    ///
    /// Returns [`SignalError::Unsupported`] when the host exposes no signal.
    fn subscribe(&mut self, listener: PreferenceListener) -> Result<(), SignalError>;

    fn unsubscribe(&mut self);
}

#[derive(Default)]
struct SignalState {
    prefers_dark: bool,
    listener: Option<PreferenceListener>,
    subscribed: bool,
}

/// Test signal driven by [`MemorySignal::emit`]. Clones share state.
#[derive(Clone, Default)]
pub struct MemorySignal {
    state: Rc<RefCell<SignalState>>,
}

impl MemorySignal {
    #[must_use]
    pub fn new(prefers_dark: bool) -> Self {
        let state = SignalState { prefers_dark, ..SignalState::default() };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().subscribed
    }

    /// Change the system preference and notify the listener, if any.
    pub fn emit(&self, prefers_dark: bool) {
        let listener = {
            let mut state = self.state.borrow_mut();
            state.prefers_dark = prefers_dark;
            state.listener.take()
        };
        let Some(mut listener) = listener else {
            return;
        };
        listener(prefers_dark);
        let mut state = self.state.borrow_mut();
        if state.subscribed && state.listener.is_none() {
            state.listener = Some(listener);
        }
    }
}

impl PreferenceSignal for MemorySignal {
    fn prefers_dark(&self) -> bool {
        self.state.borrow().prefers_dark
    }

    fn subscribe(&mut self, listener: PreferenceListener) -> Result<(), SignalError> {
        let mut state = self.state.borrow_mut();
        state.listener = Some(listener);
        state.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        let mut state = self.state.borrow_mut();
        state.listener = None;
        state.subscribed = false;
    }
}

/// Signal for hosts without `matchMedia`. Never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignal;

impl PreferenceSignal for NoSignal {
    fn prefers_dark(&self) -> bool {
        false
    }

    fn subscribe(&mut self, _listener: PreferenceListener) -> Result<(), SignalError> {
        Err(SignalError::Unsupported)
    }

    fn unsubscribe(&mut self) {}
}
