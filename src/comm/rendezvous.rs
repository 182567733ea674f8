//! Reusable all-party barrier that can be torn down.
//!
//! Unlike `std::sync::Barrier`, a waiter can be released early by `abort`,
//! which makes every current and future `wait` return `SobelError::Aborted`.
use crate::error::{Result, SobelError};
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct State {
    arrived: usize,
    generation: u64,
    aborted: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Rendezvous {
    parties: usize,
    state: Mutex<State>,
    cvar: Condvar,
}

impl Rendezvous {
    pub(crate) fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(State::default()),
            cvar: Condvar::new(),
        }
    }

    /// Block until all parties arrive or the rendezvous is aborted.
    pub(crate) fn wait(&self) -> Result<()> {
        let mut st = self.state.lock();
        if let Some(reason) = &st.aborted {
            return Err(SobelError::Aborted(reason.clone()));
        }
        let generation = st.generation;
        st.arrived += 1;
        if st.arrived == self.parties {
            st.arrived = 0;
            st.generation = st.generation.wrapping_add(1);
            self.cvar.notify_all();
            return Ok(());
        }
        while st.generation == generation && st.aborted.is_none() {
            self.cvar.wait(&mut st);
        }
        if st.generation != generation {
            return Ok(());
        }
        let reason = st.aborted.clone().unwrap_or_default();
        Err(SobelError::Aborted(reason))
    }

    /// Release all waiters with an error. The first reason wins.
    pub(crate) fn abort(&self, reason: impl Into<String>) {
        let mut st = self.state.lock();
        if st.aborted.is_none() {
            st.aborted = Some(reason.into());
        }
        self.cvar.notify_all();
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.state.lock().aborted.is_some()
    }
}
