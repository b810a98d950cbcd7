//! # Bill Session State
//!
//! Holds the bill currently being edited.
//!
//! ## Thread Safety
//! The bill is wrapped in `Arc<Mutex<T>>` because commands can run
//! concurrently and each one must see the result of the previous.
//!
//! Engine mutations never modify a bill in place: they return a new
//! `BillState`. A command computes the next value from the current one and
//! swaps it in while holding the lock, so a failed mutation leaves the
//! session exactly as it was.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Update                                       │
//! │                                                                         │
//! │   lock ──► current.with_units(..) ──► Ok(next) ──► *current = next      │
//! │                                   └─► Err(e)   ──► unchanged, return e  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use billsplit_core::BillState;

/// Thread-safe wrapper around the current bill.
#[derive(Debug, Clone)]
pub struct BillSessionState {
    bill: Arc<Mutex<BillState>>,
}

impl BillSessionState {
    /// Creates a session with an empty bill.
    pub fn new() -> Self {
        Self::with_initial(BillState::new())
    }

    /// Creates a session that starts from `bill`.
    pub fn with_initial(bill: BillState) -> Self {
        BillSessionState {
            bill: Arc::new(Mutex::new(bill)),
        }
    }

    /// Executes a function with read access to the bill.
    pub fn with_bill<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BillState) -> R,
    {
        let bill = self.bill.lock().expect("Bill mutex poisoned");
        f(&bill)
    }

    /// Computes the next bill from the current one and stores it.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let view = session.update(|bill| bill.with_tax(60.0))?;
    /// ```
    ///
    /// Returns a copy of the stored bill. On error nothing is stored.
    pub fn update<F, E>(&self, f: F) -> Result<BillState, E>
    where
        F: FnOnce(&BillState) -> Result<BillState, E>,
    {
        let mut bill = self.bill.lock().expect("Bill mutex poisoned");
        let next = f(&bill)?;
        *bill = next;
        Ok(bill.clone())
    }

    /// Stores the result of a mutation that cannot fail.
    pub fn apply<F>(&self, f: F) -> BillState
    where
        F: FnOnce(&BillState) -> BillState,
    {
        let mut bill = self.bill.lock().expect("Bill mutex poisoned");
        *bill = f(&bill);
        bill.clone()
    }

    /// Like [`apply`](Self::apply) for mutations that also return a value.
    pub fn apply_with<F, T>(&self, f: F) -> (BillState, T)
    where
        F: FnOnce(&BillState) -> (BillState, T),
    {
        let mut bill = self.bill.lock().expect("Bill mutex poisoned");
        let (next, value) = f(&bill);
        *bill = next;
        (bill.clone(), value)
    }

    /// Like [`update`](Self::update) for mutations that also return a value,
    /// such as the id of something they created.
    pub fn update_with<F, T, E>(&self, f: F) -> Result<(BillState, T), E>
    where
        F: FnOnce(&BillState) -> Result<(BillState, T), E>,
    {
        let mut bill = self.bill.lock().expect("Bill mutex poisoned");
        let (next, value) = f(&bill)?;
        *bill = next;
        Ok((bill.clone(), value))
    }

    /// Replaces the bill and returns the previous one.
    pub fn replace(&self, next: BillState) -> BillState {
        let mut bill = self.bill.lock().expect("Bill mutex poisoned");
        std::mem::replace(&mut *bill, next)
    }

    /// Copy of the current bill.
    pub fn snapshot(&self) -> BillState {
        self.with_bill(BillState::clone)
    }
}

impl Default for BillSessionState {
    fn default() -> Self {
        Self::new()
    }
}
