//! Cart Observer
//!
//! The order-limit notification hook. The cart never performs any UI action
//! itself; when a mutation is declined because it would push the total over
//! the ceiling, the observer is told so the presentation layer can raise a
//! blocking dialog.

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// A declined mutation that would have breached the order ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitExceeded {
    /// The total the cart would have had if the mutation were committed.
    pub attempted_total: Money<'static, Currency>,

    /// The configured ceiling.
    pub limit: Money<'static, Currency>,
}

/// Receives cart notifications.
pub trait CartObserver {
    /// Called once for every mutation rejected by the order ceiling.
    fn on_limit_exceeded(&mut self, event: &LimitExceeded);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_limit_exceeded(&mut self, _event: &LimitExceeded) {}
}

impl<F> CartObserver for F
where
    F: FnMut(&LimitExceeded),
{
    fn on_limit_exceeded(&mut self, event: &LimitExceeded) {
        self(event);
    }
}

/// Fan-out to several listeners, notified in subscription order.
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<Box<dyn CartObserver>>,
}

impl ObserverList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether there are no listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartObserver for ObserverList {
    fn on_limit_exceeded(&mut self, event: &LimitExceeded) {
        for observer in &mut self.observers {
            observer.on_limit_exceeded(event);
        }
    }
}
