#![forbid(unsafe_code)]

//! Per-instance observer lists.
//!
//! Every engine owns its own [`Emitter`]s; nothing here is process-global.
//! An emitter is either *plain* (listeners only see values fired after they
//! subscribe) or *replaying* (the last fired value is cached and delivered to
//! each new listener at subscribe time).

use std::fmt;

/// Handle returned by [`Emitter::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

type Listener<T> = Box<dyn FnMut(&T)>;

/// An ordered list of listeners for values of type `T`.
///
/// Listeners run synchronously, in subscription order, inside [`fire`].
///
/// [`fire`]: Emitter::fire
pub struct Emitter<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
    replay: bool,
    last: Option<T>,
}

impl<T> Emitter<T> {
    /// Create a plain emitter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
            replay: false,
            last: None,
        }
    }

    /// Create an emitter that replays its last value to new subscribers.
    #[must_use]
    pub fn replaying() -> Self {
        Self {
            replay: true,
            ..Self::new()
        }
    }

    /// Whether new subscribers receive the cached last value.
    #[must_use]
    pub const fn is_replaying(&self) -> bool {
        self.replay
    }

    /// Register a listener.
    ///
    /// On a replaying emitter that has fired at least once, the listener is
    /// invoked immediately with the cached value before this returns.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let mut listener: Listener<T> = Box::new(listener);
        if self.replay
            && let Some(last) = &self.last
        {
            listener(last);
        }
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Deliver `value` to every listener.
    pub fn fire(&mut self, value: T) {
        for (_, listener) in &mut self.listeners {
            listener(&value);
        }
        if self.replay {
            self.last = Some(value);
        }
    }

    /// The cached value of a replaying emitter.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop every listener. The replay cache is kept.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .field("replay", &self.replay)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl FnMut(&u32) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &u32| sink.borrow_mut().push(*value))
    }

    #[test]
    fn plain_emitter_does_not_replay() {
        let mut emitter = Emitter::new();
        emitter.fire(1);
        let (seen, listener) = recorder();
        emitter.subscribe(listener);
        assert!(seen.borrow().is_empty());
        emitter.fire(2);
        assert_eq!(*seen.borrow(), vec![2]);
        assert!(emitter.last().is_none());
    }

    #[test]
    fn replaying_emitter_delivers_last_value_on_subscribe() {
        let mut emitter = Emitter::replaying();
        emitter.fire(7);
        emitter.fire(9);
        let (seen, listener) = recorder();
        emitter.subscribe(listener);
        assert_eq!(*seen.borrow(), vec![9]);
        emitter.fire(11);
        assert_eq!(*seen.borrow(), vec![9, 11]);
    }

    #[test]
    fn replaying_emitter_without_history_is_silent() {
        let mut emitter: Emitter<u32> = Emitter::replaying();
        let (seen, listener) = recorder();
        emitter.subscribe(listener);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut emitter = Emitter::new();
        let (first, a) = recorder();
        let (second, b) = recorder();
        let id = emitter.subscribe(a);
        emitter.subscribe(b);
        emitter.fire(1);
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.fire(2);
        assert_eq!(*first.borrow(), vec![1]);
        assert_eq!(*second.borrow(), vec![1, 2]);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        for tag in 0..3u32 {
            let order = Rc::clone(&order);
            emitter.subscribe(move |_: &()| order.borrow_mut().push(tag));
        }
        emitter.fire(());
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
