//! Explicit subscription registry.
//!
//! Observers are owned callbacks indexed by a handle. The subscriber releases
//! its subscription by handing the handle back; nothing is tracked by object
//! identity and nothing is dispatched globally.

/// Handle returned by `subscribe`, used to release the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Observer<E> = Box<dyn FnMut(&E)>;

pub(crate) struct ObserverRegistry<E> {
    next_id: u64,
    observers: Vec<(SubscriptionHandle, Observer<E>)>,
}

impl<E> ObserverRegistry<E> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, observer: Observer<E>) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        self.observers.push((handle, observer));
        handle
    }

    /// Returns `false` if the handle was already released.
    pub(crate) fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != handle);
        self.observers.len() != before
    }

    /// Invoke every observer in subscription order.
    pub(crate) fn notify(&mut self, event: &E) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl<E> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
