use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscriber<T> {
    token: SubscriptionToken,
    callback: Callback<T>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            callback: Rc::clone(&self.callback),
        }
    }
}

struct Registry<T> {
    next_token: u64,
    subscribers: Vec<Subscriber<T>>,
}

/// Ordered multicast list. Cloning yields another handle to the same list.
///
/// Dispatch runs over a snapshot taken when the broadcast starts: callbacks
/// registered mid-broadcast wait for the next one, callbacks removed
/// mid-broadcast are skipped if they have not run yet. A callback may
/// broadcast again from inside its own invocation; the nested value reaches
/// every subscriber, the caller included, before the outer broadcast resumes.
/// Callbacks are `Fn`, so subscribers keep mutable state in `Cell`/`RefCell`.
pub struct Notifier<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.registry.borrow().subscribers.len())
            .finish()
    }
}

impl<T: 'static> Notifier<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_token: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionToken
    where
        F: Fn(&T) + 'static,
    {
        let callback: Callback<T> = Rc::new(callback);
        let mut registry = self.registry.borrow_mut();
        let token = SubscriptionToken(registry.next_token);
        registry.next_token = registry.next_token.saturating_add(1);
        registry.subscribers.push(Subscriber { token, callback });
        token
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.subscribers.len();
        registry
            .subscribers
            .retain(|subscriber| subscriber.token != token);
        registry.subscribers.len() != before
    }

    pub fn is_subscribed(&self, token: SubscriptionToken) -> bool {
        self.registry
            .borrow()
            .subscribers
            .iter()
            .any(|subscriber| subscriber.token == token)
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn broadcast(&self, value: &T) {
        let snapshot = self.registry.borrow().subscribers.clone();
        for subscriber in snapshot {
            if !self.is_subscribed(subscriber.token) {
                continue;
            }
            (subscriber.callback)(value);
        }
    }
}
