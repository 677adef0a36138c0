use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

/// Sending half of a [`Channel`]. Cheap to clone; all clones share listeners.
pub struct EventEmitter<T: Debug> {
    channel: Channel<T>,
}

impl<T: Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Subscribing half of a [`Channel`].
pub struct EventObserver<T: Debug> {
    channel: Channel<T>,
}

impl<T: Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle for a single subscription; consumed to detach the listener.
pub struct Unsubscriber<T: Debug> {
    channel: Channel<T>,
    id: SubscriptionId,
}

impl<T: Debug> Unsubscriber<T> {
    pub fn unsubscribe(self) -> bool {
        self.channel.remove_listener(self.id)
    }
}

pub struct Channel<T: Debug> {
    listeners: Rc<RefCell<HashMap<SubscriptionId, Callback<T>>>>,
    next_id: Rc<RefCell<SubscriptionId>>,
}

impl<T: Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(HashMap::new())),
            next_id: Rc::new(RefCell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn add_listener<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    fn dispatch(&self, event: &T) {
        // Snapshot the callbacks so a listener may subscribe or unsubscribe
        // while the event is being delivered.
        let callbacks: Vec<Callback<T>> = self.listeners.borrow().values().map(Rc::clone).collect();
        trace!(target: "events", "Dispatching to {} listeners: {:?}", callbacks.len(), event);
        for callback in callbacks {
            callback(event);
        }
    }
}

impl<T: Debug> EventEmitter<T> {
    pub fn emit(&self, event: T) {
        self.channel.dispatch(&event);
    }
}

impl<T: Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.channel.add_listener(callback);
        Unsubscriber {
            channel: self.channel.clone(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscribe_and_emit() {
        let (emitter, observer) = Channel::<&str>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = observer.subscribe(move |event: &&str| {
            seen_clone.borrow_mut().push(event.to_string());
        });

        emitter.emit("first");
        emitter.emit("second");
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_every_listener_is_called() {
        let (emitter, observer) = Channel::<u32>::new();
        let total = Rc::new(Cell::new(0));

        let total_a = total.clone();
        let _sub_a = observer.subscribe(move |event: &u32| {
            total_a.set(total_a.get() + event);
        });
        let total_b = total.clone();
        let _sub_b = observer.subscribe(move |event: &u32| {
            total_b.set(total_b.get() + event * 10);
        });

        emitter.emit(3);
        assert_eq!(total.get(), 33);
    }

    #[test]
    fn test_clones_share_the_channel() {
        let (emitter, observer) = Channel::<u32>::new();
        let emitter_clone = emitter.clone();
        let observer_clone = observer.clone();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _sub = observer_clone.subscribe(move |_: &u32| {
            count_clone.set(count_clone.get() + 1);
        });

        emitter.emit(1);
        emitter_clone.emit(2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe_detaches_listener() {
        let (emitter, observer) = Channel::<u32>::new();
        let count = Rc::new(Cell::new(0));

        let count_clone = count.clone();
        let subscription = observer.subscribe(move |_: &u32| {
            count_clone.set(count_clone.get() + 1);
        });

        emitter.emit(0);
        assert!(subscription.unsubscribe());
        emitter.emit(0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let (emitter, observer) = Channel::<u32>::new();
        let slot: Rc<RefCell<Option<Unsubscriber<u32>>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));

        let slot_clone = slot.clone();
        let count_clone = count.clone();
        let subscription = observer.subscribe(move |_: &u32| {
            count_clone.set(count_clone.get() + 1);
            if let Some(subscription) = slot_clone.borrow_mut().take() {
                subscription.unsubscribe();
            }
        });
        *slot.borrow_mut() = Some(subscription);

        emitter.emit(0);
        emitter.emit(0);
        assert_eq!(count.get(), 1);
    }
}
