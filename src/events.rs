//! Explicit publish/subscribe channel for import notifications. The bus is
//! a plain value passed by reference to whatever needs it; there is no
//! global singleton to reach for.

#[derive(Debug, Clone)]
pub enum ImportEvent {
    Started {
        filename: String,
    },
    Completed {
        filename: String,
        imported: usize,
        skipped_rows: usize,
    },
    Failed {
        filename: String,
        reason: String,
    },
}

type Subscriber = Box<dyn Fn(&ImportEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&ImportEvent) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Fan out synchronously, in subscription order.
    pub fn publish(&self, event: &ImportEvent) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }
}
