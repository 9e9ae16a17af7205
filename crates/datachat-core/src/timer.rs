//! Named debounce timers.
//!
//! At most one timer per [`TimerName`] is armed at a time. Scheduling under a
//! name aborts the previous task for that name. A fire that was already
//! queued before the abort carries an outdated generation and is rejected by
//! [`TimerManager::accept`], so the most recent schedule always wins.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerName {
    Autocomplete,
    Suggestions,
}

/// Delivered on the event channel when a timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub name: TimerName,
    pub generation: u64,
}

struct Armed {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct TimerManager<E> {
    tx: UnboundedSender<E>,
    armed: HashMap<TimerName, Armed>,
    next_generation: u64,
}

impl<E> TimerManager<E>
where
    E: From<TimerFired> + Send + 'static,
{
    pub fn new(tx: UnboundedSender<E>) -> Self {
        Self {
            tx,
            armed: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Arms `name` to fire after `delay`, replacing any pending timer with
    /// the same name. Must be called from within a tokio runtime.
    pub fn schedule(&mut self, name: TimerName, delay: Duration) {
        self.cancel(name);
        self.next_generation += 1;
        let fired = TimerFired {
            name,
            generation: self.next_generation,
        };
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(E::from(fired));
        });
        tracing::trace!(?name, ?delay, generation = fired.generation, "timer armed");
        self.armed.insert(
            name,
            Armed {
                generation: fired.generation,
                handle,
            },
        );
    }

    /// Disarms `name`. No-op when nothing is pending.
    pub fn cancel(&mut self, name: TimerName) {
        if let Some(armed) = self.armed.remove(&name) {
            armed.handle.abort();
            tracing::trace!(?name, generation = armed.generation, "timer cancelled");
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, armed) in self.armed.drain() {
            armed.handle.abort();
        }
    }

    /// Returns `true` and disarms the timer if `fired` is the current
    /// generation for its name; stale fires return `false`.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        match self.armed.get(&fired.name) {
            Some(armed) if armed.generation == fired.generation => {
                self.armed.remove(&fired.name);
                true
            }
            _ => {
                tracing::trace!(?fired, "stale timer fire ignored");
                false
            }
        }
    }

    pub fn is_pending(&self, name: TimerName) -> bool {
        self.armed.contains_key(&name)
    }

    pub fn has_pending(&self) -> bool {
        !self.armed.is_empty()
    }
}

impl<E> Drop for TimerManager<E> {
    fn drop(&mut self) {
        for (_, armed) in self.armed.drain() {
            armed.handle.abort();
        }
    }
}
