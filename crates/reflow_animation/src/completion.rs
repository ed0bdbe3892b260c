//! Completion signal
//!
//! Resolves exactly once per animation. Observers either poll
//! [`Completion::is_complete`], subscribe a channel sender (the ledger's
//! pruning feed), or await [`Completion::wait`].

use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::handle::AnimationId;

#[derive(Default)]
struct CompletionState {
    done: bool,
    listeners: Vec<Sender<AnimationId>>,
    wakers: Vec<Waker>,
}

struct CompletionInner {
    id: AnimationId,
    state: Mutex<CompletionState>,
}

/// Shared, clonable completion signal for one animation
#[derive(Clone)]
pub struct Completion {
    inner: Arc<CompletionInner>,
}

impl Completion {
    /// Create an unresolved signal
    pub fn new(id: AnimationId) -> Self {
        Self {
            inner: Arc::new(CompletionInner {
                id,
                state: Mutex::new(CompletionState::default()),
            }),
        }
    }

    /// Create a signal that is already resolved
    pub fn resolved(id: AnimationId) -> Self {
        let completion = Self::new(id);
        completion.inner.state.lock().done = true;
        completion
    }

    pub fn id(&self) -> AnimationId {
        self.inner.id
    }

    pub fn is_complete(&self) -> bool {
        self.inner.state.lock().done
    }

    /// Resolve the signal
    ///
    /// Returns `false` if it had already fired; listeners are notified once.
    pub fn fire(&self) -> bool {
        let (listeners, wakers) = {
            let mut state = self.inner.state.lock();
            if state.done {
                return false;
            }
            state.done = true;
            (
                std::mem::take(&mut state.listeners),
                std::mem::take(&mut state.wakers),
            )
        };

        for tx in listeners {
            // Receiver gone means nobody is tracking this animation anymore
            let _ = tx.send(self.inner.id);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    /// Post this animation's id on `tx` when it completes
    ///
    /// Subscribing to a resolved signal posts immediately.
    pub fn subscribe(&self, tx: Sender<AnimationId>) {
        let mut state = self.inner.state.lock();
        if state.done {
            drop(state);
            let _ = tx.send(self.inner.id);
        } else {
            state.listeners.push(tx);
        }
    }

    /// Future resolving when the animation completes
    pub fn wait(&self) -> Finished {
        Finished {
            completion: self.clone(),
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("id", &self.inner.id)
            .field("done", &self.is_complete())
            .finish()
    }
}

/// Future returned by [`Completion::wait`]
pub struct Finished {
    completion: Completion,
}

impl Future for Finished {
    type Output = AnimationId;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.completion.inner.state.lock();
        if state.done {
            return Poll::Ready(self.completion.inner.id);
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_fires_once() {
        let completion = Completion::new(AnimationId::next());
        assert!(!completion.is_complete());
        assert!(completion.fire());
        assert!(!completion.fire());
        assert!(completion.is_complete());
    }

    #[test]
    fn test_subscribers_notified_once() {
        let completion = Completion::new(AnimationId::next());
        let (tx, rx) = mpsc::channel();
        completion.subscribe(tx);

        assert!(rx.try_recv().is_err());
        completion.fire();
        completion.fire();

        assert_eq!(rx.try_recv().ok(), Some(completion.id()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscribe_after_resolve_posts_immediately() {
        let completion = Completion::resolved(AnimationId::next());
        let (tx, rx) = mpsc::channel();
        completion.subscribe(tx);
        assert_eq!(rx.try_recv().ok(), Some(completion.id()));
    }

    #[test]
    fn test_wait_resolves() {
        let completion = Completion::new(AnimationId::next());
        let other = completion.clone();
        let thread = std::thread::spawn(move || {
            other.fire();
        });
        let id = pollster::block_on(completion.wait());
        thread.join().unwrap();
        assert_eq!(id, completion.id());
    }
}
