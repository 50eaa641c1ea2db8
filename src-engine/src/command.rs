//! Guarded command bindings for front-ends.
//!
//! A `Command` wraps a callable with an optional predicate gating its
//! invocation, plus an observer list notified when the predicate's result
//! may have changed (so toolbars can grey out buttons). This is the plain
//! function-object-with-guard shape; no inheritance, no framework.

use std::sync::Mutex;

type RunFn<I> = Box<dyn Fn(I) + Send + Sync>;
type GuardFn = Box<dyn Fn() -> bool + Send + Sync>;
type ObserverFn = Box<dyn Fn() + Send + Sync>;

/// A callable with an optional can-run guard and guard-change observers.
pub struct Command<I> {
    run: RunFn<I>,
    can_run: Option<GuardFn>,
    observers: Mutex<Vec<ObserverFn>>,
}

impl<I> Command<I> {
    /// Create an always-runnable command.
    pub fn new(run: impl Fn(I) + Send + Sync + 'static) -> Self {
        Self {
            run: Box::new(run),
            can_run: None,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Create a command gated by a predicate.
    pub fn with_guard(
        run: impl Fn(I) + Send + Sync + 'static,
        can_run: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            run: Box::new(run),
            can_run: Some(Box::new(can_run)),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Whether the command may currently run.
    pub fn can_run(&self) -> bool {
        self.can_run.as_ref().map(|g| g()).unwrap_or(true)
    }

    /// Invoke the command if its guard allows it. Returns whether it ran.
    pub fn run(&self, input: I) -> bool {
        if !self.can_run() {
            return false;
        }
        (self.run)(input);
        true
    }

    /// Register an observer for guard-result changes.
    pub fn observe(&self, observer: impl Fn() + Send + Sync + 'static) {
        self.observers
            .lock()
            .expect("observer list poisoned")
            .push(Box::new(observer));
    }

    /// Tell observers the guard result may have changed.
    pub fn notify_guard_changed(&self) {
        for observer in self
            .observers
            .lock()
            .expect("observer list poisoned")
            .iter()
        {
            observer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_unguarded_command_always_runs() {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();
        let cmd = Command::new(move |n: usize| {
            counted.fetch_add(n, Ordering::SeqCst);
        });

        assert!(cmd.can_run());
        assert!(cmd.run(3));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_guard_blocks_invocation() {
        let enabled = Arc::new(AtomicBool::new(false));
        let gate = enabled.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();

        let cmd = Command::with_guard(
            move |_: ()| {
                counted.fetch_add(1, Ordering::SeqCst);
            },
            move || gate.load(Ordering::SeqCst),
        );

        assert!(!cmd.can_run());
        assert!(!cmd.run(()));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        enabled.store(true, Ordering::SeqCst);
        assert!(cmd.run(()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observers_notified() {
        let cmd: Command<()> = Command::new(|_| {});
        let notified = Arc::new(AtomicUsize::new(0));

        let first = notified.clone();
        cmd.observe(move || {
            first.fetch_add(1, Ordering::SeqCst);
        });
        let second = notified.clone();
        cmd.observe(move || {
            second.fetch_add(1, Ordering::SeqCst);
        });

        cmd.notify_guard_changed();
        assert_eq!(notified.load(Ordering::SeqCst), 2);
    }
}
