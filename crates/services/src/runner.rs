use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use quiz_core::model::{QuizPrompt, Resolution};
use quiz_core::{Clock, Phase, QuizController, QuizObserver, SubmitOutcome};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::clock::RuntimeClock;
use crate::error::RunnerError;

/// Drives a `QuizController` on a tokio runtime.
///
/// Owns at most one timer task. The task is replaced on `present` and aborted on
/// `dismiss` or drop. Events reach the observer while the controller lock is held,
/// so the observer sees them in transition order.
pub struct QuizRunner {
    shared: Arc<Shared>,
}

struct Shared {
    controller: Mutex<QuizController>,
    timer: Mutex<Option<JoinHandle<()>>>,
    clock: RuntimeClock,
    observer: Arc<dyn QuizObserver>,
}

impl QuizRunner {
    #[must_use]
    pub fn new(controller: QuizController, clock: Clock, observer: Arc<dyn QuizObserver>) -> Self {
        Self {
            shared: Arc::new(Shared {
                controller: Mutex::new(controller),
                timer: Mutex::new(None),
                clock: RuntimeClock::anchored(&clock),
                observer,
            }),
        }
    }

    /// Present a prompt and (re)start the timer.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NoRuntime` outside a tokio runtime.
    pub fn present(&self, prompt: QuizPrompt) -> Result<(), RunnerError> {
        let runtime = Handle::try_current().map_err(|_| RunnerError::NoRuntime)?;
        let mut ctrl = self.shared.lock_controller()?;
        ctrl.present(prompt, self.shared.clock.now());
        self.shared.flush(&mut ctrl);

        let task = runtime.spawn(drive_timer(Arc::clone(&self.shared), ctrl.generation()));
        if let Some(previous) = self.shared.lock_timer()?.replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Submit an answer for the current prompt.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Controller` when no prompt has been presented.
    pub fn submit(&self, answer: bool) -> Result<SubmitOutcome, RunnerError> {
        let mut ctrl = self.shared.lock_controller()?;
        let outcome = ctrl.submit(answer, self.shared.clock.now())?;
        self.shared.flush(&mut ctrl);
        Ok(outcome)
    }

    /// Cancel the timer and any pending advance, returning the controller to idle.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Poisoned` if a lock was poisoned.
    pub fn dismiss(&self) -> Result<(), RunnerError> {
        let mut ctrl = self.shared.lock_controller()?;
        ctrl.dismiss();
        if let Some(task) = self.shared.lock_timer()?.take() {
            task.abort();
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Poisoned` if the controller lock was poisoned.
    pub fn phase(&self) -> Result<Phase, RunnerError> {
        Ok(self.shared.lock_controller()?.phase())
    }

    /// Resolution of the prompt on screen, once it has one.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Poisoned` if the controller lock was poisoned.
    pub fn resolution(&self) -> Result<Option<Resolution>, RunnerError> {
        Ok(self.shared.lock_controller()?.resolution().cloned())
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.shared.timer.lock() {
            if let Some(task) = timer.take() {
                task.abort();
            }
        }
    }
}

impl Shared {
    fn lock_controller(&self) -> Result<MutexGuard<'_, QuizController>, RunnerError> {
        self.controller
            .lock()
            .map_err(|e| RunnerError::Poisoned(e.to_string()))
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, Option<JoinHandle<()>>>, RunnerError> {
        self.timer
            .lock()
            .map_err(|e| RunnerError::Poisoned(e.to_string()))
    }

    fn flush(&self, ctrl: &mut QuizController) {
        for event in ctrl.take_events() {
            self.observer.on_event(&event);
        }
    }

    /// `None` once the controller needs no more polling or has moved to a newer
    /// generation. A wake-up queued before a `present` or `dismiss` stops here.
    fn next_wakeup(&self, generation: u64) -> Option<DateTime<Utc>> {
        let ctrl = self.controller.lock().ok()?;
        if ctrl.generation() != generation {
            return None;
        }
        ctrl.next_wakeup()
    }

    fn poll(&self, generation: u64) -> bool {
        let Ok(mut ctrl) = self.controller.lock() else {
            return false;
        };
        if ctrl.generation() != generation {
            tracing::debug!(generation, "stale timer wake-up dropped");
            return false;
        }
        ctrl.poll(self.clock.now());
        self.flush(&mut ctrl);
        true
    }
}

/// Sleep until the controller's next wake-up and poll it, until it has none.
async fn drive_timer(shared: Arc<Shared>, generation: u64) {
    while let Some(wake_at) = shared.next_wakeup(generation) {
        tokio::time::sleep_until(shared.clock.instant_at(wake_at)).await;
        if !shared.poll(generation) {
            return;
        }
    }
}
