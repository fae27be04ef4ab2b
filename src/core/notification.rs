//! Transient status toasts
//!
//! Each toast walks Entering -> Shown -> Leaving -> removed. The phase changes
//! are driven by a timer task on the current tokio runtime that reports back
//! over a channel; the owner drains it with `pump()` once per frame. Timer
//! handles are kept so a toast can be dismissed early and so dropping the
//! notifier cancels everything still pending.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay before a new toast slides into place
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
/// Length of the exit transition before the toast is removed
pub const LEAVE_TRANSITION: Duration = Duration::from_millis(300);
/// Default time from creation until the toast starts leaving
pub const DEFAULT_HOLD: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub phase: ToastPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    Settled(u64),
    Leaving(u64),
    Expired(u64),
}

pub struct Notifier {
    toasts: Vec<Toast>,
    timers: HashMap<u64, JoinHandle<()>>,
    next_id: u64,
    hold: Duration,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    event_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Notifier {
    pub fn new(hold: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            toasts: Vec::new(),
            timers: HashMap::new(),
            next_id: 1,
            hold,
            event_tx,
            event_rx,
        }
    }

    /// Queue a toast and schedule its lifecycle. Returns the toast id.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let message = message.into();
        tracing::debug!(id, "Notification: {}", message);
        self.toasts.push(Toast {
            id,
            message,
            phase: ToastPhase::Entering,
        });

        // Headless callers (CLI export) have no runtime and nobody to show
        // the toast to, so it simply stays queued.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let tx = self.event_tx.clone();
                let hold = self.hold;
                let timer = handle.spawn(async move {
                    tokio::time::sleep(SETTLE_DELAY).await;
                    let _ = tx.send(TimerEvent::Settled(id));
                    tokio::time::sleep(hold.saturating_sub(SETTLE_DELAY)).await;
                    let _ = tx.send(TimerEvent::Leaving(id));
                    tokio::time::sleep(LEAVE_TRANSITION).await;
                    let _ = tx.send(TimerEvent::Expired(id));
                });
                self.timers.insert(id, timer);
            }
            Err(_) => tracing::debug!(id, "No runtime available, toast will not be scheduled"),
        }

        id
    }

    /// Apply pending timer events. Returns true if any toast changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.event_rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    fn apply(&mut self, event: TimerEvent) -> bool {
        match event {
            TimerEvent::Settled(id) => self.set_phase(id, ToastPhase::Shown),
            TimerEvent::Leaving(id) => self.set_phase(id, ToastPhase::Leaving),
            TimerEvent::Expired(id) => {
                self.timers.remove(&id);
                let before = self.toasts.len();
                self.toasts.retain(|t| t.id != id);
                self.toasts.len() != before
            }
        }
    }

    fn set_phase(&mut self, id: u64, phase: ToastPhase) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if toast.phase != phase => {
                toast.phase = phase;
                true
            }
            _ => false,
        }
    }

    /// Remove a toast immediately and cancel its timer
    pub fn dismiss(&mut self, id: u64) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD)
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}
