// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded toast queue with per-kind auto-dismiss durations.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default number of toasts kept on screen.
pub const DEFAULT_MAX_TOASTS: usize = 5;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Informational note.
    Info,
    /// Warning that may need attention.
    Warning,
}

impl ToastKind {
    /// Auto-dismiss delay used by the convenience constructors.
    pub fn default_duration(self) -> Duration {
        Duration::from_millis(match self {
            Self::Success => 5000,
            Self::Error => 7000,
            Self::Info => 4000,
            Self::Warning => 6000,
        })
    }
}

/// Identifier for a toast entry.
pub type ToastId = u64;

/// Button attached to a toast. The host maps `action_id` to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    /// Button label.
    pub label: String,
    /// Host-defined action identifier.
    pub action_id: String,
}

/// Toast data stored in the service.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Message text.
    pub message: String,
    /// Auto-dismiss delay; `None` stays until dismissed.
    pub duration: Option<Duration>,
    /// Optional action button.
    pub action: Option<ToastAction>,
    /// Creation time.
    pub created: Instant,
}

impl Toast {
    fn expired(&self, now: Instant) -> bool {
        self.duration
            .is_some_and(|d| now.duration_since(self.created) >= d)
    }
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Message text.
    pub message: String,
    /// Optional action button.
    pub action: Option<ToastAction>,
    /// 1.0 -> just created, 0.0 -> expired. Always 1.0 without a duration.
    pub progress: f32,
}

/// In-memory toast queue; the oldest toast is dropped past `max`.
#[derive(Debug)]
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    next_id: ToastId,
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOASTS)
    }
}

impl ToastService {
    /// Create a new queue with a maximum length.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max,
            next_id: 1,
        }
    }

    /// Show a toast and return its id.
    pub fn show<M>(
        &mut self,
        kind: ToastKind,
        message: M,
        duration: Option<Duration>,
        action: Option<ToastAction>,
        now: Instant,
    ) -> ToastId
    where
        M: Into<String>,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push_back(Toast {
            id,
            kind,
            message: message.into(),
            duration,
            action,
            created: now,
        });
        while self.queue.len() > self.max {
            self.queue.pop_front();
        }
        id
    }

    /// Success toast with the default duration.
    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        let kind = ToastKind::Success;
        self.show(kind, message, Some(kind.default_duration()), None, now)
    }

    /// Error toast with the default duration and an optional action.
    pub fn error(
        &mut self,
        message: impl Into<String>,
        action: Option<ToastAction>,
        now: Instant,
    ) -> ToastId {
        let kind = ToastKind::Error;
        self.show(kind, message, Some(kind.default_duration()), action, now)
    }

    /// Info toast with the default duration.
    pub fn info(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        let kind = ToastKind::Info;
        self.show(kind, message, Some(kind.default_duration()), None, now)
    }

    /// Warning toast with the default duration.
    pub fn warning(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        let kind = ToastKind::Warning;
        self.show(kind, message, Some(kind.default_duration()), None, now)
    }

    /// Remove one toast. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    /// Remove every toast.
    pub fn dismiss_all(&mut self) {
        self.queue.clear();
    }

    /// Drop expired toasts (call once per frame/tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| !t.expired(now));
    }

    /// Number of queued toasts, expired or not.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when no toasts are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Return render-ready toasts with progress ratios, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| !t.expired(now))
            .map(|t| ToastRender {
                id: t.id,
                kind: t.kind,
                message: t.message.clone(),
                action: t.action.clone(),
                progress: t.duration.map_or(1.0, |d| {
                    1.0 - (now.duration_since(t.created).as_secs_f32() / d.as_secs_f32())
                }),
            })
            .collect()
    }
}
