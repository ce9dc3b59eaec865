#![forbid(unsafe_code)]

//! Single-slot toast notifications with timed retirement.
//!
//! The queue shows at most one notification. A new request evicts whatever
//! is on screen immediately; nothing is queued behind it. Each notification
//! then walks a fixed lifecycle driven by [`NotificationQueue::tick`]:
//!
//! ```text
//! notify ──▶ Shown ──(5000ms)──▶ Exiting ──(300ms)──▶ removed
//! ```
//!
//! The lifecycle has one deadline field. Evicting a notification drops its
//! deadline with it, so a stale removal can never hit its successor.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use terrasite_widgets::notification_queue::{NotificationQueue, QueueAction, Severity};
//!
//! let mut queue = NotificationQueue::default();
//! queue.notify("Saved", Severity::Success, Duration::ZERO);
//! let actions = queue.notify("Failed", Severity::Error, Duration::from_millis(10));
//! assert!(matches!(actions[0], QueueAction::Hide(_)));
//! assert_eq!(queue.visible().map(|n| n.message.as_str()), Some("Failed"));
//! ```

use std::time::Duration;

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Neutral information (also the fallback for unknown names).
    #[default]
    Info,
    /// An action succeeded.
    Success,
    /// Something needs attention.
    Warning,
    /// An action failed.
    Error,
}

impl Severity {
    /// Parse a severity name; unknown names map to [`Severity::Info`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    /// Lowercase name, used in the `notification-<name>` class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Background colour of the toast.
    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Info => "#2563eb",
            Self::Success => "#10b981",
            Self::Warning => "#f59e0b",
            Self::Error => "#ef4444",
        }
    }
}

/// Unique notification identifier, monotonically assigned per queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Create an id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Where a notification is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    /// On screen (entrance animation included).
    Shown,
    /// Exit animation running; removal follows.
    Exiting,
}

/// A transient toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier.
    pub id: NotificationId,
    /// Text shown to the user.
    pub message: String,
    /// Visual severity.
    pub severity: Severity,
    /// Host time at creation.
    pub created_at: Duration,
    /// Lifecycle phase.
    pub phase: NotificationPhase,
}

/// Timing for the notification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Time on screen before the exit animation starts.
    pub display_duration: Duration,
    /// Length of the exit animation.
    pub exit_duration: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            display_duration: Duration::from_millis(5000),
            exit_duration: Duration::from_millis(300),
        }
    }
}

impl QueueConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the on-screen duration.
    #[must_use]
    pub fn display_duration(mut self, duration: Duration) -> Self {
        self.display_duration = duration;
        self
    }

    /// Set the exit animation duration.
    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }
}

/// Actions for the host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    /// Render a new notification with its entrance animation.
    Show(NotificationId),
    /// Remove a notification at once, without animation (eviction).
    Hide(NotificationId),
    /// Start the exit animation.
    BeginExit(NotificationId),
    /// Remove a notification whose exit animation finished.
    Remove(NotificationId),
}

/// Queue statistics for monitoring and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Notifications shown.
    pub total_shown: u64,
    /// Notifications evicted by a newer one.
    pub evicted: u64,
    /// Notifications retired by their timer.
    pub auto_expired: u64,
}

/// Single-slot notification queue.
#[derive(Debug)]
pub struct NotificationQueue {
    config: QueueConfig,
    current: Option<Notification>,
    /// Next lifecycle step of `current`.
    deadline: Option<Duration>,
    next_id: u64,
    stats: QueueStats,
}

impl NotificationQueue {
    /// Create a queue with the given timing.
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            current: None,
            deadline: None,
            next_id: 1,
            stats: QueueStats::default(),
        }
    }

    /// Create a queue with default timing.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(QueueConfig::default())
    }

    /// Show a notification, evicting the current one.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Duration,
    ) -> Vec<QueueAction> {
        let mut actions = Vec::with_capacity(2);

        if let Some(old) = self.current.take() {
            self.stats.evicted += 1;
            actions.push(QueueAction::Hide(old.id));
        }

        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.current = Some(Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
            phase: NotificationPhase::Shown,
        });
        self.deadline = Some(now.saturating_add(self.config.display_duration));
        self.stats.total_shown += 1;
        actions.push(QueueAction::Show(id));

        actions
    }

    /// Advance the lifecycle to `now`.
    ///
    /// A late tick may return both `BeginExit` and `Remove` for the same
    /// notification.
    pub fn tick(&mut self, now: Duration) -> Vec<QueueAction> {
        let mut actions = Vec::new();

        while let Some(deadline) = self.deadline
            && now >= deadline
        {
            let Some(current) = self.current.as_mut() else {
                self.deadline = None;
                break;
            };
            match current.phase {
                NotificationPhase::Shown => {
                    current.phase = NotificationPhase::Exiting;
                    self.deadline = Some(deadline.saturating_add(self.config.exit_duration));
                    actions.push(QueueAction::BeginExit(current.id));
                }
                NotificationPhase::Exiting => {
                    let id = current.id;
                    self.current = None;
                    self.deadline = None;
                    self.stats.auto_expired += 1;
                    actions.push(QueueAction::Remove(id));
                }
            }
        }

        actions
    }

    /// The notification on screen, if any.
    #[must_use]
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Number of notifications on screen (0 or 1).
    #[must_use]
    pub fn visible_count(&self) -> usize {
        usize::from(self.current.is_some())
    }

    /// Whether nothing is on screen.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Next lifecycle deadline, if a notification is on screen.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Get queue statistics.
    #[must_use]
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Drop everything on screen without counting it.
    pub fn clear(&mut self) {
        self.current = None;
        self.deadline = None;
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_defaults()
    }
}
