//! Transient status messages shown in the footer.

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
  Success,
  Error,
}

/// One message with its severity.
#[derive(Debug, Clone)]
pub struct Notification {
  pub message: String,
  pub level: NotificationLevel,
}

/// Ticks a notification stays visible (about 4s at a 250ms tick rate).
const DISPLAY_TICKS: u8 = 16;

/// Holder for the currently displayed notification.
///
/// A new message replaces the old one; the view's prior state is never
/// touched, only this line changes.
#[derive(Debug, Default)]
pub struct Notifications {
  current: Option<(Notification, u8)>,
}

impl Notifications {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn success(&mut self, message: impl Into<String>) {
    self.show(message.into(), NotificationLevel::Success);
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.show(message.into(), NotificationLevel::Error);
  }

  fn show(&mut self, message: String, level: NotificationLevel) {
    self.current = Some((Notification { message, level }, DISPLAY_TICKS));
  }

  /// Age the current notification; expired messages disappear.
  pub fn tick(&mut self) {
    if let Some((_, remaining)) = &mut self.current {
      *remaining = remaining.saturating_sub(1);
      if *remaining == 0 {
        self.current = None;
      }
    }
  }

  pub fn current(&self) -> Option<&Notification> {
    self.current.as_ref().map(|(n, _)| n)
  }
}
