use crate::ui::components::Notification;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Leave the view; at the root this exits the app
  Quit,
}

/// Trait for view behavior
///
/// Views handle their own input modes (filters, forms, confirmations) and
/// return actions for the App to execute. Views that load data
/// asynchronously use Query<T> internally and poll it in tick().
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb parts for this view (root first)
  fn breadcrumb(&self) -> Vec<String>;

  /// Called on each tick to allow views to poll async queries
  fn tick(&mut self) {}

  /// Transient notification to show in the footer, if any
  fn notification(&self) -> Option<&Notification> {
    None
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "quit")]
  }
}
