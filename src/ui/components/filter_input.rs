use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by a filter input that the parent applies to its query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// Filter submitted with a non-empty value
  Applied(String),
  /// Filter submitted empty - remove it
  Cleared,
}

/// Overlay input for one server-side list filter.
///
/// The parent owns activation (each filter has its own shortcut) and the
/// actual query state; this component only edits the value. Escape cancels
/// the edit without touching the active filter.
#[derive(Debug, Clone)]
pub struct FilterInput {
  label: &'static str,
  input: TextInput,
  active: bool,
}

impl FilterInput {
  pub fn new(label: &'static str) -> Self {
    Self {
      label,
      input: TextInput::new(),
      active: false,
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the overlay pre-filled with the currently applied value.
  pub fn activate_with(&mut self, current: &str) {
    self.active = true;
    self.input.set_value(current);
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        self.active = false;
        if value.is_empty() {
          KeyResult::Event(FilterEvent::Cleared)
        } else {
          KeyResult::Event(FilterEvent::Applied(value))
        }
      }
      InputResult::Cancelled => {
        self.active = false;
        KeyResult::Handled
      }
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the filter overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60);
    let height = 3;

    // Position at top-left of content area with small margin
    let x = area.x + 1;
    let y = area.y + 1;

    let overlay_area = Rect::new(x, y, width, height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.label));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::raw(self.input.value().to_string()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}
