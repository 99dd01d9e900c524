use crate::ui::components::{Notification, NotificationLevel};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with the view breadcrumb and, when present, a
/// transient notification on the right
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  notification: Option<&Notification>,
) {
  let mut spans = Vec::new();

  spans.push(Span::raw(" "));

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  let line = Line::from(spans);
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);

  if let Some(notification) = notification {
    let color = match notification.level {
      NotificationLevel::Success => Color::Green,
      NotificationLevel::Error => Color::Red,
    };
    let text = format!("{} ", notification.message);
    let width = text.len().min(area.width as usize) as u16;
    let right = Rect::new(area.x + area.width - width, area.y, width, area.height);
    let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(color).bold()))
      .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, right);
  }
}
