//! Create/edit form for a single user.
//!
//! One component, two modes. The mode decides which schema validates the
//! input and which API call a submit issues; invalid input never reaches
//! the network.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use validator::Validate;

use super::input::TextInput;
use super::KeyResult;
use crate::api::cached_client::CachedApiClient;
use crate::api::types::User;
use crate::query::Query;
use crate::schema::{self, CreateUser, UpdateUser};

/// Pre-populated birth value in create mode; clearing it back to empty
/// means "not provided".
const BIRTH_PLACEHOLDER: &str = "2000-01-01";

/// Which operation a submit performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit(i64),
}

/// Key-handling events for the parent view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Form dismissed without saving
  Cancelled,
}

/// Async outcomes the parent consumes on tick.
#[derive(Debug, Clone)]
pub enum FormTick {
  /// Mutation succeeded; the caches are already invalidated
  Saved(User),
  /// Mutation failed; the form stays open with values intact
  Failed(String),
}

/// Editable form fields. The name doubles as the schema's field key so
/// validation errors land on the right input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
  Uid,
  Email,
  Name,
  UsedName,
  Company,
  Birth,
}

impl Field {
  fn name(self) -> &'static str {
    match self {
      Field::Uid => "uid",
      Field::Email => "email",
      Field::Name => "name",
      Field::UsedName => "used_name",
      Field::Company => "company",
      Field::Birth => "birth",
    }
  }

  fn label(self) -> &'static str {
    match self {
      Field::Uid => "UID",
      Field::Email => "Email",
      Field::Name => "Name",
      Field::UsedName => "Used Name",
      Field::Company => "Company",
      Field::Birth => "Birth",
    }
  }
}

/// The user form overlay.
pub struct UserForm {
  mode: FormMode,
  client: CachedApiClient,
  fields: Vec<(Field, TextInput)>,
  focused: usize,
  errors: BTreeMap<&'static str, String>,
  /// uid of the loaded user, shown read-only in edit mode
  uid_display: Option<String>,
  /// Server-assigned timestamps, shown read-only in edit mode
  timestamps: Option<(String, String)>,
  /// Entity fetch (edit mode only)
  load: Option<Query<User>>,
  prefilled: bool,
  /// In-flight create/update
  submit: Option<Query<User>>,
}

impl UserForm {
  /// Open in create mode: every field editable, birth pre-populated.
  pub fn create(client: CachedApiClient) -> Self {
    let mut birth = TextInput::new();
    birth.set_value(BIRTH_PLACEHOLDER);

    let fields = vec![
      (Field::Uid, TextInput::new()),
      (Field::Email, TextInput::new()),
      (Field::Name, TextInput::new()),
      (Field::UsedName, TextInput::new()),
      (Field::Company, TextInput::new()),
      (Field::Birth, birth),
    ];

    Self {
      mode: FormMode::Create,
      client,
      fields,
      focused: 0,
      errors: BTreeMap::new(),
      uid_display: None,
      timestamps: None,
      load: None,
      prefilled: false,
      submit: None,
    }
  }

  /// Open in edit mode: fetch the entity by id, uid read-only, email not
  /// part of the form.
  pub fn edit(id: i64, client: CachedApiClient) -> Self {
    let fields = vec![
      (Field::Name, TextInput::new()),
      (Field::UsedName, TextInput::new()),
      (Field::Company, TextInput::new()),
      (Field::Birth, TextInput::new()),
    ];

    let load_client = client.clone();
    let mut load = Query::new(move || {
      let client = load_client.clone();
      async move { client.get_by_id(id).await.map_err(|e| e.to_string()) }
    });
    load.fetch();

    Self {
      mode: FormMode::Edit(id),
      client,
      fields,
      focused: 0,
      errors: BTreeMap::new(),
      uid_display: None,
      timestamps: None,
      load: Some(load),
      prefilled: false,
      submit: None,
    }
  }

  pub fn mode(&self) -> FormMode {
    self.mode
  }

  /// True while a create/update is in flight; the submit action is
  /// disabled until it resolves.
  pub fn is_saving(&self) -> bool {
    self.submit.as_ref().is_some_and(|q| q.is_loading())
  }

  fn is_loading_entity(&self) -> bool {
    self.load.as_ref().is_some_and(|q| q.is_loading())
  }

  fn load_error(&self) -> Option<&str> {
    self.load.as_ref().and_then(|q| q.error())
  }

  /// Handle a key event. The form is modal: while open it consumes
  /// everything.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Esc => return KeyResult::Event(FormEvent::Cancelled),
      KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.try_submit();
        return KeyResult::Handled;
      }
      _ => {}
    }

    // A failed entity load leaves nothing to edit; only retry works
    if self.load_error().is_some() {
      if key.code == KeyCode::Char('r') {
        if let Some(load) = &mut self.load {
          load.refetch();
        }
      }
      return KeyResult::Handled;
    }

    if self.is_loading_entity() || self.is_saving() {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus_next();
        KeyResult::Handled
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus_prev();
        KeyResult::Handled
      }
      KeyCode::Enter => {
        // Enter advances through the fields; on the last one it submits
        if self.focused + 1 == self.fields.len() {
          self.try_submit();
        } else {
          self.focus_next();
        }
        KeyResult::Handled
      }
      _ => {
        if let Some((field, input)) = self.fields.get_mut(self.focused) {
          let field = *field;
          input.handle_key(key);
          // Editing a field clears its stale error
          self.errors.remove(field.name());
        }
        KeyResult::Handled
      }
    }
  }

  fn focus_next(&mut self) {
    self.focused = (self.focused + 1) % self.fields.len();
  }

  fn focus_prev(&mut self) {
    self.focused = self
      .focused
      .checked_sub(1)
      .unwrap_or(self.fields.len() - 1);
  }

  fn value(&self, field: Field) -> String {
    self
      .fields
      .iter()
      .find(|(f, _)| *f == field)
      .map(|(_, input)| input.value().to_string())
      .unwrap_or_default()
  }

  /// Validate against the mode's schema and start the mutation if every
  /// field passes. Invalid input blocks here - no request is made.
  fn try_submit(&mut self) {
    if self.is_saving() || self.is_loading_entity() || self.load_error().is_some() {
      return;
    }

    match self.mode {
      FormMode::Create => {
        let input = CreateUser {
          uid: self.value(Field::Uid),
          email: self.value(Field::Email),
          name: self.value(Field::Name),
          used_name: opt(self.value(Field::UsedName)),
          company: opt(self.value(Field::Company)),
          birth: opt(self.value(Field::Birth)),
        };
        match input.validate() {
          Err(errors) => self.errors = schema::field_errors(&errors),
          Ok(()) => {
            self.errors.clear();
            let client = self.client.clone();
            let mut query = Query::new(move || {
              let client = client.clone();
              let input = input.clone();
              async move { client.create(&input).await.map_err(|e| e.to_string()) }
            });
            query.fetch();
            self.submit = Some(query);
          }
        }
      }
      FormMode::Edit(id) => {
        let input = UpdateUser {
          name: self.value(Field::Name),
          used_name: opt(self.value(Field::UsedName)),
          company: opt(self.value(Field::Company)),
          birth: opt(self.value(Field::Birth)),
        };
        match input.validate() {
          Err(errors) => self.errors = schema::field_errors(&errors),
          Ok(()) => {
            self.errors.clear();
            let client = self.client.clone();
            let mut query = Query::new(move || {
              let client = client.clone();
              let input = input.clone();
              async move { client.update(id, &input).await.map_err(|e| e.to_string()) }
            });
            query.fetch();
            self.submit = Some(query);
          }
        }
      }
    }
  }

  /// Poll async work. Returns an outcome for the parent when a mutation
  /// resolves.
  pub fn tick(&mut self) -> Option<FormTick> {
    if let Some(load) = &mut self.load {
      if load.poll() && !self.prefilled {
        if let Some(user) = load.data().cloned() {
          self.prefill(&user);
        }
      }
    }

    if let Some(submit) = &mut self.submit {
      if submit.poll() {
        let outcome = match submit.state() {
          crate::query::QueryState::Success(user) => Some(FormTick::Saved(user.clone())),
          crate::query::QueryState::Error(e) => Some(FormTick::Failed(e.clone())),
          _ => None,
        };
        self.submit = None;
        return outcome;
      }
    }

    None
  }

  /// Copy the fetched entity into the inputs. Absent optional values
  /// become empty strings.
  fn prefill(&mut self, user: &User) {
    self.uid_display = Some(user.uid.clone());
    self.timestamps = Some((
      format_timestamp(&user.created_at),
      format_timestamp(&user.updated_at),
    ));
    for (field, input) in &mut self.fields {
      let value = match field {
        Field::Name => user.name.clone(),
        Field::UsedName => user.used_name.clone().unwrap_or_default(),
        Field::Company => user.company.clone().unwrap_or_default(),
        Field::Birth => user.birth.clone().unwrap_or_default(),
        Field::Uid | Field::Email => continue,
      };
      input.set_value(&value);
    }
    self.prefilled = true;
  }

  /// Render the form overlay
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let title = match self.mode {
      FormMode::Create => " Create User ",
      FormMode::Edit(_) => " Edit User ",
    };

    // One line per field, one per error, plus read-only rows and status
    let content_height = self.fields.len() + self.errors.len() + 4;
    let width = (area.width * 60 / 100).clamp(40, 70);
    let height = (content_height as u16 + 2).min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(title)
      .title_alignment(Alignment::Center);

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let mut lines = Vec::new();

    if let Some(error) = self.load_error() {
      lines.push(Line::from(Span::styled(
        format!("Failed to load user: {}", error),
        Style::default().fg(Color::Red),
      )));
      lines.push(Line::from(Span::styled(
        "Press 'r' to retry, Esc to close.",
        Style::default().fg(Color::DarkGray),
      )));
      frame.render_widget(Paragraph::new(lines), inner);
      return;
    }

    if self.is_loading_entity() {
      lines.push(Line::from(Span::styled(
        "Loading user...",
        Style::default().fg(Color::DarkGray),
      )));
      frame.render_widget(Paragraph::new(lines), inner);
      return;
    }

    // Read-only rows in edit mode: uid and server timestamps
    if matches!(self.mode, FormMode::Edit(_)) {
      lines.push(Line::from(vec![
        Span::styled(format!("{:<11}", "UID"), Style::default().fg(Color::DarkGray)),
        Span::styled(
          self.uid_display.clone().unwrap_or_else(|| "-".to_string()),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
      if let Some((created, updated)) = &self.timestamps {
        lines.push(Line::from(Span::styled(
          format!("{:<11}{}  (updated {})", "Created", created, updated),
          Style::default().fg(Color::DarkGray),
        )));
      }
    }

    for (idx, (field, input)) in self.fields.iter().enumerate() {
      let is_focused = idx == self.focused;
      let label_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::White)
      };

      let mut spans = vec![
        Span::styled(format!("{:<11}", field.label()), label_style),
        Span::raw(input.value().to_string()),
      ];
      if is_focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
      }
      lines.push(Line::from(spans));

      if let Some(message) = self.errors.get(field.name()) {
        lines.push(Line::from(Span::styled(
          format!("{:<11}{}", "", message),
          Style::default().fg(Color::Red),
        )));
      }
    }

    let status = if self.is_saving() {
      Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
    } else {
      Line::from(vec![
        Span::styled("<Enter>", Style::default().fg(Color::Cyan)),
        Span::styled(" next/save   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<Esc>", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
      ])
    };
    lines.push(Line::from(""));
    lines.push(status);

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

/// Empty strings from optional inputs are treated as omitted.
fn opt(value: String) -> Option<String> {
  if value.is_empty() {
    None
  } else {
    Some(value)
  }
}

/// Server timestamps are RFC 3339; shorten them for display. Anything
/// unparseable is shown as-is.
fn format_timestamp(raw: &str) -> String {
  chrono::DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|_| raw.to_string())
}
