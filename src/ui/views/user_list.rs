use crate::api::cached_client::CachedApiClient;
use crate::api::types::{Page, User, UserListFilter};
use crate::query::{Query, QueryState};
use crate::ui::components::{
  ConfirmDialog, ConfirmEvent, FilterEvent, FilterInput, FormEvent, FormMode, FormTick, KeyResult,
  Notification, Notifications, UserForm,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{display_or_dash, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// View for the paginated user table.
///
/// Owns the list filter, the delete confirmation, and the form overlay's
/// lifecycle. All reads go through the shared cache; all writes invalidate
/// it before this view observes their completion.
pub struct UserListView {
  client: CachedApiClient,
  filter: UserListFilter,
  query: Query<Page<User>>,
  list_state: ListState,

  form: Option<UserForm>,

  confirm: ConfirmDialog,
  pending_delete: Option<i64>,
  delete: Option<Query<i64>>,

  name_filter: FilterInput,
  email_filter: FilterInput,

  notifications: Notifications,
}

/// Fetcher for one page of the listing; reused on every reload.
fn list_fetcher(
  client: CachedApiClient,
  filter: UserListFilter,
) -> impl Fn() -> Pin<Box<dyn Future<Output = Result<Page<User>, String>> + Send>> + Send + Sync {
  move || {
    let client = client.clone();
    let filter = filter.clone();
    Box::pin(async move { client.list(&filter).await.map_err(|e| e.to_string()) })
  }
}

/// Target for a page-back request; None when already at the first page.
fn prev_page(current: u32) -> Option<u32> {
  (current > 1).then(|| current - 1)
}

/// Target for a page-forward request; None when already at the last page.
fn next_page(current: u32, total_pages: u32) -> Option<u32> {
  (current < total_pages).then(|| current + 1)
}

impl UserListView {
  pub fn new(client: CachedApiClient, page_size: u32) -> Self {
    let filter = UserListFilter::new(page_size);

    let mut query = Query::new(list_fetcher(client.clone(), filter.clone()));
    query.fetch();

    Self {
      client,
      filter,
      query,
      list_state: ListState::default(),
      form: None,
      confirm: ConfirmDialog::new(),
      pending_delete: None,
      delete: None,
      name_filter: FilterInput::new("Filter by name"),
      email_filter: FilterInput::new("Filter by email (exact)"),
      notifications: Notifications::new(),
    }
  }

  fn users(&self) -> &[User] {
    self
      .query
      .data()
      .map(|page| page.items.as_slice())
      .unwrap_or(&[])
  }

  fn selected_user(&self) -> Option<&User> {
    self
      .list_state
      .selected()
      .and_then(|idx| self.users().get(idx))
  }

  /// Restart the list read for the current filter. Superseded in-flight
  /// results are discarded by the query itself.
  fn reload(&mut self) {
    self
      .query
      .restart(list_fetcher(self.client.clone(), self.filter.clone()));
  }

  fn page_back(&mut self) {
    if let Some(target) = prev_page(self.filter.page) {
      self.filter = self.filter.with_page(target);
      self.reload();
    }
  }

  fn page_forward(&mut self) {
    let total_pages = self.query.data().map(|p| p.total_pages).unwrap_or(0);
    if let Some(target) = next_page(self.filter.page, total_pages) {
      self.filter = self.filter.with_page(target);
      self.reload();
    }
  }

  /// Any filter change starts over from the first page.
  fn apply_name_filter(&mut self, event: FilterEvent) {
    self.filter.name_like = match event {
      FilterEvent::Applied(value) => Some(value),
      FilterEvent::Cleared => None,
    };
    self.filter.page = 1;
    self.reload();
  }

  fn apply_email_filter(&mut self, event: FilterEvent) {
    self.filter.email = match event {
      FilterEvent::Applied(value) => Some(value),
      FilterEvent::Cleared => None,
    };
    self.filter.page = 1;
    self.reload();
  }

  fn start_delete(&mut self) {
    let Some(user) = self.selected_user() else {
      return;
    };
    let id = user.id;
    let message = format!("Delete user {} (id {})?", truncate(&user.name, 24), id);
    self.pending_delete = Some(id);
    self.confirm.show(message);
  }

  fn confirm_delete(&mut self) {
    let Some(id) = self.pending_delete else {
      return;
    };
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.delete(id).await.map(|_| id).map_err(|e| e.to_string()) }
    });
    query.fetch();
    self.delete = Some(query);
  }

  fn refresh(&mut self) {
    // Manual refresh must actually hit the network, not the cache
    self.client.invalidate_lists();
    self.reload();
  }

  fn filter_indicator(&self) -> String {
    let mut out = String::new();
    if let Some(pattern) = &self.filter.name_like {
      out.push_str(&format!(" [name~{}]", pattern));
    }
    if let Some(email) = &self.filter.email {
      out.push_str(&format!(" [email={}]", email));
    }
    out
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.users().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => format!(" Users (loading...){} ", self.filter_indicator()),
      QueryState::Error(e) => format!(" Users (error: {}) ", truncate(e, 40)),
      _ => match self.query.data() {
        Some(page) => format!(
          " Users (page {}/{}, {} total){} ",
          page.page,
          page.total_pages.max(1),
          page.total,
          self.filter_indicator()
        ),
        None => " Users ".to_string(),
      },
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if self.users().is_empty() {
      let content = if self.query.is_error() {
        "Failed to load users. Press 'r' to retry."
      } else if self.query.is_loading() {
        "Loading users..."
      } else {
        "No users found."
      };
      let paragraph = Paragraph::new(content).style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(inner);

    let header = Line::from(Span::styled(
      format!(
        " {:<6} {:<12} {:<24} {:<18} {:<14} {:<10}",
        "ID", "UID", "EMAIL", "NAME", "COMPANY", "BIRTH"
      ),
      Style::default().fg(Color::DarkGray).bold(),
    ));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let items: Vec<ListItem> = self
      .users()
      .iter()
      .map(|user| {
        let line = Line::from(vec![
          Span::styled(format!("{:<6}", user.id), Style::default().fg(Color::Cyan)),
          Span::raw(" "),
          Span::raw(format!("{:<12}", truncate(&user.uid, 12))),
          Span::raw(" "),
          Span::raw(format!(
            "{:<24}",
            truncate(display_or_dash(user.email.as_deref()), 24)
          )),
          Span::raw(" "),
          Span::raw(format!("{:<18}", truncate(&user.name, 18))),
          Span::raw(" "),
          Span::raw(format!(
            "{:<14}",
            truncate(display_or_dash(user.company.as_deref()), 14)
          )),
          Span::raw(" "),
          Span::raw(format!("{:<10}", display_or_dash(user.birth.as_deref()))),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
  }
}

impl View for UserListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // The form is modal while open
    if let Some(form) = &mut self.form {
      if let KeyResult::Event(FormEvent::Cancelled) = form.handle_key(key) {
        self.form = None;
      }
      return ViewAction::None;
    }

    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed) => {
        self.confirm_delete();
        return ViewAction::None;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) => {
        self.pending_delete = None;
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.name_filter.handle_key(key) {
      KeyResult::Event(event) => {
        self.apply_name_filter(event);
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.email_filter.handle_key(key) {
      KeyResult::Event(event) => {
        self.apply_email_filter(event);
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('h') | KeyCode::Left => self.page_back(),
      KeyCode::Char('l') | KeyCode::Right => self.page_forward(),
      KeyCode::Char('a') => {
        self.form = Some(UserForm::create(self.client.clone()));
      }
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(id) = self.selected_user().map(|user| user.id) {
          self.form = Some(UserForm::edit(id, self.client.clone()));
        }
      }
      KeyCode::Char('d') => self.start_delete(),
      KeyCode::Char('/') => {
        self
          .name_filter
          .activate_with(self.filter.name_like.as_deref().unwrap_or(""));
      }
      KeyCode::Char('f') => {
        self
          .email_filter
          .activate_with(self.filter.email.as_deref().unwrap_or(""));
      }
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);

    // Overlays on top of the table
    self.name_filter.render_overlay(frame, area);
    self.email_filter.render_overlay(frame, area);
    self.confirm.render_overlay(frame, area);
    if let Some(form) = &self.form {
      form.render_overlay(frame, area);
    }
  }

  fn breadcrumb(&self) -> Vec<String> {
    let mut parts = vec!["Users".to_string()];
    match self.form.as_ref().map(|f| f.mode()) {
      Some(FormMode::Create) => parts.push("New User".to_string()),
      Some(FormMode::Edit(id)) => parts.push(format!("Edit #{}", id)),
      None => {}
    }
    parts
  }

  fn tick(&mut self) {
    self.query.poll();

    // Form completion: close on save, keep open (with a notification) on
    // failure
    let form_outcome = self.form.as_mut().map(|form| (form.mode(), form.tick()));
    if let Some((mode, Some(outcome))) = form_outcome {
      match outcome {
        FormTick::Saved(_) => {
          self.form = None;
          match mode {
            FormMode::Create => self.notifications.success("User created successfully"),
            FormMode::Edit(_) => self.notifications.success("User updated successfully"),
          }
          self.reload();
        }
        FormTick::Failed(error) => {
          warn!(%error, "save failed");
          match mode {
            FormMode::Create => self.notifications.error("Failed to create user"),
            FormMode::Edit(_) => self.notifications.error("Failed to update user"),
          }
        }
      }
    }

    let delete_outcome = self.delete.as_mut().and_then(|query| {
      if query.poll() {
        match query.state() {
          QueryState::Success(id) => Some(Ok(*id)),
          QueryState::Error(e) => Some(Err(e.clone())),
          _ => None,
        }
      } else {
        None
      }
    });
    if let Some(result) = delete_outcome {
      self.delete = None;
      self.pending_delete = None;
      match result {
        Ok(_) => {
          self.notifications.success("User deleted");
          self.reload();
        }
        Err(error) => {
          warn!(%error, "delete failed");
          self.notifications.error("Failed to delete user");
        }
      }
    }

    self.notifications.tick();
  }

  fn notification(&self) -> Option<&Notification> {
    self.notifications.current()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.form.is_some() {
      return vec![
        ShortcutInfo::new("Enter", "next/save"),
        ShortcutInfo::new("Esc", "cancel"),
      ];
    }
    if self.confirm.is_active() {
      return vec![
        ShortcutInfo::new("y", "confirm"),
        ShortcutInfo::new("n", "cancel"),
      ];
    }
    vec![
      ShortcutInfo::new("a", "add"),
      ShortcutInfo::new("e", "edit"),
      ShortcutInfo::new("d", "delete"),
      ShortcutInfo::new("/", "name"),
      ShortcutInfo::new("f", "email"),
      ShortcutInfo::new("h/l", "page"),
      ShortcutInfo::new("r", "refresh"),
      ShortcutInfo::new("q", "quit"),
    ]
  }
}
