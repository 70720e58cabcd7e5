use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, error, info, trace};

use crate::column::ColumnDescriptor;
use crate::domain::{DashConfig, DashError, Message, PromptMode};
use crate::engine::{DerivedView, ViewState, derive};
use crate::inputter::{InputResult, Inputter};
use crate::record::Record;
use crate::session::{Session, User};
use crate::settings::{MemberStatus, SettingsState, TeamMember, TeamRole, validate_email};
use crate::source::Dataset;
use crate::store::{Persistence, Store};

pub type SettingsStore = Store<SettingsState, Box<dyn Persistence<SettingsState>>>;
pub type SessionStore = Store<Session, Box<dyn Persistence<Session>>>;

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Overview,
    Users,
    Team,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Users, Tab::Team, Tab::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Users => "Users",
            Tab::Team => "Team",
            Tab::Settings => "Settings",
        }
    }

    fn next(self) -> Tab {
        match self {
            Tab::Overview => Tab::Users,
            Tab::Users => Tab::Team,
            Tab::Team => Tab::Settings,
            Tab::Settings => Tab::Overview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Table,
    Popup,
    Prompt,
}

/// Records, their columns and the view state the user drives over them.
pub struct TableData {
    pub name: String,
    pub records: Vec<Record>,
    pub columns: Vec<ColumnDescriptor>,
    pub view: ViewState,
    pub cursor: usize,
}

impl TableData {
    fn new(dataset: Dataset, config: &DashConfig) -> Self {
        Self {
            name: dataset.name,
            records: dataset.records,
            columns: dataset.columns,
            view: ViewState::new(config.page_size),
            cursor: 0,
        }
    }

    pub fn derive(&self) -> DerivedView<'_> {
        derive(&self.records, &self.columns, &self.view)
    }

    /// Re-derive after a state change: keep the stored page in range and the
    /// cursor on a visible row.
    fn refresh(&mut self) -> usize {
        let view = derive(&self.records, &self.columns, &self.view);
        let (total, visible) = (view.total, view.rows.len());
        self.view.sync(&view);
        self.cursor = self.cursor.min(visible.saturating_sub(1));
        trace!(
            "{}: page {}/{}, {} visible, cursor {}",
            self.name, view.page, view.total_pages, visible, self.cursor
        );
        total
    }

    fn selected(&self) -> Option<&Record> {
        self.derive().records().nth(self.cursor)
    }
}

fn team_dataset(members: &[TeamMember]) -> Dataset {
    let records = members
        .iter()
        .map(|m| {
            Record::new(m.id.as_str())
                .with("name", m.name.as_str())
                .with("email", m.email.as_str())
                .with("role", format!("{:?}", m.role))
                .with("status", format!("{:?}", m.status))
        })
        .collect();
    let columns = vec![
        ColumnDescriptor::new("Name", "name").with_render(|r| {
            let field = |k: &str| r.get(k).map(|v| v.to_string()).unwrap_or_default();
            format!("{} <{}>", field("name"), field("email"))
        }),
        ColumnDescriptor::new("Role", "role"),
        ColumnDescriptor::new("Status", "status"),
    ];
    Dataset {
        name: "Team".to_string(),
        records,
        columns,
    }
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    tab: Tab,
    users: TableData,
    team: TableData,
    settings: SettingsStore,
    session: SessionStore,
    input: Inputter,
    prompt: Option<PromptMode>,
    last_input: InputResult,
    login_email: String,
    status_message: String,
}

impl Model {
    pub fn init(
        config: &DashConfig,
        users: Dataset,
        settings: SettingsStore,
        session: SessionStore,
    ) -> Result<Self, DashError> {
        let team = TableData::new(team_dataset(&settings.state().team_members), config);
        let status_message = format!("{} records loaded, press ? for help", users.records.len());
        let mut model = Self {
            status: Status::Ready,
            modus: Modus::Table,
            tab: Tab::Overview,
            users: TableData::new(users, config),
            team,
            settings,
            session,
            input: Inputter::default(),
            prompt: None,
            last_input: InputResult::default(),
            login_email: config.email.clone(),
            status_message,
        };
        model.users.refresh();
        model.team.refresh();
        if !model.session.state().is_authenticated() {
            model.show_login();
        }
        Ok(model)
    }

    // ------------------------- Accessors for the UI ------------------------- //

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// The table shown on the current tab, `None` on the settings tab.
    pub fn active_table(&self) -> Option<&TableData> {
        match self.tab {
            Tab::Users => Some(&self.users),
            Tab::Team => Some(&self.team),
            Tab::Overview | Tab::Settings => None,
        }
    }

    fn active_table_mut(&mut self) -> Option<&mut TableData> {
        match self.tab {
            Tab::Users => Some(&mut self.users),
            Tab::Team => Some(&mut self.team),
            Tab::Overview | Tab::Settings => None,
        }
    }

    pub fn settings(&self) -> &SettingsState {
        self.settings.state()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.state().user.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.modus == Modus::Popup
    }

    pub fn prompt(&self) -> Option<(PromptMode, &InputResult)> {
        self.prompt.map(|mode| (mode, &self.last_input))
    }

    /// True while the login prompts cover the dashboard.
    pub fn signing_in(&self) -> bool {
        matches!(
            self.prompt,
            Some(PromptMode::LoginEmail | PromptMode::LoginPassword)
        )
    }

    /// The email the login form is about to submit.
    pub fn login_email(&self) -> &str {
        &self.login_email
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::Prompt
    }

    pub fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        debug!("Status: {}", self.status_message);
    }

    /// Errors of user actions end up in the status line, not in the event loop.
    fn report<T>(&mut self, result: Result<T, DashError>, on_success: impl FnOnce(T) -> String) {
        match result {
            Ok(value) => {
                let message = on_success(value);
                self.set_status_message(message);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, e: DashError) {
        error!("Action failed: {e}");
        self.set_status_message(format!("Error: {e}"));
    }

    pub fn update(&mut self, message: Message) -> Result<(), DashError> {
        trace!("Update: Modus {:?}, Message {:?}", self.modus, message);
        match self.modus {
            Modus::Prompt => {
                if let Message::RawKey(key) = message {
                    self.raw_input(key);
                }
            }
            Modus::Popup => match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.modus = Modus::Table,
                _ => (),
            },
            Modus::Table => match message {
                Message::Quit => self.quit(),
                Message::Help => self.modus = Modus::Popup,
                Message::Exit => self.exit(),
                Message::NextTab => {
                    self.tab = self.tab.next();
                    self.set_status_message(format!("{} tab", self.tab.title()));
                }
                Message::MoveUp => self.move_cursor(-1),
                Message::MoveDown => self.move_cursor(1),
                Message::NextPage => self.change_view(ViewState::next_page),
                Message::PreviousPage => self.change_view(ViewState::previous_page),
                Message::FirstPage => self.change_view(ViewState::first_page),
                Message::LastPage => self.change_view(ViewState::last_page),
                Message::SortColumn(idx) => self.sort_column(idx),
                Message::Search => {
                    if let Some(table) = self.active_table() {
                        let current = table.view.search().to_string();
                        self.enter_prompt(PromptMode::Search, &current);
                    }
                }
                Message::Invite => self.enter_prompt(PromptMode::Invite, ""),
                Message::EditCard => self.enter_prompt(PromptMode::Card, ""),
                Message::EditProfile => {
                    let name = self.user().map(|u| u.name.clone()).unwrap_or_default();
                    self.enter_prompt(PromptMode::Profile, &name);
                }
                Message::RemoveMember => self.remove_selected_member(),
                Message::ToggleNotification(kind) => {
                    let result = self.settings.update(|s| Ok(s.toggle_notification(kind)));
                    self.report(result, |on| {
                        format!("{kind:?} notifications {}", if on { "on" } else { "off" })
                    });
                }
                Message::CyclePlan => {
                    let next = self.settings().next_plan_name();
                    let result = self
                        .settings
                        .update(|s| s.switch_plan(&next).map(|p| format!("{} ({})", p.name, p.price)));
                    self.report(result, |plan| format!("Switched to {plan}"));
                }
                Message::Logout => {
                    let email = self.user().map(|u| u.email.clone());
                    let result = self.session.update(|s| {
                        s.logout();
                        Ok(())
                    });
                    self.report(result, |_| "Signed out".to_string());
                    if let Some(email) = email {
                        self.login_email = email;
                    }
                    self.show_login();
                }
                Message::RawKey(_) => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        // Esc on a table drops an active search
        if let Some(table) = self.active_table_mut()
            && !table.view.search().is_empty()
        {
            table.view.search_changed("");
            let total = table.refresh();
            self.set_status_message(format!("Search cleared, {total} results"));
        }
    }

    fn move_cursor(&mut self, step: isize) {
        if let Some(table) = self.active_table_mut() {
            let visible = table.derive().rows.len();
            table.cursor = table
                .cursor
                .saturating_add_signed(step)
                .min(visible.saturating_sub(1));
        }
    }

    fn change_view(&mut self, change: fn(&mut ViewState)) {
        if let Some(table) = self.active_table_mut() {
            change(&mut table.view);
            table.cursor = 0;
            table.refresh();
        }
    }

    fn sort_column(&mut self, idx: usize) {
        let Some(table) = self.active_table_mut() else {
            return;
        };
        let Some(column) = table.columns.get(idx) else {
            trace!("No column {idx} to sort by");
            return;
        };
        let (key, label) = (column.key.clone(), column.label.clone());
        table.view.sort_requested(&key);
        table.refresh();
        let direction = table.view.sort().map(|s| s.direction);
        self.set_status_message(format!("Sorted by {label} {direction:?}"));
    }

    fn enter_prompt(&mut self, mode: PromptMode, initial: &str) {
        trace!("Entering prompt {mode:?} ...");
        self.modus = Modus::Prompt;
        self.prompt = Some(mode);
        self.input.set(initial);
        self.last_input = self.input.get();
    }

    fn leave_prompt(&mut self) {
        self.modus = Modus::Table;
        self.prompt = None;
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        let input = self.last_input.clone();
        match self.prompt {
            Some(PromptMode::Search) => self.search_input(&input),
            Some(mode @ (PromptMode::LoginEmail | PromptMode::LoginPassword)) if input.finished => {
                self.login_input(mode, &input)
            }
            Some(mode) if input.finished => {
                self.leave_prompt();
                if !input.canceled {
                    self.submit(mode, &input.input);
                }
            }
            Some(_) => (),
            None => self.leave_prompt(),
        }
    }

    // Search is live: every edit re-derives the table
    fn search_input(&mut self, input: &InputResult) {
        if input.changed
            && let Some(table) = self.active_table_mut()
        {
            table.view.search_changed(input.input.clone());
            table.cursor = 0;
            let total = table.refresh();
            self.set_status_message(format!("Found {total} results"));
        }
        if input.finished {
            self.leave_prompt();
        }
    }

    fn show_login(&mut self) {
        self.tab = Tab::Overview;
        let email = self.login_email.clone();
        self.enter_prompt(PromptMode::LoginEmail, &email);
    }

    // Email first, then password. Esc on the email quits, on the password
    // it goes back to the email.
    fn login_input(&mut self, mode: PromptMode, input: &InputResult) {
        match mode {
            PromptMode::LoginEmail if input.canceled => self.quit(),
            PromptMode::LoginEmail => {
                let email = input.input.trim().to_string();
                match validate_email(&email) {
                    Ok(()) => {
                        self.login_email = email;
                        self.enter_prompt(PromptMode::LoginPassword, "");
                    }
                    Err(e) => {
                        self.report_error(e);
                        self.enter_prompt(PromptMode::LoginEmail, &input.input);
                    }
                }
            }
            _ if input.canceled => self.show_login(),
            _ => {
                let email = self.login_email.clone();
                let result = self
                    .session
                    .update(|s| s.login(&email, &input.input).map(|u| u.name.clone()));
                match result {
                    Ok(name) => {
                        self.leave_prompt();
                        self.set_status_message(format!("Welcome back, {name}"));
                    }
                    Err(e) => {
                        self.report_error(e);
                        self.enter_prompt(PromptMode::LoginPassword, "");
                    }
                }
            }
        }
    }

    fn submit(&mut self, mode: PromptMode, text: &str) {
        match mode {
            PromptMode::Invite => {
                let result = self
                    .settings
                    .update(|s| s.invite_member(text).map(|m| m.email.clone()));
                self.report(result, |email| format!("Invited {email} to the team"));
                self.reload_team();
            }
            PromptMode::Profile => {
                let result = self
                    .session
                    .update(|s| s.update_profile(text).map(|u| u.name.clone()));
                self.report(result, |name| format!("Profile updated, hello {name}"));
            }
            PromptMode::Card => {
                let (number, expiry) = text.split_once(',').unwrap_or((text, ""));
                let result = self
                    .settings
                    .update(|s| Ok(s.update_payment_method(number, expiry).clone()));
                self.report(result, |pm| {
                    format!("Card ending in {} saved, expires {:02}/{}", pm.last4, pm.expiry_month, pm.expiry_year)
                });
            }
            PromptMode::Search | PromptMode::LoginEmail | PromptMode::LoginPassword => (),
        }
    }

    fn remove_selected_member(&mut self) {
        if self.tab != Tab::Team {
            self.set_status_message("Switch to the Team tab to remove members");
            return;
        }
        let Some(id) = self.team.selected().map(|r| r.id.to_string()) else {
            self.set_status_message("No member selected");
            return;
        };
        let result = self.settings.update(|s| s.remove_member(&id));
        self.report(result, |m| format!("Removed {}", m.name));
        self.reload_team();
    }

    fn reload_team(&mut self) {
        let dataset = team_dataset(&self.settings.state().team_members);
        self.team.records = dataset.records;
        let total = self.team.refresh();
        info!("Team now has {total} visible members");
    }

    /// Invited members, for the settings summary.
    pub fn pending_invites(&self) -> usize {
        self.settings()
            .team_members
            .iter()
            .filter(|m| m.status == MemberStatus::Invited)
            .count()
    }

    pub fn owner(&self) -> Option<&TeamMember> {
        self.settings()
            .team_members
            .iter()
            .find(|m| m.role == TeamRole::Owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::NotificationKind;
    use crate::source::demo_users;
    use crate::store::MemoryStore;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use std::num::NonZeroUsize;

    fn model_with(page_size: usize, session: Session) -> Model {
        let config = DashConfig::default().with_page_size(NonZeroUsize::new(page_size).unwrap());
        let settings: Box<dyn Persistence<SettingsState>> =
            Box::new(MemoryStore::<SettingsState>::default());
        let session: Box<dyn Persistence<Session>> = Box::new(MemoryStore::new(Some(session)));
        let settings: SettingsStore = Store::open(settings).unwrap();
        let session: SessionStore = Store::open(session).unwrap();
        Model::init(&config, demo_users(), settings, session).unwrap()
    }

    fn signed_in(page_size: usize) -> Model {
        let mut session = Session::default();
        session.login("demo@example.com", "secret").unwrap();
        model_with(page_size, session)
    }

    // Signed in and on the Users tab
    fn model(page_size: usize) -> Model {
        let mut m = signed_in(page_size);
        m.update(Message::NextTab).unwrap();
        m
    }

    fn clear_prompt(m: &mut Model) {
        m.update(Message::RawKey(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)))
            .unwrap();
    }

    fn type_keys(m: &mut Model, s: &str) {
        for c in s.chars() {
            m.update(Message::RawKey(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
                .unwrap();
        }
    }

    fn press(m: &mut Model, code: KeyCode) {
        m.update(Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn visible_ids(m: &Model) -> Vec<String> {
        m.active_table()
            .unwrap()
            .derive()
            .records()
            .map(|r| r.id.to_string())
            .collect()
    }

    #[test]
    fn stored_session_skips_login() {
        let m = signed_in(5);
        assert_eq!(m.user().map(|u| u.email.as_str()), Some("demo@example.com"));
        assert_eq!(m.tab(), Tab::Overview);
        assert!(!m.signing_in());
        assert!(m.active_table().is_none());
    }

    #[test]
    fn login_logout_cycle() {
        let mut m = model_with(5, Session::default());
        assert!(m.user().is_none());
        assert!(m.signing_in() && m.raw_keyevents());
        let (mode, input) = m.prompt().unwrap();
        assert_eq!((mode, input.input.as_str()), (PromptMode::LoginEmail, "demo@example.com"));

        // table keys do nothing behind the login
        m.update(Message::NextTab).unwrap();
        assert_eq!(m.tab(), Tab::Overview);

        clear_prompt(&mut m);
        type_keys(&mut m, "ops");
        press(&mut m, KeyCode::Enter);
        assert!(m.status_message().starts_with("Error: Invalid email"));
        assert_eq!(m.prompt().map(|(mode, _)| mode), Some(PromptMode::LoginEmail));

        clear_prompt(&mut m);
        type_keys(&mut m, "ops@example.com");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.prompt().map(|(mode, i)| (mode, i.input.clone())), Some((PromptMode::LoginPassword, String::new())));

        type_keys(&mut m, "12345");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.status_message(), "Error: Password must be at least 6 characters");
        assert!(m.user().is_none());
        assert_eq!(m.prompt().map(|(mode, _)| mode), Some(PromptMode::LoginPassword));

        type_keys(&mut m, "123456");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.user().map(|u| u.email.as_str()), Some("ops@example.com"));
        assert_eq!(m.status_message(), "Welcome back, Demo User");
        assert!(!m.signing_in() && !m.raw_keyevents());

        m.update(Message::NextTab).unwrap();
        m.update(Message::Logout).unwrap();
        assert!(m.user().is_none());
        assert_eq!(m.status, Status::Ready);
        assert_eq!(m.tab(), Tab::Overview);
        let (mode, input) = m.prompt().unwrap();
        assert_eq!((mode, input.input.as_str()), (PromptMode::LoginEmail, "ops@example.com"));

        press(&mut m, KeyCode::Esc);
        assert_eq!(m.status, Status::Quitting);
    }

    #[test]
    fn escape_on_password_returns_to_email() {
        let mut m = model_with(5, Session::default());
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.prompt().map(|(mode, _)| mode), Some(PromptMode::LoginPassword));
        press(&mut m, KeyCode::Esc);
        assert_eq!(m.prompt().map(|(mode, _)| mode), Some(PromptMode::LoginEmail));
        assert_eq!(m.login_email(), "demo@example.com");
        assert_eq!(m.status, Status::Ready);
    }

    #[test]
    fn paging_is_clamped_at_both_ends() {
        let mut m = model(4);
        m.update(Message::PreviousPage).unwrap();
        assert_eq!(m.active_table().unwrap().view.page(), 1);
        m.update(Message::NextPage).unwrap();
        m.update(Message::NextPage).unwrap();
        assert_eq!(m.active_table().unwrap().view.page(), 2);
        assert_eq!(visible_ids(&m), ["5", "6"]);
    }

    #[test]
    fn live_search_resets_page_and_filters() {
        let mut m = model(2);
        m.update(Message::LastPage).unwrap();
        assert_eq!(m.active_table().unwrap().view.page(), 3);

        m.update(Message::Search).unwrap();
        assert!(m.raw_keyevents());
        type_keys(&mut m, "ADMIN");
        assert_eq!(m.active_table().unwrap().view.page(), 1);
        assert_eq!(visible_ids(&m), ["2", "5"]);
        assert_eq!(m.status_message(), "Found 2 results");

        press(&mut m, KeyCode::Enter);
        assert!(!m.raw_keyevents());
        assert_eq!(m.active_table().unwrap().view.search(), "ADMIN");

        m.update(Message::Exit).unwrap();
        assert_eq!(m.active_table().unwrap().view.search(), "");
    }

    #[test]
    fn sorting_by_column_number_toggles() {
        let mut m = model(6);
        m.update(Message::SortColumn(0)).unwrap();
        assert_eq!(visible_ids(&m), ["2", "6", "5", "1", "3", "4"]);
        m.update(Message::SortColumn(0)).unwrap();
        assert_eq!(visible_ids(&m), ["4", "3", "1", "5", "6", "2"]);
        // out of range column is ignored
        m.update(Message::SortColumn(8)).unwrap();
        assert_eq!(visible_ids(&m), ["4", "3", "1", "5", "6", "2"]);
    }

    #[test]
    fn invite_and_remove_team_members() {
        let mut m = model(10);
        m.update(Message::NextTab).unwrap();
        assert_eq!(m.tab(), Tab::Team);

        m.update(Message::Invite).unwrap();
        type_keys(&mut m, "jane@example.com");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.status_message(), "Invited jane@example.com to the team");
        assert_eq!(visible_ids(&m), ["1", "2", "3", "4"]);
        assert_eq!(m.pending_invites(), 2);

        // cursor on the owner
        m.update(Message::RemoveMember).unwrap();
        assert!(m.status_message().starts_with("Error"));

        m.update(Message::MoveDown).unwrap();
        m.update(Message::RemoveMember).unwrap();
        assert_eq!(m.status_message(), "Removed Sarah Wilson");
        assert_eq!(visible_ids(&m), ["1", "3", "4"]);
    }

    #[test]
    fn invalid_invite_is_reported_not_fatal() {
        let mut m = model(10);
        m.update(Message::Invite).unwrap();
        type_keys(&mut m, "nope");
        press(&mut m, KeyCode::Enter);
        assert!(m.status_message().starts_with("Error: Invalid email"));
        assert_eq!(m.settings().team_members.len(), 3);
    }

    #[test]
    fn settings_actions_persist_through_the_store() {
        let mut m = model(5);
        m.update(Message::ToggleNotification(NotificationKind::Marketing)).unwrap();
        assert!(m.settings().notifications.marketing);
        m.update(Message::CyclePlan).unwrap();
        assert_eq!(m.settings().plan.name, "Enterprise Plan");
        assert_eq!(m.status_message(), "Switched to Enterprise Plan ($99)");
    }

    #[test]
    fn card_prompt_updates_payment_method() {
        let mut m = model(5);
        m.update(Message::EditCard).unwrap();
        type_keys(&mut m, "5555 4444 3333 1111, 08/29");
        press(&mut m, KeyCode::Enter);
        let pm = &m.settings().payment_method;
        assert_eq!(pm.last4, "1111");
        assert_eq!((pm.expiry_month, pm.expiry_year), (8, 2029));
        assert_eq!(m.status_message(), "Card ending in 1111 saved, expires 08/2029");
    }

    #[test]
    fn profile_prompt_renames_user() {
        let mut m = model(5);
        m.update(Message::EditProfile).unwrap();
        press(&mut m, KeyCode::End);
        type_keys(&mut m, " Two");
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.user().map(|u| u.name.as_str()), Some("Demo User Two"));
    }

    #[test]
    fn help_popup_swallows_table_keys() {
        let mut m = model(2);
        m.update(Message::Help).unwrap();
        assert!(m.show_help());
        m.update(Message::NextPage).unwrap();
        assert_eq!(m.active_table().unwrap().view.page(), 1);
        m.update(Message::Exit).unwrap();
        assert!(!m.show_help());
    }

    #[test]
    fn tabs_cycle_through_overview() {
        let mut m = signed_in(5);
        let mut seen = vec![m.tab()];
        for _ in 0..4 {
            m.update(Message::NextTab).unwrap();
            seen.push(m.tab());
        }
        assert_eq!(seen, [Tab::Overview, Tab::Users, Tab::Team, Tab::Settings, Tab::Overview]);
    }
}
