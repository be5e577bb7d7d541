use crate::config::Config;
use crate::error::Result;
use crate::event::AppEvent;
use crate::github::client::{ClientConfig, GitHubClient, RepoLookup};
use crate::github::types::RepoMetadata;
use crate::storage::{JsonStore, LocalStorage, TokenStore, REPOS_KEY};
use crate::token::TokenManager;
use crate::tracker::{PendingAdd, RepoList, TrackedRepository};
use crate::ui::{
    detail_panel::DetailPanel,
    form::AddForm,
    header_bar::HeaderBar,
    help_panel::HelpPanel,
    input::{self, Action, Focus},
    repo_list::RepoListView,
    status_bar::StatusBar,
    toast::Banner,
    token_prompt::TokenPrompt,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub type RepoStore = JsonStore<Vec<TrackedRepository>>;

/// A lookup the event loop should run off the UI task.
pub struct FetchRequest {
    pub client: GitHubClient,
    pub identifier: String,
}

impl FetchRequest {
    pub async fn run(self) -> AppEvent {
        AppEvent::AddFinished(self.client.fetch_repo(&self.identifier).await)
    }
}

pub struct App {
    pub repos: RepoList<RepoStore>,
    pub tokens: TokenManager<TokenStore>,
    pub client_config: ClientConfig,
    client: Option<GitHubClient>,
    pending: Option<PendingAdd>,

    pub focus: Focus,
    pub show_token_prompt: bool,
    pub token_draft: String,
    pub notice: Option<String>,

    pub selected: usize,
    pub scroll: usize,
    pub detail: Option<TrackedRepository>,
    pub show_help: bool,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let storage = LocalStorage::new(&config.data_dir);
        let repos = RepoList::load(JsonStore::new(storage.clone(), REPOS_KEY));
        let tokens = TokenManager::load(TokenStore::new(storage), config.fallback_token());

        let client_config = ClientConfig::new(config.api_base_url.clone())
            .with_token(tokens.current().map(String::from));

        Self {
            repos,
            tokens,
            client_config,
            client: None,
            pending: None,
            focus: Focus::Form,
            show_token_prompt: false,
            token_draft: String::new(),
            notice: None,
            selected: 0,
            scroll: 0,
            detail: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Client matching the current config, rebuilt after a token change.
    fn client(&mut self) -> Result<GitHubClient> {
        if let Some(ref c) = self.client {
            if *c.config() == self.client_config {
                return Ok(c.clone());
            }
        }
        let client = GitHubClient::new(&self.client_config)?;
        self.client = Some(client.clone());
        Ok(client)
    }

    pub fn banner(&self) -> Option<&str> {
        self.repos.error_message().or(self.notice.as_deref())
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<FetchRequest> {
        match event {
            AppEvent::Key(key) => {
                let action = input::map_key(key, self.focus);
                self.handle_action(action)
            }
            AppEvent::AddFinished(result) => {
                self.finish_add(result);
                None
            }
            AppEvent::Resize => None,
        }
    }

    fn finish_add(&mut self, result: Result<RepoMetadata>) {
        let Some(pending) = self.pending.take() else {
            tracing::debug!("lookup result with no add in flight, ignored");
            return;
        };
        if self.repos.finish_add(pending, result).is_ok() {
            self.selected = self.repos.repositories().len().saturating_sub(1);
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Option<FetchRequest> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => {
                if self.selected + 1 < self.repos.repositories().len() {
                    self.selected += 1;
                }
            }
            Action::ScrollUp => self.selected = self.selected.saturating_sub(1),
            Action::Top => self.selected = 0,
            Action::Bottom => {
                self.selected = self.repos.repositories().len().saturating_sub(1);
            }
            Action::FocusForm => {
                self.show_help = false;
                self.focus = Focus::Form;
            }
            Action::ToggleTokenPrompt => {
                if !self.tokens.is_set() {
                    self.show_token_prompt = !self.show_token_prompt;
                    self.focus = if self.show_token_prompt {
                        Focus::Token
                    } else {
                        Focus::List
                    };
                }
            }
            Action::Select => {
                self.detail = self.repos.repositories().get(self.selected).cloned();
            }
            Action::Delete => self.delete_selected(),
            Action::InputChar(c) => match self.focus {
                Focus::Form => self.repos.push_input(c),
                Focus::Token => self.token_draft.push(c),
                Focus::List => {}
            },
            Action::InputBackspace => match self.focus {
                Focus::Form => self.repos.pop_input(),
                Focus::Token => {
                    self.token_draft.pop();
                }
                Focus::List => {}
            },
            Action::ClearInput => match self.focus {
                Focus::Form => self.repos.set_input(""),
                Focus::Token => self.token_draft.clear(),
                Focus::List => {}
            },
            Action::Submit => match self.focus {
                Focus::Form => return self.submit(),
                Focus::Token => self.save_token(),
                Focus::List => {}
            },
            Action::LeaveInput => self.focus = Focus::List,
            Action::Dismiss => {
                if self.detail.is_some() || self.show_help {
                    self.detail = None;
                    self.show_help = false;
                } else {
                    self.repos.dismiss_error();
                    self.notice = None;
                }
            }
            Action::Help => self.show_help = !self.show_help,
            Action::None => {}
        }
        None
    }

    fn submit(&mut self) -> Option<FetchRequest> {
        let identifier = self.repos.input().to_string();
        // Busy leaves the in-flight add alone; other rejections are already on the banner
        let pending = self.repos.begin_add(&identifier).ok()?;
        self.notice = None;

        match self.client() {
            Ok(client) => {
                self.pending = Some(pending);
                Some(FetchRequest { client, identifier })
            }
            Err(e) => {
                let _ = self.repos.finish_add(pending, Err(e));
                None
            }
        }
    }

    fn save_token(&mut self) {
        match self.tokens.save(&self.token_draft, &mut self.client_config) {
            Ok(true) => {
                self.token_draft.clear();
                self.show_token_prompt = false;
                self.focus = Focus::Form;
                self.notice = None;
                self.repos.dismiss_error();
            }
            Ok(false) => {}
            Err(e) => self.notice = Some(format!("could not save token: {e}")),
        }
    }

    fn delete_selected(&mut self) {
        let Some(name) = self
            .repos
            .repositories()
            .get(self.selected)
            .map(|r| r.name.clone())
        else {
            return;
        };
        let _ = self.repos.remove(&name);
        let len = self.repos.repositories().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let token_height = if self.tokens.is_set() {
            0
        } else if self.show_token_prompt {
            4
        } else {
            1
        };
        let banner_height = if self.banner().is_some() { 1 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(token_height),
                Constraint::Length(3),
                Constraint::Length(banner_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(size);

        frame.render_widget(
            HeaderBar {
                tracked: self.repos.repositories().len(),
            },
            chunks[0],
        );

        if token_height > 0 {
            frame.render_widget(
                TokenPrompt {
                    expanded: self.show_token_prompt,
                    draft: &self.token_draft,
                    focused: self.focus == Focus::Token,
                },
                chunks[1],
            );
        }

        frame.render_widget(
            AddForm {
                input: self.repos.input(),
                loading: self.repos.is_loading(),
                error: self.banner().is_some(),
                focused: self.focus == Focus::Form,
            },
            chunks[2],
        );

        if let Some(message) = self.banner() {
            frame.render_widget(Banner { message }, chunks[3]);
        }

        self.ensure_scroll_bounds(chunks[4].height as usize);
        frame.render_widget(
            RepoListView {
                repos: self.repos.repositories(),
                selected: self.selected,
                scroll: self.scroll,
                focused: self.focus == Focus::List,
            },
            chunks[4],
        );

        frame.render_widget(
            StatusBar {
                focus: self.focus,
                api_base_url: &self.client_config.base_url,
                authenticated: self.tokens.is_set(),
                loading: self.repos.is_loading(),
            },
            chunks[5],
        );

        if let Some(ref repo) = self.detail {
            frame.render_widget(DetailPanel { repo }, size);
        }
        if self.show_help {
            frame.render_widget(HelpPanel, size);
        }
    }

    fn ensure_scroll_bounds(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected >= self.scroll + visible_height {
            self.scroll = self.selected - visible_height + 1;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
    }
}
