mod app;
mod config;
mod error;
mod event;
mod github;
mod logging;
mod storage;
#[cfg(test)]
mod test_utils;
mod token;
mod tracker;
mod ui;

use app::App;
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::AppEvent;
use futures::StreamExt;
use github::client::{ClientConfig, GitHubClient};
use std::path::PathBuf;
use storage::{JsonStore, LocalStorage, TokenStore, REPOS_KEY};
use token::TokenManager;
use tokio::sync::mpsc;
use tracker::RepoList;

#[derive(Parser)]
#[command(name = "repotrack", about = "Track a personal list of GitHub repositories")]
struct Cli {
    #[arg(long, help = "Directory holding saved repositories and token")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "GitHub API base URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print tracked repositories
    List,
    /// Track a repository (owner/repo)
    Add { repo: String },
    /// Stop tracking a repository
    Remove { repo: String },
    /// Manage the stored GitHub token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    Set { value: String },
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(Overrides {
        data_dir: cli.data_dir,
        api_base_url: cli.api_url,
    });
    logging::init(&config);
    tracing::debug!(?config, "starting");

    if let Some(command) = cli.command {
        if let Err(e) = run_command(&config, command).await {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    run_tui(config).await
}

async fn run_command(config: &Config, command: Command) -> error::Result<()> {
    let storage = LocalStorage::new(&config.data_dir);
    let mut repos = RepoList::load(JsonStore::new(storage.clone(), REPOS_KEY));
    if let Some(msg) = repos.error_message() {
        eprintln!("warning: {msg}");
    }
    let mut tokens = TokenManager::load(TokenStore::new(storage), config.fallback_token());
    let mut client_config =
        ClientConfig::new(config.api_base_url.clone()).with_token(tokens.current().map(String::from));

    match command {
        Command::List => {
            for repo in repos.repositories() {
                println!("{}", repo.name);
            }
        }
        Command::Add { repo } => {
            let client = GitHubClient::new(&client_config)?;
            let name = repos.add(&client, &repo).await?;
            println!("added {name}");
        }
        Command::Remove { repo } => {
            let removed = repos.remove(&repo)?;
            if removed == 0 {
                println!("{repo} is not tracked");
            } else {
                println!("removed {repo}");
            }
        }
        Command::Token { action } => match action {
            TokenAction::Set { value } => {
                if tokens.save(&value, &mut client_config)? {
                    println!("token saved");
                } else {
                    return Err(error::TrackerError::Validation("token is empty".into()));
                }
            }
            TokenAction::Clear => {
                tokens.clear(&mut client_config)?;
                println!("token cleared");
            }
        },
    }
    Ok(())
}

async fn run_tui(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(&config);

    // Install panic hook before entering raw mode so terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let input_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            let app_event = match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                Event::Resize(_, _) => Some(AppEvent::Resize),
                _ => None,
            };
            if let Some(e) = app_event {
                if input_tx.send(e).is_err() {
                    break;
                }
            }
        }
    });

    loop {
        terminal.draw(|f| app.render(f))?;

        let first = match rx.recv().await {
            Some(e) => e,
            None => break,
        };

        process_event(&mut app, first, &tx);
        while let Ok(pending) = rx.try_recv() {
            process_event(&mut app, pending, &tx);
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn process_event(app: &mut App, event: AppEvent, tx: &mpsc::UnboundedSender<AppEvent>) {
    if let Some(request) = app.handle_event(event) {
        let tx = tx.clone();
        tokio::spawn(async move {
            // the receiver is gone once the UI has shut down; the result is dropped then
            let _ = tx.send(request.run().await);
        });
    }
}
