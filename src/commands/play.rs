//! Interactive session play handler
//!
//! Starts or joins a session, opens the push channel, and drives the
//! terminal through the lobby, countdown, and question loop. Rendering
//! always goes through [`SessionSynchronizer`] views; the handler never
//! holds session state of its own.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use prettytable::{row, Table};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::watch;

use crate::api::types::{AnswerSubmission, GameMode, Question, Session, SessionSummary, User};
use crate::api::{ApiClient, AuthApi, GameApi};
use crate::auth::AuthGuard;
use crate::config::Config;
use crate::error::{QuizmateError, Result};
use crate::push::ws::WsChannel;
use crate::sync::{PagePhase, SessionSynchronizer, SessionView};

/// Start a new session from a topic or a quiz and play it.
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `topic` - Start with random questions from this topic
/// * `quiz` - Start from this curated quiz (mutually exclusive with `topic`)
/// * `mode` - Game mode name (solo, competitive, collaborative)
pub async fn run_play(
    config: Config,
    topic: Option<String>,
    quiz: Option<String>,
    mode: String,
) -> Result<()> {
    let mode = GameMode::parse_str(&mode)?;
    let (credentials, api) = super::build_api(&config)?;
    let guard = AuthGuard::new(AuthApi::new(api.clone()), Arc::clone(&credentials));
    let user = guard.ensure_authenticated().await?;

    let game = GameApi::new(api.clone());
    let session = match (topic, quiz) {
        (Some(topic_id), None) => game.start_topic_session(&topic_id, mode).await?,
        (None, Some(quiz_id)) => game.start_quiz_session(&quiz_id, mode).await?,
        _ => {
            return Err(QuizmateError::Validation(
                "pass exactly one of --topic or --quiz".to_string(),
            )
            .into())
        }
    };

    println!(
        "Started session {} — share this id so others can `quizmate join {}`",
        session.id.bold(),
        session.id
    );
    play_session(&config, &api, game, &user, session).await
}

/// Join an existing session by id and play it.
pub async fn run_join(config: Config, session_id: String) -> Result<()> {
    let (credentials, api) = super::build_api(&config)?;
    let guard = AuthGuard::new(AuthApi::new(api.clone()), Arc::clone(&credentials));
    let user = guard.ensure_authenticated().await?;

    let game = GameApi::new(api.clone());
    let session = game.join_session(&session_id).await?;
    println!("Joined session {}", session.id.bold());
    play_session(&config, &api, game, &user, session).await
}

/// Drive one session from lobby to summary.
///
/// Opens the push channel, starts the synchronizer, and loops on rendered
/// views until the session completes or the user quits. The synchronizer is
/// closed on every exit path.
async fn play_session(
    config: &Config,
    api: &ApiClient,
    game: GameApi,
    user: &User,
    session: Session,
) -> Result<()> {
    let events_url = api.session_events_url(&session.id)?;
    let channel = Arc::new(WsChannel::open(events_url, &config.push));
    let sync = SessionSynchronizer::new(
        game.clone(),
        channel,
        &session.id,
        &user.id,
        Duration::from_millis(config.push.poll_interval_ms),
    );
    let mut views = sync.subscribe();
    Arc::clone(&sync).start();

    let outcome = run_phases(&game, &sync, &mut views, user).await;
    sync.close().await?;
    outcome
}

/// Loop over page phases until the session finishes or the user quits.
async fn run_phases(
    game: &GameApi,
    sync: &Arc<SessionSynchronizer>,
    views: &mut watch::Receiver<SessionView>,
    user: &User,
) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut last_countdown: Option<i64> = None;

    loop {
        let view = views.borrow_and_update().clone();
        match view.phase {
            PagePhase::Loading => {
                views.changed().await.map_err(|_| {
                    QuizmateError::Channel("session view closed while loading".to_string())
                })?;
            }
            PagePhase::Error { message } => {
                println!("{} {}", "✗".red(), message);
                let (line, editor) = readline(rl, "[r]etry or [q]uit> ").await?;
                rl = editor;
                match line {
                    Ok(input) if matches!(input.trim(), "r" | "R") => sync.retry().await,
                    _ => return Ok(()),
                }
            }
            PagePhase::Lobby => {
                if let Some(session) = &view.session {
                    render_lobby(session, &user.id);
                }
                let (line, editor) = readline(rl, "[r]eady / [p]ause / [q]uit> ").await?;
                rl = editor;
                match line {
                    Ok(input) => match input.trim() {
                        "r" | "R" => sync.toggle_ready().await?,
                        "p" | "P" => {
                            if let Err(err) = game.pause_countdown(sync.session_id()).await {
                                println!("{} {}", "✗".red(), err);
                            }
                        }
                        "q" | "Q" => return Ok(()),
                        _ => {}
                    },
                    Err(err) if is_interrupt(&err) => return Ok(()),
                    Err(err) => return Err(err.into()),
                }
            }
            PagePhase::Countdown { remaining } => {
                if remaining != last_countdown {
                    last_countdown = remaining;
                    match remaining {
                        Some(seconds) => {
                            println!("{}", format!("Starting in {}...", seconds).yellow())
                        }
                        None => println!("{}", "Starting soon...".yellow()),
                    }
                }
                views.changed().await.map_err(|_| {
                    QuizmateError::Channel("session view closed during countdown".to_string())
                })?;
            }
            PagePhase::Playing => {
                let session = view.session.ok_or_else(|| {
                    QuizmateError::Channel("playing phase without a session snapshot".to_string())
                })?;
                let _editor = run_questions(game, sync.session_id(), &session, rl).await?;
                let summary = game.complete_session(sync.session_id()).await?;
                render_summary(&summary, &user.id);
                return Ok(());
            }
            PagePhase::Complete => {
                let summary = game.complete_session(sync.session_id()).await?;
                render_summary(&summary, &user.id);
                return Ok(());
            }
        }
    }
}

/// Ask every remaining question in order and submit the answers.
async fn run_questions(
    game: &GameApi,
    session_id: &str,
    session: &Session,
    mut rl: DefaultEditor,
) -> Result<DefaultEditor> {
    for index in session.current_question..session.question_count {
        let question = game.question(session_id, index).await?;
        render_question(index, session.question_count, &question);

        let option_id = loop {
            let (line, editor) = readline(rl, "answer> ").await?;
            rl = editor;
            let input = line?;
            match input.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => {
                    break question.options[n - 1].id.clone();
                }
                _ => println!("Enter a number between 1 and {}", question.options.len()),
            }
        };

        let submission = AnswerSubmission {
            question_id: question.id.clone(),
            option_id,
        };
        let result = game.submit_answer(session_id, &submission).await?;
        if result.correct {
            println!(
                "{} Correct! +{} points (score {}, hearts {})",
                "✓".green(),
                result.points,
                result.score,
                result.hearts
            );
        } else {
            let reveal = result
                .correct_option_id
                .as_deref()
                .and_then(|id| question.options.iter().find(|o| o.id == id))
                .map(|o| o.text.as_str())
                .unwrap_or("unknown");
            println!(
                "{} Wrong — the answer was {} (score {}, hearts {})",
                "✗".red(),
                reveal.bold(),
                result.score,
                result.hearts
            );
        }
        if result.hearts == 0 {
            println!("{}", "Out of hearts!".red().bold());
            break;
        }
    }
    Ok(rl)
}

/// Run one blocking readline call off the async executor.
///
/// The editor moves into the blocking task and is handed back alongside the
/// read result.
async fn readline(
    mut rl: DefaultEditor,
    prompt: &str,
) -> Result<(std::result::Result<String, ReadlineError>, DefaultEditor)> {
    let prompt = prompt.to_string();
    let (line, editor) = tokio::task::spawn_blocking(move || {
        let line = rl.readline(&prompt);
        (line, rl)
    })
    .await
    .map_err(|e| QuizmateError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    Ok((line, editor))
}

fn is_interrupt(err: &ReadlineError) -> bool {
    matches!(err, ReadlineError::Interrupted | ReadlineError::Eof)
}

fn render_lobby(session: &Session, self_id: &str) {
    println!();
    println!(
        "Lobby — {} player(s), {} question(s)",
        session.players.len(),
        session.question_count
    );
    let mut table = Table::new();
    table.add_row(row!["Player", "Host", "Ready"]);
    for player in &session.players {
        let name = if player.id == self_id {
            format!("{} (you)", player.display_name)
        } else {
            player.display_name.clone()
        };
        let ready = if player.ready {
            "ready".green().to_string()
        } else {
            "waiting".normal().to_string()
        };
        table.add_row(row![name, if player.is_host { "yes" } else { "" }, ready]);
    }
    table.printstd();
}

fn render_question(index: usize, total: usize, question: &Question) {
    println!();
    println!(
        "{} {}",
        format!("Question {}/{}:", index + 1, total).bold(),
        question.prompt
    );
    for (n, option) in question.options.iter().enumerate() {
        println!("  {}. {}", n + 1, option.text);
    }
}

fn render_summary(summary: &SessionSummary, self_id: &str) {
    println!();
    println!("{}", "Session complete".bold());
    let mut table = Table::new();
    table.add_row(row!["Player", "Score", "Hearts"]);
    let mut players = summary.players.clone();
    players.sort_by(|a, b| b.score.cmp(&a.score));
    for player in &players {
        let mut name = player.display_name.clone();
        if player.id == self_id {
            name.push_str(" (you)");
        }
        if summary.winner_id.as_deref() == Some(player.id.as_str()) {
            name = format!("🏆 {}", name);
        }
        table.add_row(row![name, player.score, player.hearts]);
    }
    table.printstd();
}
