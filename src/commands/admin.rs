//! Content administration handlers
//!
//! CRUD over quizzes, questions, topics, and users, plus the quiz
//! lifecycle transitions (publish, archive, reactivate). Destructive
//! operations prompt for confirmation unless `--yes` was passed.
//!
//! List output is a table by default and pretty JSON with `--json`.
//! Lifecycle transitions patch the already-listed rows through
//! [`QuizListCache`] instead of refetching the whole list.

use std::sync::Arc;

use colored::Colorize;
use prettytable::{row, Table};
use uuid::Uuid;

use crate::api::types::{
    AnswerOption, QuestionDraft, Quiz, QuizDraft, TopicDraft, User, UserDraft,
};
use crate::api::{AdminApi, AuthApi, QuizListCache};
use crate::auth::AuthGuard;
use crate::cli::{AdminCommand, QuestionCommand, QuizCommand, TopicCommand, UserCommand};
use crate::config::Config;
use crate::error::{QuizmateError, Result};
use crate::validate::{validate_email, validate_name, validate_password};

/// Entry point for `quizmate admin`.
///
/// Verifies the caller is signed in with the admin role before touching any
/// endpoint.
pub async fn run_admin(config: Config, command: AdminCommand) -> Result<()> {
    let (credentials, api) = super::build_api(&config)?;
    let guard = AuthGuard::new(AuthApi::new(api.clone()), Arc::clone(&credentials));
    let user = guard.ensure_authenticated().await?;
    if !user.is_admin() {
        return Err(QuizmateError::Authentication(
            "admin role required for this command".to_string(),
        )
        .into());
    }

    let admin = AdminApi::new(api);
    match command {
        AdminCommand::Quiz { command } => handle_quiz(&admin, command).await,
        AdminCommand::Question { command } => handle_question(&admin, command).await,
        AdminCommand::Topic { command } => handle_topic(&admin, command).await,
        AdminCommand::User { command } => handle_user(&admin, command).await,
        AdminCommand::Roles { json } => {
            let roles = admin.list_roles().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roles)?);
            } else {
                let mut table = Table::new();
                table.add_row(row!["Id", "Name"]);
                for role in &roles {
                    table.add_row(row![role.id, role.name]);
                }
                table.printstd();
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

async fn handle_quiz(admin: &AdminApi, command: QuizCommand) -> Result<()> {
    match command {
        QuizCommand::List { json } => {
            let quizzes = admin.list_quizzes().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quizzes)?);
            } else {
                print_quiz_table(&quizzes);
            }
            Ok(())
        }
        QuizCommand::Show { id } => {
            let quiz = admin.get_quiz(&id).await?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
            Ok(())
        }
        QuizCommand::Create {
            title,
            description,
            topic,
        } => {
            let quiz = admin
                .create_quiz(&QuizDraft {
                    title,
                    description,
                    topic_id: topic,
                })
                .await?;
            println!(
                "{} Created quiz {} ({})",
                "✓".green(),
                quiz.title.bold(),
                quiz.id
            );
            println!("  Status: {} — publish it to make it playable", quiz.status);
            Ok(())
        }
        QuizCommand::Update {
            id,
            title,
            description,
        } => {
            let existing = admin.get_quiz(&id).await?;
            let quiz = admin
                .update_quiz(
                    &id,
                    &QuizDraft {
                        title: title.unwrap_or(existing.title),
                        description: description.or(existing.description),
                        topic_id: existing.topic_id,
                    },
                )
                .await?;
            println!("{} Updated quiz {}", "✓".green(), quiz.id);
            Ok(())
        }
        QuizCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete quiz {}?", id), yes)? {
                println!("Aborted");
                return Ok(());
            }
            admin.delete_quiz(&id).await?;
            println!("{} Deleted quiz {}", "✓".green(), id);
            Ok(())
        }
        QuizCommand::Publish { id } => transition_quiz(admin, &id, QuizTransition::Publish).await,
        QuizCommand::Archive { id } => transition_quiz(admin, &id, QuizTransition::Archive).await,
        QuizCommand::Reactivate { id } => {
            transition_quiz(admin, &id, QuizTransition::Reactivate).await
        }
    }
}

/// Quiz lifecycle transitions the backend exposes as dedicated endpoints.
#[derive(Debug, Clone, Copy)]
enum QuizTransition {
    Publish,
    Archive,
    Reactivate,
}

/// Run a lifecycle transition and patch the listed rows in place.
///
/// The list is fetched once up front; the transition response replaces the
/// affected row instead of triggering a second list request.
async fn transition_quiz(admin: &AdminApi, id: &str, transition: QuizTransition) -> Result<()> {
    let mut cache = QuizListCache::new(admin.list_quizzes().await?);
    let (updated, verb) = match transition {
        QuizTransition::Publish => (admin.publish_quiz(id).await?, "published"),
        QuizTransition::Archive => (admin.archive_quiz(id).await?, "archived"),
        QuizTransition::Reactivate => (admin.reactivate_quiz(id).await?, "reactivated"),
    };
    println!(
        "{} Quiz {} {} (now {})",
        "✓".green(),
        updated.id,
        verb,
        updated.status
    );
    cache.apply_update(updated);
    print_quiz_table(cache.rows());
    Ok(())
}

fn print_quiz_table(quizzes: &[Quiz]) {
    let mut table = Table::new();
    table.add_row(row!["Id", "Title", "Status", "Topic", "Questions"]);
    for quiz in quizzes {
        table.add_row(row![
            quiz.id,
            quiz.title,
            quiz.status,
            quiz.topic_id.as_deref().unwrap_or("-"),
            quiz.question_count
        ]);
    }
    table.printstd();
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

async fn handle_question(admin: &AdminApi, command: QuestionCommand) -> Result<()> {
    match command {
        QuestionCommand::List { quiz, json } => {
            let questions: Vec<_> = admin
                .list_questions()
                .await?
                .into_iter()
                .filter(|q| q.quiz_id.as_deref() == Some(quiz.as_str()))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else {
                let mut table = Table::new();
                table.add_row(row!["Id", "Prompt", "Options"]);
                for question in &questions {
                    table.add_row(row![question.id, question.prompt, question.options.len()]);
                }
                table.printstd();
            }
            Ok(())
        }
        QuestionCommand::Create { quiz, text, option } => {
            if option.len() < 2 {
                return Err(QuizmateError::Validation(
                    "a question needs at least two options".to_string(),
                )
                .into());
            }
            let options: Vec<AnswerOption> = option
                .into_iter()
                .map(|text| AnswerOption {
                    id: Uuid::new_v4().to_string(),
                    text,
                })
                .collect();
            // The first option given on the command line is the correct one.
            let correct_option_id = options[0].id.clone();
            let question = admin
                .create_question(&QuestionDraft {
                    prompt: text,
                    options,
                    correct_option_id,
                    quiz_id: Some(quiz),
                })
                .await?;
            println!("{} Created question {}", "✓".green(), question.id);
            Ok(())
        }
        QuestionCommand::Update { id, text } => {
            let existing = admin.get_question(&id).await?;
            let question = admin
                .update_question(
                    &id,
                    &QuestionDraft {
                        prompt: text.unwrap_or(existing.prompt),
                        options: existing.options,
                        correct_option_id: existing.correct_option_id,
                        quiz_id: existing.quiz_id,
                    },
                )
                .await?;
            println!("{} Updated question {}", "✓".green(), question.id);
            Ok(())
        }
        QuestionCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete question {}?", id), yes)? {
                println!("Aborted");
                return Ok(());
            }
            admin.delete_question(&id).await?;
            println!("{} Deleted question {}", "✓".green(), id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

async fn handle_topic(admin: &AdminApi, command: TopicCommand) -> Result<()> {
    match command {
        TopicCommand::List { json } => {
            let topics = admin.list_topics().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else {
                let mut table = Table::new();
                table.add_row(row!["Id", "Name", "Description"]);
                for topic in &topics {
                    table.add_row(row![
                        topic.id,
                        topic.name,
                        topic.description.as_deref().unwrap_or("-")
                    ]);
                }
                table.printstd();
            }
            Ok(())
        }
        TopicCommand::Create { name, description } => {
            let topic = admin.create_topic(&TopicDraft { name, description }).await?;
            println!(
                "{} Created topic {} ({})",
                "✓".green(),
                topic.name.bold(),
                topic.id
            );
            Ok(())
        }
        TopicCommand::Update {
            id,
            name,
            description,
        } => {
            let existing = admin.get_topic(&id).await?;
            let topic = admin
                .update_topic(
                    &id,
                    &TopicDraft {
                        name: name.unwrap_or(existing.name),
                        description: description.or(existing.description),
                    },
                )
                .await?;
            println!("{} Updated topic {}", "✓".green(), topic.id);
            Ok(())
        }
        TopicCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete topic {}?", id), yes)? {
                println!("Aborted");
                return Ok(());
            }
            admin.delete_topic(&id).await?;
            println!("{} Deleted topic {}", "✓".green(), id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn handle_user(admin: &AdminApi, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List { json } => {
            let users = admin.list_users().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else {
                print_user_table(&users);
            }
            Ok(())
        }
        UserCommand::Create {
            email,
            name,
            password,
            role,
        } => {
            if let Some(message) = validate_email(&email)
                .or_else(|| validate_name(&name))
                .or_else(|| validate_password(&password))
            {
                return Err(QuizmateError::Validation(message).into());
            }
            let user = admin
                .create_user(&UserDraft {
                    email,
                    display_name: name,
                    password: Some(password),
                    roles: vec![role],
                })
                .await?;
            println!(
                "{} Created user {} ({})",
                "✓".green(),
                user.display_name.bold(),
                user.id
            );
            Ok(())
        }
        UserCommand::Update { id, name, role } => {
            if let Some(name) = &name {
                if let Some(message) = validate_name(name) {
                    return Err(QuizmateError::Validation(message).into());
                }
            }
            let existing = admin.get_user(&id).await?;
            let user = admin
                .update_user(
                    &id,
                    &UserDraft {
                        email: existing.email,
                        display_name: name.unwrap_or(existing.display_name),
                        password: None,
                        roles: role.map(|r| vec![r]).unwrap_or(existing.roles),
                    },
                )
                .await?;
            println!("{} Updated user {}", "✓".green(), user.id);
            Ok(())
        }
        UserCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete user {}?", id), yes)? {
                println!("Aborted");
                return Ok(());
            }
            admin.delete_user(&id).await?;
            println!("{} Deleted user {}", "✓".green(), id);
            Ok(())
        }
    }
}

fn print_user_table(users: &[User]) {
    let mut table = Table::new();
    table.add_row(row!["Id", "Name", "Email", "Roles"]);
    for user in users {
        table.add_row(row![user.id, user.display_name, user.email, user.roles.join(", ")]);
    }
    table.printstd();
}
