use std::io::{self, Write};

use chrono::Utc;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::api;
use crate::draft::{self, TaskDraft};
use crate::models::resolve_id;
use crate::schedule::{deadline_status, DeadlineStatus};
use crate::session::Session;
use crate::storage;
use crate::timeutil::format_unix_time;
use crate::toast::ToastType;

const NOT_SIGNED_IN: &str = "Not signed in. Run `taskhub login <username>` first.";

/// Signs in and stores the API key for later commands.
///
/// Prompts for the password on stdin when it is not passed as an option.
pub fn cmd_login(username: String, password: Option<String>) {
    let password = match password {
        Some(p) => p,
        None => {
            print!("Password: ");
            if io::stdout().flush().is_err() {
                return;
            }
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                eprintln!("Failed to read password.");
                return;
            }
            input.trim().to_string()
        }
    };

    let mut session = Session::new();
    let key = match api::login(&session.client, &session.base_url, &username, &password) {
        Ok(key) => key,
        Err(err) => {
            eprintln!("Sign in failed: {}", err.message());
            return;
        }
    };
    if let Err(err) = storage::save_api_key(&key) {
        eprintln!("Failed to store the API key: {}", err);
        return;
    }
    match session.authorize() {
        Ok(true) => {
            let name = session
                .profile
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or(username);
            println!("Signed in as {}.", name);
        }
        Ok(false) => println!("Signed in."),
        Err(err) => eprintln!("Signed in, but loading session data failed: {}", err.message()),
    }
}

/// Signs out and clears the stored API key with all cached session data.
pub fn cmd_logout() {
    let mut session = Session::new();
    if let Err(err) = session.sign_out() {
        eprintln!("Failed to clear the stored API key: {}", err);
    } else {
        println!("Signed out.");
    }
}

/// Lists tasks in a formatted table.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(all: bool) {
    let mut session = Session::new();
    match session.authorize() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("{}", NOT_SIGNED_IN);
            return;
        }
        Err(err) => {
            eprintln!("Failed to load tasks: {}", err.message());
            return;
        }
    }

    let mut tasks = session.tasks.clone();
    if !all {
        tasks.retain(|t| !t.completed);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Labels").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let assignee = session
            .users
            .iter()
            .find(|u| u.id == t.assigned_user)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let deadline = if t.deadline > 0 {
            format_unix_time(t.deadline, draft::deadline_offset())
        } else {
            String::new()
        };

        let overdue = deadline_status(t.deadline, now) == DeadlineStatus::Overdue;
        let mut labels = Vec::new();
        if t.recurring_interval.is_some() {
            labels.push("Recurring");
        }
        if overdue {
            labels.push("Overdue");
        }

        let status = if t.completed { "Done" } else { "Open" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.description),
            Cell::new(assignee),
            Cell::new(deadline).fg(if overdue && !t.completed { Color::Red } else { Color::Reset }),
            Cell::new(labels.join(" ")),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Creates a new task from command-line entries.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    description: String,
    notes: Option<String>,
    date: Option<String>,
    time: Option<String>,
    recur: Option<String>,
    group: Option<String>,
    user: Option<String>,
) {
    let mut session = Session::new();
    match session.authorize() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("{}", NOT_SIGNED_IN);
            return;
        }
        Err(err) => {
            eprintln!("Failed to load session data: {}", err.message());
            return;
        }
    }
    let Some(profile) = session.profile.clone() else {
        eprintln!("Profile not loaded; try again.");
        return;
    };

    let assigned_group = match group {
        Some(entry) => match resolve_id(&session.groups, &entry) {
            Some(id) => Some(id),
            None => {
                eprintln!("Unknown group '{}'.", entry);
                return;
            }
        },
        None => None,
    };
    let assigned_user = match user {
        Some(entry) => match resolve_id(&session.users, &entry) {
            Some(id) => Some(id),
            None => {
                eprintln!("Unknown user '{}'.", entry);
                return;
            }
        },
        None => None,
    };

    let task_draft = TaskDraft {
        description,
        notes: notes.unwrap_or_default(),
        date: date.unwrap_or_default(),
        time: time.unwrap_or_default(),
        recurring: recur.unwrap_or_default(),
        assigned_group,
        assigned_user,
    };
    let new_task = match draft::encode(&task_draft, &profile) {
        Ok(task) => task,
        Err(err) => {
            print_notice(err.notice());
            return;
        }
    };

    print_outcome(session.create_task(&new_task));
}

/// Marks a task as complete, if it is assigned to the signed-in user.
pub fn cmd_complete(id: u64) {
    run_mutation(id, "complete");
}

/// Deletes a task, if it is assigned to the signed-in user.
pub fn cmd_delete(id: u64) {
    run_mutation(id, "delete");
}

fn run_mutation(id: u64, action: &str) {
    let mut session = Session::new();
    match session.authorize() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("{}", NOT_SIGNED_IN);
            return;
        }
        Err(err) => {
            eprintln!("Failed to load session data: {}", err.message());
            return;
        }
    }

    let Some(task) = session.tasks.iter().find(|t| t.id == id).cloned() else {
        eprintln!("Task {} not found.", id);
        return;
    };
    if !session.can_modify(&task) {
        eprintln!("Task {} is assigned to another user.", id);
        return;
    }

    let outcome = match action {
        "complete" => session.complete_task(id),
        _ => session.delete_task(id),
    };
    print_outcome(outcome);
}

/// Shows the signed-in user's profile.
pub fn cmd_whoami() {
    let mut session = Session::new();
    match session.authorize() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("{}", NOT_SIGNED_IN);
            return;
        }
        Err(err) => {
            eprintln!("Failed to load profile: {}", err.message());
            return;
        }
    }
    let Some(profile) = session.profile else {
        eprintln!("Profile not loaded; try again.");
        return;
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Username", "Name", "Groups"]);
    table.add_row(vec![
        profile.id.to_string(),
        profile.username,
        profile.name,
        profile.groups.join(", "),
    ]);
    println!("{table}");
}

fn print_notice(notice: (ToastType, String)) {
    match notice {
        (ToastType::Error, message) => eprintln!("{}", message),
        (_, message) => println!("{}", message),
    }
}

fn print_outcome(outcome: Option<(ToastType, String)>) {
    match outcome {
        Some((ToastType::Error, message)) => eprintln!("{}", message),
        Some((_, message)) => println!("{}", message),
        None => eprintln!("{}", NOT_SIGNED_IN),
    }
}
