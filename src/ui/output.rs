use crate::models::{Message, Portal, Role, SessionRecord, DAY_CEILING};
use colored::*;

/// Display one transcript message
pub fn display_message(message: &Message) {
    match (message.role, message.error) {
        (_, true) => println!("{} {}", "!".red().bold(), message.text.red()),
        (Role::User, false) => println!("{} {}", ">".cyan().bold(), message.text.bold()),
        (Role::Bot, false) => {
            println!("{}", message.text);
            println!();
        }
    }
}

/// Display every message from `start` onwards
pub fn display_messages_from(messages: &[Message], start: usize) {
    for message in messages.iter().skip(start) {
        display_message(message);
    }
}

pub fn display_portal_header(portal: &Portal, record: Option<&SessionRecord>) {
    let day = record.map(|r| r.day).unwrap_or(1);
    println!(
        "{} {}",
        format!("── {} ", portal.title).cyan().bold(),
        format!("(day {}/{})", day, DAY_CEILING).dimmed()
    );
    if let Some(notes) = record.and_then(|r| r.notes.as_deref()) {
        println!("{}", format!("notes: {}", notes).dimmed());
    }
}

/// Display the portal listing with saved progress
pub fn display_portals<'a, I>(portals: I, active: Option<&str>)
where
    I: IntoIterator<Item = (&'a Portal, Option<SessionRecord>)>,
{
    for (portal, record) in portals {
        let marker = if active == Some(portal.id.as_str()) {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let progress = match &record {
            Some(r) => format!("day {}/{}", r.day, DAY_CEILING),
            None => "not started".to_string(),
        };
        println!(
            "{} {:<14} {:<20} {}",
            marker,
            portal.id.cyan(),
            portal.title,
            progress.dimmed()
        );
        if let Some(description) = &portal.description {
            println!("  {}", description.dimmed());
        }
    }
}

pub fn display_info(text: &str) {
    println!("{}", text.green());
}

pub fn display_error(text: &str) {
    eprintln!("{} {}", "Error:".red(), text);
}
