use colored::Colorize;
use firetruck::api::{CmdMessage, Listing, MessageLevel};
use firetruck::error::Result;
use firetruck::model::Contract;
use firetruck::render::render_value;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// One `id<TAB>label: value` line per row, in listing order.
pub(super) fn listing_lines(listing: &Listing) -> Vec<String> {
    listing
        .rows
        .iter()
        .map(|row| {
            let value = row
                .value
                .as_ref()
                .map(render_value)
                .unwrap_or_else(|| listing.missing.to_string());
            format!("{}\t{}: {}", row.id, listing.label, value)
        })
        .collect()
}

pub(super) fn contract_details(contract: &Contract, event_count: i64) -> Result<String> {
    let json = serde_json::to_string_pretty(contract)?;
    Ok(format!(
        "{}\n\nNumber of applied events:\n{}",
        json, event_count
    ))
}
