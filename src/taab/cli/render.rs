//! Terminal output: the entry table, config listing and status messages.
//!
//! Rendering functions return strings so they can be checked without a
//! terminal; only `print_messages` writes directly.

use super::styles::TABLE_STYLES;
use chrono::{DateTime, Utc};
use colored::Colorize;
use taab::api::{CmdMessage, MessageLevel};
use taab::config::TaabConfig;
use taab::index::IndexedEntry;
use taab::model::{Entry, SchemaVariant};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const INDEX_WIDTH: usize = 5;
const CARD_WIDTH: usize = 16;
const CATEGORY_WIDTH: usize = 16;
const AFFILIATION_WIDTH: usize = 20;
const NAME_WIDTH: usize = 20;
const PHONE_WIDTH: usize = 14;
const TIME_WIDTH: usize = 16;
const IMAGE_MARKER: &str = "▣";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Saved { .. } => println!("{}", message.content.green().dimmed()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn render_entry_table(rows: &[IndexedEntry], variant: SchemaVariant) -> String {
    if rows.is_empty() {
        return "No entries found.\n".to_string();
    }

    let affiliation = variant.affiliation().label();
    let mut out = String::new();
    let header = format!(
        "{}{}{}{}{}{}{}",
        pad("#", INDEX_WIDTH),
        pad("Card ID", CARD_WIDTH),
        pad("Category", CATEGORY_WIDTH),
        pad(affiliation, AFFILIATION_WIDTH),
        pad("Name", NAME_WIDTH),
        pad("Phone", PHONE_WIDTH),
        "Saved"
    );
    out.push_str(&format!("{}\n", TABLE_STYLES.header.apply_to(header.trim_end())));

    for row in rows {
        out.push_str(&render_row(row, variant));
        out.push('\n');
    }
    out
}

fn render_row(row: &IndexedEntry, variant: SchemaVariant) -> String {
    let entry = &row.entry;
    let affiliation = entry.text(variant.affiliation());
    let image = if entry.image.is_empty() { "" } else { IMAGE_MARKER };

    format!(
        "{}{}{}{}{}{}{}{}",
        TABLE_STYLES.index.apply_to(pad(&format!("{}.", row.index), INDEX_WIDTH)),
        TABLE_STYLES.card.apply_to(pad(&entry.card_id, CARD_WIDTH)),
        pad(entry.category.label(), CATEGORY_WIDTH),
        pad(&affiliation, AFFILIATION_WIDTH),
        pad(&entry.name, NAME_WIDTH),
        pad(&entry.phone, PHONE_WIDTH),
        TABLE_STYLES.time.apply_to(format_time_ago(entry.timestamp)),
        image
    )
}

/// One entry, every non-empty field on its own line.
pub(super) fn render_entry_detail(row: &IndexedEntry, variant: SchemaVariant) -> String {
    let entry: &Entry = &row.entry;
    let mut out = format!(
        "{} {}\n",
        TABLE_STYLES.editing.apply_to(format!("Entry {}", row.index)),
        TABLE_STYLES.card.apply_to(&entry.card_id)
    );
    for field in variant.visible_fields(entry.category) {
        let value = match field {
            taab::model::Field::Image if !entry.image.is_empty() => "(attached)".to_string(),
            _ => entry.text(field),
        };
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!("  {:<20} {}\n", field.label(), value));
    }
    out
}

pub(super) fn render_config(config: &TaabConfig) -> String {
    let mut out = String::new();
    for key in TaabConfig::KEYS {
        let value = config.get(key).unwrap_or_default();
        out.push_str(&format!("{} = {}\n", key, value));
    }
    out
}

/// Pads (or truncates with an ellipsis) to an exact display width, plus one
/// space of gutter.
fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width.saturating_sub(1));
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:<width$}", time_str, width = TIME_WIDTH)
}
