//! Table / JSON rendering.

use friendframe_types::{CurrentUser, Frame, Group, PhotoAlbum};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

impl Format {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Left-aligned columns, widths taken from the widest cell.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}

pub fn groups(groups: &[Group]) -> String {
    let rows = groups
        .iter()
        .map(|g| {
            vec![
                g.id.to_string(),
                g.name.clone(),
                g.members_count.to_string(),
                g.frames_count.to_string(),
                if g.is_owner { "yes".into() } else { "no".into() },
            ]
        })
        .collect();
    table(&["ID", "NAME", "MEMBERS", "FRAMES", "OWNER"], rows)
}

pub fn frames(frames: &[Frame]) -> String {
    let rows = frames
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.name.clone().unwrap_or_default(),
                format!("{}%", f.battery_level),
                f.status.to_string(),
                f.group_id.as_ref().map(|g| g.to_string()).unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    table(&["ID", "NAME", "BATTERY", "STATUS", "GROUP"], rows)
}

pub fn albums(albums: &[PhotoAlbum]) -> String {
    let rows = albums
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.name.clone(),
                a.source.to_string(),
                a.photo_count.to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "SOURCE", "PHOTOS"], rows)
}

pub fn user(me: &CurrentUser) -> String {
    let mut lines = vec![format!("User:  {}", me.user_id)];
    if let Some(name) = &me.name {
        lines.push(format!("Name:  {}", name));
    }
    if let Some(email) = &me.email {
        lines.push(format!("Email: {}", email));
    }
    lines.join("\n")
}
