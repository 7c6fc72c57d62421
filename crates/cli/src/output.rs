//! Terminal output. Results go to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

use storedesk_client::{Notice, NoticeLevel};

/// Print one line of command output.
pub fn line(text: impl AsRef<str>) {
    println!("{}", text.as_ref());
}

/// Print a header followed by left-aligned rows.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", render_row(headers.iter().copied(), &widths));
    for row in rows {
        println!("{}", render_row(row.iter().map(String::as_str), &widths));
    }
    if rows.is_empty() {
        println!("(none)");
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Print the notices raised while the command ran.
pub fn notices(notices: &[Notice]) {
    for notice in notices {
        let marker = match notice.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Info => "•",
            NoticeLevel::Error => "✘",
        };
        println!("{marker} {}", notice.message);
    }
}
