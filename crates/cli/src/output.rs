//! Plain-text output on stdout.

use std::io::{self, Write};

use pustakalaya_core::{Book, Donor, LibraryStats, Librarian, Transfer};

/// A record that can be printed as one table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Book {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "AUTHOR", "GENRE", "COUNT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author.clone(),
            self.category.clone(),
            self.copy_count.to_string(),
        ]
    }
}

impl TableRow for Donor {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "PHONE", "DONATIONS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.phone.clone(),
            self.total_donation_count.to_string(),
        ]
    }
}

impl TableRow for Librarian {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "PHONE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
        ]
    }
}

impl TableRow for Transfer {
    const HEADERS: &'static [&'static str] = &["ID", "BOOK", "COUNT", "DESTINATION", "DATE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.book_title
                .clone()
                .unwrap_or_else(|| format!("#{}", self.book_id)),
            self.copies_moved.to_string(),
            self.destination.clone(),
            self.created_at.clone(),
        ]
    }
}

/// Print one line.
///
/// # Errors
///
/// Returns an I/O error if stdout is closed.
pub fn line(text: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{text}")
}

/// Print rows under their headers, columns padded to the widest cell.
///
/// # Errors
///
/// Returns an I/O error if stdout is closed.
pub fn table<R: TableRow>(rows: &[&R]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_table(&mut out, rows)
}

fn write_table<R: TableRow>(out: &mut impl Write, rows: &[&R]) -> io::Result<()> {
    let cells: Vec<Vec<String>> = rows.iter().map(|row| row.cells()).collect();
    let widths: Vec<usize> = R::HEADERS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<String> = R::HEADERS.iter().map(ToString::to_string).collect();
    write_row(out, &headers, &widths)?;
    for row in &cells {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}

/// Print the four counters, one per line.
///
/// # Errors
///
/// Returns an I/O error if stdout is closed.
pub fn stats(stats: &LibraryStats) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Total Books         {}", stats.total_books)?;
    writeln!(out, "Total Donors        {}", stats.total_donors)?;
    writeln!(out, "Librarians          {}", stats.total_librarians)?;
    writeln!(out, "Donations Recorded  {}", stats.total_donations)
}
