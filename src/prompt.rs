//! Interactive collection of a search request from stdin.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::filters::FilterTable;
use crate::models::SearchRequest;

/// Value of a decimal digit in ASCII, Persian (U+06F0..) or Arabic-Indic
/// (U+0660..) script.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        _ => c.to_digit(10),
    }
}

/// Parses a non-empty run of decimal digits in any supported script.
fn parse_number(token: &str) -> Option<u64> {
    if token.is_empty() {
        return None;
    }
    token.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(10)?.checked_add(u64::from(digit_value(c)?))
    })
}

/// A page count only counts when the answer is all digits and non-zero.
pub fn parse_pages(answer: &str) -> Option<u32> {
    parse_number(answer.trim())
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
}

/// Splits a whitespace-separated list of 1-based menu indices.
pub fn parse_indices(answer: &str) -> Vec<usize> {
    answer
        .split_whitespace()
        .filter_map(|token| {
            let idx = parse_number(token).and_then(|n| usize::try_from(n).ok());
            if idx.is_none() {
                warn!("ignoring filter choice {token:?}, not a number");
            }
            idx
        })
        .collect()
}

/// Two-column numbered list of the filters, as shown before asking.
pub fn filter_menu(table: &FilterTable) -> String {
    let entries: Vec<String> = table
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {}", i + 1, f.label))
        .collect();
    let half = entries.len().div_ceil(2);
    let mut menu = String::new();
    for row in 0..half {
        let left = &entries[row];
        match entries.get(row + half) {
            Some(right) => menu.push_str(&format!("    {left:<40}{right}\n")),
            None => menu.push_str(&format!("    {left}\n")),
        }
    }
    menu
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    table: &FilterTable,
) -> io::Result<SearchRequest> {
    let subject = ask(input, output, "Enter the subject to search for: ")?;
    let pages = ask(input, output, "Enter the number of pages to scrape (default is 3): ")?;
    writeln!(output, "Some filters can be applied to the search results:")?;
    write!(output, "{}", filter_menu(table))?;
    let choices = ask(input, output, "Enter the filters to apply (no filters by default): ")?;
    writeln!(output)?;

    Ok(SearchRequest {
        subject: subject.trim().to_string(),
        pages_limit: parse_pages(&pages),
        filters: table.names_by_indices(&parse_indices(&choices)),
    })
}
