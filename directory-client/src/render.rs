//! Plain-text rendering of the query state.
//!
//! Rendering is a pure function of state; it owns no behavior.

use directory_core::{Company, Facets, Pagination, Stats};
use std::fmt::Write;

use crate::state_machine::{FeedStatus, QueryState, ViewMode};

const TABLE_COLUMNS: [&str; 7] = [
    "Name",
    "Industry",
    "Location",
    "Employees",
    "Founded",
    "Revenue",
    "CEO",
];

fn table_row(c: &Company) -> [String; 7] {
    [
        c.name.clone(),
        c.industry.clone(),
        c.location.clone(),
        c.employees.to_string(),
        c.founded.to_string(),
        c.revenue.clone(),
        c.ceo.clone(),
    ]
}

pub fn render_table(companies: &[Company]) -> String {
    if companies.is_empty() {
        return "No companies found.\n".to_string();
    }

    let rows: Vec<[String; 7]> = companies.iter().map(table_row).collect();
    let mut widths = TABLE_COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, TABLE_COLUMNS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

pub fn render_cards(companies: &[Company]) -> String {
    if companies.is_empty() {
        return "No companies found.\n".to_string();
    }

    let mut out = String::new();
    for c in companies {
        let _ = writeln!(out, "{} [{}]", c.name, c.industry);
        let _ = writeln!(out, "  {}", c.description);
        let _ = writeln!(
            out,
            "  {} | {} employees | founded {}",
            c.location, c.employees, c.founded
        );
        let _ = writeln!(out, "  Revenue {} | CEO {}", c.revenue, c.ceo);
        out.push('\n');
    }
    out
}

/// "Showing 11 - 20 of 42 companies (page 2 of 5)"
pub fn render_pagination(p: &Pagination) -> String {
    match p.item_range() {
        Some((start, end)) => format!(
            "Showing {} - {} of {} companies (page {} of {})",
            start, end, p.total_companies, p.current_page, p.total_pages
        ),
        None => format!(
            "No companies on page {} ({} matched)",
            p.current_page, p.total_companies
        ),
    }
}

pub fn render_stats(stats: &Stats) -> String {
    format!(
        "Companies: {} | Industries: {} | Avg. employees: {}",
        stats.total_companies, stats.industries_count, stats.avg_employees
    )
}

pub fn render_facets(facets: &Facets) -> String {
    format!(
        "Industries: {}\nLocations: {}",
        facets.industries.join(", "),
        facets.locations.join(", ")
    )
}

/// Full screen for the interactive browser.
pub fn render_state(state: &QueryState) -> String {
    let mut out = String::new();

    if state.stats.status != FeedStatus::Idle || state.stats.data.total_companies > 0 {
        let _ = writeln!(out, "{}", render_stats(&state.stats.data));
    }

    let p = &state.params;
    let _ = writeln!(
        out,
        "search={:?} industry={} location={} sort={} {} limit={} view={}",
        p.search, p.industry, p.location, p.sort_by, p.sort_order, p.limit, state.view_mode
    );

    for (feed, error) in state.errors() {
        let _ = writeln!(out, "Error ({}): {}", feed, error);
    }

    if state.companies.is_loading() {
        out.push_str("Loading...\n");
        return out;
    }

    let page = &state.companies.data;
    out.push('\n');
    out.push_str(&match state.view_mode {
        ViewMode::Table => render_table(&page.data),
        ViewMode::Card => render_cards(&page.data),
    });
    if !page.data.is_empty() {
        let _ = writeln!(out, "{}", render_pagination(&page.pagination));
    }
    out
}
