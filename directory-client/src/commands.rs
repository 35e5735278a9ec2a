//! Command parsing for the interactive browser.
use directory_core::{SortKey, SortOrder, ALL, LIMIT_PRESETS};
use std::fmt;

use crate::state_machine::{Event, ParamsPatch, QueryState};

/// A parsed browser command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Replace the search text. Empty clears it.
    Search(String),
    Industry(String),
    Location(String),
    /// Sort by a key. Without an explicit order, repeating the current key
    /// flips the order and a new key starts ascending.
    Sort(SortKey, Option<SortOrder>),
    Page(u64),
    Next,
    Prev,
    Limit(u64),
    /// Several parameters at once, e.g. `set search=ai page=2`.
    Set(ParamsPatch),
    Reset,
    View,
    Refresh,
    Clear,
    Filters,
    Help,
    Quit,
}

impl fmt::Display for BrowseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseCommand::Search(s) => write!(f, "search {}", s),
            BrowseCommand::Industry(s) => write!(f, "industry {}", s),
            BrowseCommand::Location(s) => write!(f, "location {}", s),
            BrowseCommand::Sort(key, order) => {
                write!(f, "sort {}", key)?;
                if let Some(order) = order {
                    write!(f, " {}", order)?;
                }
                Ok(())
            }
            BrowseCommand::Page(p) => write!(f, "page {}", p),
            BrowseCommand::Next => write!(f, "next"),
            BrowseCommand::Prev => write!(f, "prev"),
            BrowseCommand::Limit(l) => write!(f, "limit {}", l),
            BrowseCommand::Set(patch) => write!(f, "set {:?}", patch),
            BrowseCommand::Reset => write!(f, "reset"),
            BrowseCommand::View => write!(f, "view"),
            BrowseCommand::Refresh => write!(f, "refresh"),
            BrowseCommand::Clear => write!(f, "clear"),
            BrowseCommand::Filters => write!(f, "filters"),
            BrowseCommand::Help => write!(f, "help"),
            BrowseCommand::Quit => write!(f, "quit"),
        }
    }
}

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// Blank line
    Empty,
    /// First word is not a known command
    UnrecognizedCommand { attempted: String },
    /// Known command with an argument it cannot use
    InvalidArgument { command: String, message: String },
    Command(BrowseCommand),
}

pub const HELP: &str = "\
Commands:
  search [text]              match name, description or location
                             (empty clears)
  industry <name|all>        filter by industry
  location <text|all>        filter by location substring
  sort <key> [asc|desc]      keys: name, employees, founded, industry,
                             description, location, ceo, revenue
  page <n> | next | prev     move between pages
  limit <n>                  page size (presets: 5, 10, 20, 50)
  set key=value ...          change several parameters at once
  reset                      clear search, filters and sort
  view                       toggle table and card view
  refresh                    reload the current page and statistics
  clear                      dismiss error messages
  filters                    list available industries and locations
  help                       show this message
  quit                       leave the browser";

fn invalid(command: &str, message: impl Into<String>) -> ParseResult {
    ParseResult::InvalidArgument {
        command: command.to_string(),
        message: message.into(),
    }
}

fn parse_number(command: &str, arg: &str) -> Result<u64, ParseResult> {
    match arg.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(
            command,
            format!("expected a positive number, got {:?}", arg),
        )),
    }
}

fn parse_sort_key(command: &str, arg: &str) -> Result<SortKey, ParseResult> {
    arg.to_lowercase()
        .parse::<SortKey>()
        .map_err(|e| invalid(command, e.to_string()))
}

fn parse_sort_order(command: &str, arg: &str) -> Result<SortOrder, ParseResult> {
    match arg.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(invalid(
            command,
            format!("sort order must be asc or desc, got {:?}", arg),
        )),
    }
}

/// Parse `key=value` tokens into a patch. Values cannot contain whitespace.
fn parse_patch(args: &str) -> Result<ParamsPatch, ParseResult> {
    let mut patch = ParamsPatch::default();
    if args.is_empty() {
        return Err(invalid("set", "expected key=value pairs"));
    }

    for token in args.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            return Err(invalid("set", format!("expected key=value, got {:?}", token)));
        };
        match key.to_lowercase().as_str() {
            "page" => patch.page = Some(parse_number("set", value)?),
            "limit" => patch.limit = Some(parse_number("set", value)?),
            "search" => patch.search = Some(value.to_string()),
            "industry" => patch.industry = Some(value.to_string()),
            "location" => patch.location = Some(value.to_string()),
            "sortby" | "sort_by" | "sort" => patch.sort_by = Some(parse_sort_key("set", value)?),
            "sortorder" | "sort_order" | "order" => {
                patch.sort_order = Some(parse_sort_order("set", value)?)
            }
            other => return Err(invalid("set", format!("unknown parameter {:?}", other))),
        }
    }
    Ok(patch)
}

/// Filter arguments: blank means "all".
fn filter_value(arg: &str) -> String {
    if arg.is_empty() {
        ALL.to_string()
    } else {
        arg.to_string()
    }
}

/// Parse one line of browser input.
///
/// The first word selects the command (case-insensitive). The remainder of the
/// line, trimmed, is its argument, so filter values may contain spaces.
pub fn parse_command(line: &str) -> ParseResult {
    let line = line.trim();
    if line.is_empty() {
        return ParseResult::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let word = word.to_lowercase();

    let parsed = match word.as_str() {
        "search" | "s" => Ok(BrowseCommand::Search(rest.to_string())),
        "industry" => Ok(BrowseCommand::Industry(filter_value(rest))),
        "location" => Ok(BrowseCommand::Location(filter_value(rest))),
        "sort" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(key), order, None) => parse_sort_key("sort", key).and_then(|key| {
                    let order = order.map(|o| parse_sort_order("sort", o)).transpose()?;
                    Ok(BrowseCommand::Sort(key, order))
                }),
                _ => Err(invalid("sort", "usage: sort <key> [asc|desc]")),
            }
        }
        "page" | "p" => parse_number("page", rest).map(BrowseCommand::Page),
        "next" | "n" => Ok(BrowseCommand::Next),
        "prev" | "previous" => Ok(BrowseCommand::Prev),
        "limit" => parse_number("limit", rest).map(BrowseCommand::Limit),
        "set" => parse_patch(rest).map(BrowseCommand::Set),
        "reset" => Ok(BrowseCommand::Reset),
        "view" | "v" => Ok(BrowseCommand::View),
        "refresh" | "r" => Ok(BrowseCommand::Refresh),
        "clear" => Ok(BrowseCommand::Clear),
        "filters" => Ok(BrowseCommand::Filters),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        _ => {
            return ParseResult::UnrecognizedCommand {
                attempted: word.clone(),
            }
        }
    };

    match parsed {
        Ok(command) => ParseResult::Command(command),
        Err(result) => result,
    }
}

/// What the browser should do in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(Event),
    /// Print a message without touching the state.
    Notice(String),
    ShowFilters,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Resolve the command against the current state.
    ///
    /// `next`, `prev` and bare `sort <key>` depend on what is on screen.
    pub fn into_action(self, state: &QueryState) -> Action {
        let params = &state.params;
        match self {
            BrowseCommand::Search(s) => Action::Dispatch(Event::SearchChanged(s)),
            BrowseCommand::Industry(s) => Action::Dispatch(Event::IndustryChanged(s)),
            BrowseCommand::Location(s) => Action::Dispatch(Event::LocationChanged(s)),
            BrowseCommand::Sort(sort_by, order) => {
                let sort_order = order.unwrap_or(if sort_by == params.sort_by {
                    params.sort_order.toggled()
                } else {
                    SortOrder::Asc
                });
                Action::Dispatch(Event::SortChanged {
                    sort_by,
                    sort_order,
                })
            }
            BrowseCommand::Page(p) => Action::Dispatch(Event::PageChanged(p)),
            BrowseCommand::Next => {
                let pagination = &state.companies.data.pagination;
                if pagination.has_next_page {
                    Action::Dispatch(Event::PageChanged(params.page + 1))
                } else {
                    Action::Notice("Already on the last page.".to_string())
                }
            }
            BrowseCommand::Prev => {
                if params.page > 1 {
                    Action::Dispatch(Event::PageChanged(params.page - 1))
                } else {
                    Action::Notice("Already on the first page.".to_string())
                }
            }
            BrowseCommand::Limit(l) => {
                if !LIMIT_PRESETS.contains(&l) {
                    tracing::debug!("Page size {} is not one of the presets", l);
                }
                Action::Dispatch(Event::LimitChanged(l))
            }
            BrowseCommand::Set(patch) => Action::Dispatch(Event::ParamsMerged(patch)),
            BrowseCommand::Reset => Action::Dispatch(Event::FiltersReset),
            BrowseCommand::View => Action::Dispatch(Event::ViewModeToggled),
            BrowseCommand::Refresh => Action::Dispatch(Event::Refreshed),
            BrowseCommand::Clear => Action::Dispatch(Event::ErrorCleared),
            BrowseCommand::Filters => Action::ShowFilters,
            BrowseCommand::Help => Action::Help,
            BrowseCommand::Quit => Action::Quit,
        }
    }
}
