use std::num::NonZeroU64;

use thiserror::Error;

use crate::pagination::{self, PageControl, PaginationPlan, PaginationRequest};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: u64, total_pages: u64 },

    #[error("already on the first page")]
    NoPreviousPage,

    #[error("already on the last page")]
    NoNextPage,

    #[error("invalid page size {value}, expected positive integer")]
    InvalidPageSize { value: u64 },

    #[error("no card #{index} on this screen")]
    NoSuchCard { index: usize },

    #[error("unknown command '{input}' (type 'help' for a list)")]
    UnknownCommand { input: String },

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },
}

/// User intent, independent of how it was entered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    GoToPage(u64),
    Previous,
    Next,
    Search(String),
    ClearSearch,
    SetPageSize(u64),
    /// 1-based position of a card on the current screen.
    Details(usize),
    CloseDetails,
    Refresh,
    Help,
    Quit,
}

/// Coordinates of one list request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageFetch {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

/// What the viewer has to do after a command was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    FetchPage(PageFetch),
    FetchByName(String),
    ShowDetails(usize),
    Redraw,
    ShowHelp,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerState {
    pub current_page: u64,
    pub page_size: NonZeroU64,
    pub total_items: u64,
    pub search: Option<String>,
    pub visible_cards: usize,
}

#[derive(Clone, Debug)]
pub struct Controller {
    state: ViewerState,
}

impl Controller {
    pub fn new(page_size: NonZeroU64) -> Self {
        Self {
            state: ViewerState {
                current_page: 1,
                page_size,
                total_items: 0,
                search: None,
                visible_cards: 0,
            },
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn total_pages(&self) -> u64 {
        pagination::total_pages(self.state.total_items, self.state.page_size)
    }

    pub fn request(&self) -> PaginationRequest {
        PaginationRequest {
            total_items: self.state.total_items,
            page_size: self.state.page_size,
            current_page: self.state.current_page,
        }
    }

    /// Pagination bar for the current state. Empty while a search result is shown.
    pub fn plan(&self) -> PaginationPlan {
        if self.state.search.is_some() {
            return PaginationPlan::default();
        }
        pagination::compute(self.request())
    }

    /// Stores the catalog size reported by the last list response.
    pub fn record_total(&mut self, total_items: u64) {
        self.state.total_items = total_items;
    }

    pub fn record_visible_cards(&mut self, count: usize) {
        self.state.visible_cards = count;
    }

    /// Jumps to `page` before the catalog size is known, e.g. a start page.
    pub fn seek(&mut self, page: u64) -> Effect {
        self.state.search = None;
        self.state.current_page = page.max(1);
        self.fetch_current()
    }

    /// Command for a control of the pagination bar.
    pub fn activate(&self, control: &PageControl) -> Option<Command> {
        match control {
            PageControl::PreviousButton => Some(Command::Previous),
            PageControl::NextButton => Some(Command::Next),
            other => other
                .target(self.state.current_page)
                .map(Command::GoToPage),
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<Effect, ControlError> {
        match command {
            Command::GoToPage(page) => {
                let total_pages = self.total_pages();
                if page == 0 || page > total_pages {
                    return Err(ControlError::PageOutOfRange { page, total_pages });
                }
                self.state.search = None;
                self.state.current_page = page;
                Ok(self.fetch_current())
            }
            Command::Previous => {
                if self.state.search.is_none() && self.state.current_page <= 1 {
                    return Err(ControlError::NoPreviousPage);
                }
                self.state.search = None;
                self.state.current_page = self.state.current_page.saturating_sub(1).max(1);
                Ok(self.fetch_current())
            }
            Command::Next => {
                if self.state.search.is_none() && self.state.current_page >= self.total_pages() {
                    return Err(ControlError::NoNextPage);
                }
                self.state.search = None;
                self.state.current_page = self
                    .state
                    .current_page
                    .saturating_add(1)
                    .min(self.total_pages().max(1));
                Ok(self.fetch_current())
            }
            Command::Search(term) => {
                self.state.current_page = 1;
                let term = term.trim().to_lowercase();
                if term.is_empty() {
                    self.state.search = None;
                    return Ok(self.fetch_current());
                }
                self.state.search = Some(term.clone());
                Ok(Effect::FetchByName(term))
            }
            Command::ClearSearch => {
                self.state.search = None;
                self.state.current_page = 1;
                Ok(self.fetch_current())
            }
            Command::SetPageSize(value) => {
                let page_size =
                    NonZeroU64::new(value).ok_or(ControlError::InvalidPageSize { value })?;
                self.state.page_size = page_size;
                self.state.current_page = 1;
                self.state.search = None;
                Ok(self.fetch_current())
            }
            Command::Details(index) => {
                if index == 0 || index > self.state.visible_cards {
                    return Err(ControlError::NoSuchCard { index });
                }
                Ok(Effect::ShowDetails(index - 1))
            }
            Command::CloseDetails => Ok(Effect::Redraw),
            Command::Refresh => match self.state.search.clone() {
                Some(term) => Ok(Effect::FetchByName(term)),
                None => Ok(self.fetch_current()),
            },
            Command::Help => Ok(Effect::ShowHelp),
            Command::Quit => Ok(Effect::Quit),
        }
    }

    /// List request for the current page and page size.
    pub fn current_fetch(&self) -> PageFetch {
        let limit = self.state.page_size.get();
        let page = self.state.current_page;
        PageFetch {
            page,
            limit,
            offset: page.saturating_sub(1).saturating_mul(limit),
        }
    }

    fn fetch_current(&self) -> Effect {
        Effect::FetchPage(self.current_fetch())
    }
}

/// Parses one line typed at the interactive prompt.
pub fn parse_command(input: &str) -> Result<Command, ControlError> {
    let trimmed = input.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let head = head.to_lowercase();

    if let Ok(page) = head.parse::<u64>() {
        if rest.is_empty() {
            return Ok(Command::GoToPage(page));
        }
    }

    let number = |expected: &'static str| -> Result<u64, ControlError> {
        rest.parse::<u64>()
            .map_err(|_| ControlError::MissingArgument {
                command: head.clone(),
                expected,
            })
    };

    match head.as_str() {
        "n" | "next" => Ok(Command::Next),
        "p" | "prev" | "previous" => Ok(Command::Previous),
        "g" | "go" | "page" => number("a page number").map(Command::GoToPage),
        "size" => number("a page size").map(Command::SetPageSize),
        "d" | "details" => number("a card number").and_then(|n| {
            usize::try_from(n)
                .map(Command::Details)
                .map_err(|_| ControlError::MissingArgument {
                    command: head.clone(),
                    expected: "a card number",
                })
        }),
        "s" | "search" | "/" => {
            if rest.is_empty() {
                Err(ControlError::MissingArgument {
                    command: head.clone(),
                    expected: "a name",
                })
            } else {
                Ok(Command::Search(rest.to_string()))
            }
        }
        "c" | "clear" => Ok(Command::ClearSearch),
        "x" | "close" => Ok(Command::CloseDetails),
        "r" | "refresh" | "" => Ok(Command::Refresh),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ControlError::UnknownCommand {
            input: trimmed.to_string(),
        }),
    }
}
