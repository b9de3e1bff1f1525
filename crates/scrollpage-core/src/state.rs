//! Loader state and its transition functions.
//!
//! [`LoaderState`] is a plain owned record. Every transition is a synchronous
//! method on it: issuing a request hands out a [`PageTicket`], and the ticket
//! must be presented again when the response arrives. Nothing here awaits or
//! spawns, which keeps the whole state machine testable without a runtime.

use crate::error::FetchError;
use crate::page::PageResult;

/// Derived phase of a loader, for views that prefer a single value over the
/// individual flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    LoadingInitial,
    LoadingMore,
    Error,
    /// `has_more` is false and nothing is in flight.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
}

/// Receipt for an issued page request.
///
/// Carries the refresh generation captured at issue time; a response whose
/// ticket belongs to an older generation is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    page: usize,
    kind: LoadKind,
}

impl PageTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn kind(&self) -> LoadKind {
        self.kind
    }
}

/// Outcome of presenting a response to [`LoaderState::complete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response belonged to a superseded request and changed nothing.
    Stale,
}

/// Owned state of one paged list.
#[derive(Debug)]
pub struct LoaderState<T> {
    items: Vec<T>,
    initial_page: usize,
    current_page: usize,
    // Highest page applied in this generation. `None` until the initial page lands.
    loaded_page: Option<usize>,
    is_loading_initial: bool,
    is_loading_more: bool,
    has_more: bool,
    total_elements: usize,
    error: Option<FetchError>,
    refresh_generation: u64,
}

impl<T> LoaderState<T> {
    pub fn new(initial_page: usize) -> Self {
        Self {
            items: Vec::new(),
            initial_page,
            current_page: initial_page,
            loaded_page: None,
            is_loading_initial: false,
            is_loading_more: false,
            has_more: true,
            total_elements: 0,
            error: None,
            refresh_generation: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn initial_page(&self) -> usize {
        self.initial_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn loaded_page(&self) -> Option<usize> {
        self.loaded_page
    }

    pub fn is_loading_initial(&self) -> bool {
        self.is_loading_initial
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn refresh_generation(&self) -> u64 {
        self.refresh_generation
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_loading_initial {
            LoadPhase::LoadingInitial
        } else if self.is_loading_more {
            LoadPhase::LoadingMore
        } else if self.error.is_some() {
            LoadPhase::Error
        } else if !self.has_more {
            LoadPhase::Exhausted
        } else {
            LoadPhase::Idle
        }
    }

    /// Whether `begin_more` would issue a request right now.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading() && self.loaded_page.is_some()
    }

    /// Starts loading the initial page unless a request is already in flight.
    pub fn begin_initial(&mut self) -> Option<PageTicket> {
        if self.is_loading() {
            return None;
        }
        Some(self.start_initial())
    }

    /// Supersedes whatever is in flight and starts over from the initial page.
    pub fn begin_refresh(&mut self) -> PageTicket {
        self.refresh_generation = self.refresh_generation.wrapping_add(1);
        self.is_loading_initial = false;
        self.is_loading_more = false;
        self.start_initial()
    }

    /// Starts loading the page after the last applied one.
    ///
    /// Returns `None` (and changes nothing) while a request is in flight, once
    /// the list is exhausted, or before the initial page has been applied.
    pub fn begin_more(&mut self) -> Option<PageTicket> {
        if !self.can_load_more() {
            return None;
        }
        let page = self.loaded_page?.checked_add(1)?;
        self.current_page = page;
        self.is_loading_more = true;
        self.error = None;
        Some(PageTicket {
            generation: self.refresh_generation,
            page,
            kind: LoadKind::More,
        })
    }

    /// Applies the response for `ticket`.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<PageResult<T>, FetchError>,
    ) -> Completion {
        if ticket.generation != self.refresh_generation {
            return Completion::Stale;
        }
        let in_flight = match ticket.kind {
            LoadKind::Initial => self.is_loading_initial,
            LoadKind::More => self.is_loading_more,
        };
        if !in_flight || ticket.page != self.current_page {
            return Completion::Stale;
        }

        self.is_loading_initial = false;
        self.is_loading_more = false;
        match result {
            Ok(page) => {
                match ticket.kind {
                    LoadKind::Initial => self.items = page.content,
                    LoadKind::More => self.items.extend(page.content),
                }
                self.loaded_page = Some(ticket.page);
                self.has_more = !page.last;
                self.total_elements = page.total_elements;
                self.error = None;
            }
            Err(error) => {
                self.error = Some(error);
            }
        }
        Completion::Applied
    }

    fn start_initial(&mut self) -> PageTicket {
        self.items.clear();
        self.current_page = self.initial_page;
        self.loaded_page = None;
        self.has_more = true;
        self.total_elements = 0;
        self.error = None;
        self.is_loading_initial = true;
        PageTicket {
            generation: self.refresh_generation,
            page: self.initial_page,
            kind: LoadKind::Initial,
        }
    }
}

impl<T: Clone> LoaderState<T> {
    pub fn snapshot(&self) -> LoaderSnapshot<T> {
        LoaderSnapshot {
            items: self.items.clone(),
            current_page: self.current_page,
            is_loading_initial: self.is_loading_initial,
            is_loading_more: self.is_loading_more,
            has_more: self.has_more,
            total_elements: self.total_elements,
            error: self.error.clone(),
            phase: self.phase(),
        }
    }
}

/// Read-only copy of the values a list view renders from.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderSnapshot<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    pub total_elements: usize,
    pub error: Option<FetchError>,
    pub phase: LoadPhase,
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
