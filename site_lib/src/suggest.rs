//! Live search suggestions: debounced lookups and keyboard navigation.
//!
//! Each keystroke cancels the scheduled lookup and any request still in
//! flight, so at most one request is outstanding. A lookup is issued once
//! the input has been quiet for [`DEBOUNCE`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use content_api::types::Article;
use tokio::task::JoinHandle;

use crate::articles::{article_href, ARTICLES_PATH};
use crate::fetch::SafeClient;
use crate::params::QueryParams;

pub const DEBOUNCE: Duration = Duration::from_millis(300);
pub const MAX_SUGGESTIONS: usize = 5;
/// Shorter (trimmed) input clears suggestions instead of searching.
pub const MIN_QUERY_CHARS: usize = 2;

/// Anything that can look up articles matching a partial search.
#[async_trait]
pub trait SuggestionSource: Send + Sync + 'static {
    async fn suggest(&self, search: &str, limit: usize) -> Result<Vec<Article>, content_api::Error>;
}

#[async_trait]
impl SuggestionSource for SafeClient {
    async fn suggest(&self, search: &str, limit: usize) -> Result<Vec<Article>, content_api::Error> {
        self.search_suggestions(search, limit).await
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SuggestState {
    /// Input too short; nothing shown.
    Idle,
    /// Waiting out the quiet period or the request.
    Pending,
    /// Lookup finished; the dropdown shows these.
    Resolved(Vec<Article>),
    /// Lookup failed or was cancelled; nothing shown, no error surfaced.
    Aborted,
}

#[derive(Debug)]
struct Shared {
    state: SuggestState,
    /// Bumped on every keystroke so a superseded lookup cannot publish.
    generation: u64,
}

/// Schedules suggestion lookups against a [`SuggestionSource`].
///
/// Must be driven from within a tokio runtime.
pub struct SuggestionDebouncer<S: SuggestionSource> {
    source: Arc<S>,
    shared: Arc<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
    delay: Duration,
}

impl<S: SuggestionSource> SuggestionDebouncer<S> {
    pub fn new(source: S) -> Self {
        Self::with_delay(source, DEBOUNCE)
    }

    pub fn with_delay(source: S, delay: Duration) -> Self {
        Self {
            source: Arc::new(source),
            shared: Arc::new(Mutex::new(Shared {
                state: SuggestState::Idle,
                generation: 0,
            })),
            task: None,
            delay,
        }
    }

    /// Handles the input changing to `text`.
    pub fn on_input(&mut self, text: &str) {
        self.cancel_task();
        let search = text.trim().to_string();

        let generation = {
            let mut shared = self.shared.lock().unwrap_or_else(|e| e.into_inner());
            shared.generation += 1;
            shared.state = if search.chars().count() < MIN_QUERY_CHARS {
                SuggestState::Idle
            } else {
                SuggestState::Pending
            };
            if shared.state == SuggestState::Idle {
                return;
            }
            shared.generation
        };

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = source.suggest(&search, MAX_SUGGESTIONS).await;
            let mut shared = shared.lock().unwrap_or_else(|e| e.into_inner());
            if shared.generation != generation {
                return;
            }
            shared.state = match result {
                Ok(mut items) => {
                    items.truncate(MAX_SUGGESTIONS);
                    SuggestState::Resolved(items)
                }
                Err(e) => {
                    tracing::debug!("suggestions for {:?} failed: {}", search, e);
                    SuggestState::Aborted
                }
            };
        }));
    }

    /// Cancels any scheduled or in-flight lookup and hides suggestions.
    pub fn cancel(&mut self) {
        let had_task = self.cancel_task();
        let mut shared = self.shared.lock().unwrap_or_else(|e| e.into_inner());
        shared.generation += 1;
        if had_task && shared.state == SuggestState::Pending {
            shared.state = SuggestState::Aborted;
        }
    }

    fn cancel_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> SuggestState {
        self.shared
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .state
            .clone()
    }

    /// Suggestions to show; empty unless a lookup resolved.
    pub fn suggestions(&self) -> Vec<Article> {
        match self.state() {
            SuggestState::Resolved(items) => items,
            _ => Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state(), SuggestState::Resolved(_))
    }
}

impl<S: SuggestionSource> Drop for SuggestionDebouncer<S> {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

/// Where pressing Enter takes the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    /// Open the highlighted suggestion.
    OpenArticle(String),
    /// Run a full search for the typed text.
    Submit(String),
}

/// Highlighted suggestion index; `-1` means none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestionCursor {
    index: i64,
}

impl Default for SuggestionCursor {
    fn default() -> Self {
        Self { index: -1 }
    }
}

impl SuggestionCursor {
    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn down(&mut self, len: usize) {
        self.index = (self.index + 1).min(len as i64 - 1);
    }

    pub fn up(&mut self) {
        self.index = (self.index - 1).max(-1);
    }

    pub fn reset(&mut self) {
        self.index = -1;
    }

    pub fn enter(&self, text: &str, suggestions: &[Article]) -> SearchAction {
        let highlighted = usize::try_from(self.index)
            .ok()
            .and_then(|i| suggestions.get(i));
        match highlighted {
            Some(article) => SearchAction::OpenArticle(article_href(&article.slug)),
            None => SearchAction::Submit(submit_href(text)),
        }
    }
}

/// Full-search link for `text`: `/articles?q=<trimmed>`, or `/articles` when blank.
pub fn submit_href(text: &str) -> String {
    QueryParams::new().with_search(text).href(ARTICLES_PATH)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKey {
    ArrowDown,
    ArrowUp,
    Enter,
}

/// Search input with its suggestion dropdown.
pub struct SearchBox<S: SuggestionSource> {
    text: String,
    cursor: SuggestionCursor,
    debouncer: SuggestionDebouncer<S>,
}

impl<S: SuggestionSource> SearchBox<S> {
    pub fn new(source: S) -> Self {
        Self {
            text: String::new(),
            cursor: SuggestionCursor::default(),
            debouncer: SuggestionDebouncer::new(source),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> SuggestionCursor {
        self.cursor
    }

    pub fn debouncer(&self) -> &SuggestionDebouncer<S> {
        &self.debouncer
    }

    /// Replaces the input text. Typing always clears the highlight.
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor.reset();
        self.debouncer.on_input(text);
    }

    /// Applies a key press. Only Enter produces an action.
    pub fn key(&mut self, key: SearchKey) -> Option<SearchAction> {
        match key {
            SearchKey::ArrowDown => {
                self.cursor.down(self.debouncer.suggestions().len());
                None
            }
            SearchKey::ArrowUp => {
                self.cursor.up();
                None
            }
            SearchKey::Enter => {
                let action = self.cursor.enter(&self.text, &self.debouncer.suggestions());
                self.debouncer.cancel();
                Some(action)
            }
        }
    }
}
