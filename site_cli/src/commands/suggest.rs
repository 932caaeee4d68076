use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use site_lib::suggest::{SearchAction, SearchKey, SuggestState, DEBOUNCE};
use site_lib::types::Article;
use site_lib::{SafeClient, SearchBox, Settings, SuggestionSource};

use crate::output::{build_suggestion_rows, print_rows, OutputFormat};

const POLL: Duration = Duration::from_millis(25);

#[derive(Args)]
pub struct SuggestArgs {
    /// Partial search text as typed into the search box
    pub text: String,

    /// Press the down arrow this many times, then Enter
    #[arg(long)]
    pub down: Option<usize>,
}

#[derive(Serialize)]
struct SuggestOutput<'a> {
    text: &'a str,
    suggestions: &'a [Article],
    highlighted: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

/// Types `text`, waits for the debounced lookup to settle (at most
/// `limit`), then returns the suggestions shown.
pub async fn settle<S: SuggestionSource>(search: &mut SearchBox<S>, text: &str, limit: Duration) -> Vec<Article> {
    search.type_text(text);
    let deadline = tokio::time::Instant::now() + limit;
    while search.debouncer().state() == SuggestState::Pending
        && tokio::time::Instant::now() < deadline
    {
        tokio::time::sleep(POLL).await;
    }
    search.debouncer().suggestions()
}

/// Presses ArrowDown `presses` times, then Enter.
pub fn choose<S: SuggestionSource>(search: &mut SearchBox<S>, presses: usize) -> Option<SearchAction> {
    for _ in 0..presses {
        search.key(SearchKey::ArrowDown);
    }
    search.key(SearchKey::Enter)
}

pub async fn run(args: &SuggestArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let client = SafeClient::from_settings(settings, None);
    let limit = DEBOUNCE + client.timeouts().blogs + POLL;
    let mut search = SearchBox::new(client);

    let suggestions = settle(&mut search, &args.text, limit).await;
    let action = args.down.and_then(|n| choose(&mut search, n)).map(|a| match a {
        SearchAction::OpenArticle(href) | SearchAction::Submit(href) => href,
    });
    let highlighted = search.cursor().index();

    let out = SuggestOutput {
        text: &args.text,
        suggestions: &suggestions,
        highlighted,
        action: action.clone(),
    };
    print_rows(build_suggestion_rows(&suggestions, highlighted), &out, format)?;
    if *format != OutputFormat::Json {
        if let Some(href) = action {
            println!("Enter -> {}", href);
        }
    }
    Ok(())
}
