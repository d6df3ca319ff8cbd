//! Plain-text rendering of the store state.

use crate::detail::DetailState;
use crate::search::{SearchPhase, SearchState};
use std::fmt::{self, Display, Write};

const NOT_AVAILABLE: &str = "N/A";

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn list_or_na(items: &[&str]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

/// Search screen
pub struct SearchView<'a>(pub &'a SearchState);

/// Detail screen
pub struct DetailView<'a>(pub &'a DetailState);

impl Display for SearchView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_search(f, self.0)
    }
}

impl Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_detail(f, self.0)
    }
}

pub fn render_search(state: &SearchState) -> String {
    SearchView(state).to_string()
}

pub fn render_detail(state: &DetailState) -> String {
    DetailView(state).to_string()
}

fn write_search(out: &mut impl Write, state: &SearchState) -> fmt::Result {
    if state.loading {
        writeln!(out, "Loading...")?;
    }
    if let Some(error) = &state.error {
        writeln!(out, "Error: {}", error)?;
    }

    match state.phase() {
        SearchPhase::Idle => return writeln!(out, "Type a title to search."),
        SearchPhase::Settled if state.results.is_empty() => {
            writeln!(out, "No results. Try another query.")?;
        }
        _ => {}
    }

    for result in &state.results {
        writeln!(out, "#{:<6} {}", result.id, result.title)?;
    }

    if !state.loading {
        write!(out, "Page {}", state.page)?;
        if state.can_go_prev() {
            write!(out, "  [:prev]")?;
        }
        if state.can_go_next() {
            write!(out, "  [:next]")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_detail(out: &mut impl Write, state: &DetailState) -> fmt::Result {
    if state.loading {
        return writeln!(out, "Loading...");
    }
    if let Some(error) = &state.error {
        return writeln!(out, "Error: {}", error);
    }
    let Some(detail) = &state.data else {
        return writeln!(out, "No detail found.");
    };

    writeln!(out, "{}", detail.title.as_deref().unwrap_or("Detail"))?;
    if let Some(japanese) = &detail.title_japanese {
        writeln!(out, "{}", japanese)?;
    }

    let badges: Vec<String> = [
        detail.anime_type.clone(),
        detail.score.map(|score| format!("Score: {}", score)),
        detail.status.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !badges.is_empty() {
        writeln!(out, "[{}]", badges.join("] ["))?;
    }

    writeln!(out, "Studios: {}", list_or_na(&detail.studio_names()))?;
    writeln!(out, "Genres: {}", list_or_na(&detail.genre_names()))?;
    if let Some(url) = detail.image_url() {
        writeln!(out, "Image: {}", url)?;
    }

    if let Some(synopsis) = &detail.synopsis {
        writeln!(out, "\n{}\n", synopsis)?;
    }

    writeln!(out, "Episodes: {}", or_na(detail.episodes))?;
    writeln!(out, "Rating: {}", or_na(detail.rating.as_deref()))?;
    writeln!(out, "Aired: {}", or_na(detail.aired_string()))
}
