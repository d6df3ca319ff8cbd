//! Interactive browsing loop.
//!
//! Every plain input line replaces the search box text; it is debounced
//! before it reaches the store. Lines starting with `:` are commands.

use crate::debounce::debounce;
use crate::store::{Action, Completions, Store};
use crate::view;
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::debug;

pub const HELP: &str = "Type to search. Commands: :next  :prev  :open <id>  :back  :clear  :help  :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New search box text
    Term(String),
    Next,
    Prev,
    Open(u32),
    Back,
    Clear,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Command::Term(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("next" | "n"), None) => Command::Next,
            (Some("prev" | "p"), None) => Command::Prev,
            (Some("open" | "o"), Some(id)) => match id.parse() {
                Ok(id) => Command::Open(id),
                Err(_) => Command::Invalid(format!("Not an anime id: {}", id)),
            },
            (Some("back" | "b"), None) => Command::Back,
            (Some("clear"), None) => Command::Clear,
            (Some("help" | "h"), None) => Command::Help,
            (Some("quit" | "q"), None) => Command::Quit,
            _ => Command::Invalid(format!("Unknown command: {}", line.trim())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Search,
    Detail,
}

fn render(out: &mut impl Write, store: &Store, screen: Screen) -> Result<()> {
    let state = store.state();
    let text = match screen {
        Screen::Search => view::render_search(&state.search),
        Screen::Detail => view::render_detail(&state.detail),
    };
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

/// Run until `:quit` or end of input
pub async fn run<R, W>(
    mut store: Store,
    mut completions: Completions,
    input: R,
    out: &mut W,
    delay: Duration,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (term, term_rx) = watch::channel(String::new());
    let mut debounced = debounce(term_rx, delay);
    let mut lines = input.lines();
    let mut screen = Screen::Search;

    writeln!(out, "{}", HELP)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                match Command::parse(&line) {
                    Command::Term(text) => {
                        term.send_replace(text);
                        continue;
                    }
                    Command::Next => store.dispatch(Action::NextPage),
                    Command::Prev => store.dispatch(Action::PrevPage),
                    Command::Open(id) => {
                        store.dispatch(Action::OpenDetail(id));
                        screen = Screen::Detail;
                    }
                    Command::Back => {
                        store.dispatch(Action::CloseDetail);
                        screen = Screen::Search;
                    }
                    Command::Clear => {
                        term.send_replace(String::new());
                        store.dispatch(Action::ClearSearch);
                        screen = Screen::Search;
                    }
                    Command::Help => {
                        writeln!(out, "{}", HELP)?;
                        continue;
                    }
                    Command::Quit => break,
                    Command::Invalid(message) => {
                        writeln!(out, "{}", message)?;
                        continue;
                    }
                }
            }
            Some(query) = debounced.changed() => {
                store.dispatch(Action::QueryChanged(query));
                screen = Screen::Search;
            }
            Some(completion) = completions.recv() => {
                if !store.apply(completion) {
                    continue;
                }
            }
        }

        render(out, &store, screen)?;
    }

    Ok(())
}
