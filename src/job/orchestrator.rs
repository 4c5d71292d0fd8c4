use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    assets::decode::{Canvas, encode_png, load_canvas},
    foundation::core::Quote,
    foundation::error::{DaybreakError, DaybreakResult},
    job::cleanup::remove_artifacts,
    layout::plan::{AUTHOR_PREFIX, CardText},
    providers::{MessagingChannel, PhotoProvider, QuoteProvider},
    render::card::CardRenderer,
};

/// Greeting drawn at the top of the card and used as the caption's first line.
pub const DEFAULT_TITLE: &str = "Good Morning!";

/// Photo search terms; one is picked at random per run.
pub const SEARCH_TERMS: [&str; 10] = [
    "nature landscape",
    "sunrise",
    "beautiful morning",
    "peaceful scenery",
    "good morning light",
    "calm ocean",
    "mountain view",
    "forest path",
    "flowers dew",
    "coffee morning",
];

/// States of one job run, in the order they can be visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Run started.
    Start,
    /// A quote is available (fetched or fallback).
    QuoteFetched,
    /// Background photo downloaded to disk.
    ImageFetched,
    /// Card rendered and written to disk.
    Composed,
    /// Channel accepted the card.
    Delivered,
    /// Artifacts removed.
    CleanedUp,
    /// Run finished without aborting.
    Done,
    /// Run aborted by a failed step.
    Aborted,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::QuoteFetched => "QUOTE_FETCHED",
            Self::ImageFetched => "IMAGE_FETCHED",
            Self::Composed => "COMPOSED",
            Self::Delivered => "DELIVERED",
            Self::CleanedUp => "CLEANED_UP",
            Self::Done => "DONE",
            Self::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The card reached the recipient.
    Delivered,
    /// Card was built but the channel failed.
    DeliveryFailed(String),
    /// A step failed; `at` is the state that could not be reached.
    Aborted {
        /// State whose step failed.
        at: JobState,
        /// Failure description.
        reason: String,
    },
}

impl RunOutcome {
    /// Only a delivered card counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Process exit status for one-shot runs: 0 delivered, 1 aborted, 2 delivery failed.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Delivered => 0,
            Self::Aborted { .. } => 1,
            Self::DeliveryFailed(_) => 2,
        }
    }
}

/// Summary of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Final outcome.
    pub outcome: RunOutcome,
    /// Every state reached, in order.
    pub visited: Vec<JobState>,
    /// Quote that was used.
    pub quote: Quote,
    /// Photo search term that was used.
    pub term: String,
}

impl RunReport {
    /// Last state reached (`Done` or `Aborted`).
    pub fn final_state(&self) -> JobState {
        self.visited.last().copied().unwrap_or(JobState::Start)
    }
}

/// Artifact locations for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPaths {
    /// Downloaded photo bytes.
    pub downloaded: PathBuf,
    /// Encoded card PNG.
    pub composed: PathBuf,
}

impl RunPaths {
    /// File name of the downloaded photo inside a work dir.
    pub const DOWNLOADED_NAME: &'static str = "daybreak_photo.img";
    /// File name of the composed card inside a work dir.
    pub const COMPOSED_NAME: &'static str = "daybreak_card.png";

    /// Conventional artifact names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            downloaded: dir.join(Self::DOWNLOADED_NAME),
            composed: dir.join(Self::COMPOSED_NAME),
        }
    }

    fn all(&self) -> [&Path; 2] {
        [self.downloaded.as_path(), self.composed.as_path()]
    }
}

/// Pick one of [`SEARCH_TERMS`].
pub fn pick_search_term<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SEARCH_TERMS.choose(rng).copied().unwrap_or(SEARCH_TERMS[0])
}

/// Caption sent with the card.
pub fn build_caption(title: &str, quote: &Quote) -> String {
    format!(
        "{title}\n\n'{}'\n{AUTHOR_PREFIX}{}",
        quote.text, quote.author
    )
}

/// Drives one run: quote, photo, render, deliver, cleanup.
pub struct Orchestrator {
    quotes: Box<dyn QuoteProvider>,
    photos: Box<dyn PhotoProvider>,
    renderer: Box<dyn CardRenderer>,
    channel: Box<dyn MessagingChannel>,
    title: String,
}

impl Orchestrator {
    /// Wire the collaborators of a run.
    pub fn new(
        quotes: impl QuoteProvider + 'static,
        photos: impl PhotoProvider + 'static,
        renderer: impl CardRenderer + 'static,
        channel: impl MessagingChannel + 'static,
    ) -> Self {
        Self {
            quotes: Box::new(quotes),
            photos: Box::new(photos),
            renderer: Box::new(renderer),
            channel: Box::new(channel),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Replace the card title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Card title in use.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Run once with a thread-local RNG for the search term.
    pub fn run(&self, paths: &RunPaths) -> RunReport {
        self.run_with_rng(paths, &mut rand::rng())
    }

    /// Run once, drawing the search term from `rng`.
    ///
    /// Never panics on step failure; the outcome is in the report. Cleanup
    /// runs on every path.
    #[tracing::instrument(skip_all, fields(composed = %paths.composed.display()))]
    pub fn run_with_rng<R: Rng + ?Sized>(&self, paths: &RunPaths, rng: &mut R) -> RunReport {
        let mut visited = vec![JobState::Start];
        tracing::info!(state = %JobState::Start, "daily run started");

        let quote = self.fetch_quote();
        visited.push(JobState::QuoteFetched);
        tracing::info!(state = %JobState::QuoteFetched, author = %quote.author, "quote ready");

        let term = pick_search_term(rng);
        let outcome = self.produce_and_deliver(&quote, term, paths, &mut visited);

        let removed = remove_artifacts(paths.all());
        visited.push(JobState::CleanedUp);
        tracing::info!(state = %JobState::CleanedUp, removed, "artifacts cleaned up");

        match &outcome {
            RunOutcome::Aborted { at, reason } => {
                visited.push(JobState::Aborted);
                tracing::error!(state = %JobState::Aborted, failed = %at, %reason, "run aborted");
            }
            RunOutcome::DeliveryFailed(reason) => {
                visited.push(JobState::Done);
                tracing::warn!(state = %JobState::Done, %reason, "run finished without delivery");
            }
            RunOutcome::Delivered => {
                visited.push(JobState::Done);
                tracing::info!(state = %JobState::Done, "run finished");
            }
        }

        RunReport {
            outcome,
            visited,
            quote,
            term: term.to_string(),
        }
    }

    fn fetch_quote(&self) -> Quote {
        match self.quotes.fetch_quote() {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(error = %err, "quote provider failed, using fallback quote");
                Quote::fallback()
            }
        }
    }

    fn produce_and_deliver(
        &self,
        quote: &Quote,
        term: &str,
        paths: &RunPaths,
        visited: &mut Vec<JobState>,
    ) -> RunOutcome {
        let abort = |at: JobState, err: DaybreakError| RunOutcome::Aborted {
            at,
            reason: format!("{err:#}"),
        };

        if let Err(err) = self.download_photo(term, paths) {
            return abort(JobState::ImageFetched, err);
        }
        visited.push(JobState::ImageFetched);
        tracing::info!(state = %JobState::ImageFetched, term, "photo downloaded");

        let card = match self.compose_card(quote, paths) {
            Ok(card) => card,
            Err(err) => return abort(JobState::Composed, err),
        };
        visited.push(JobState::Composed);
        tracing::info!(state = %JobState::Composed, bytes = card.len(), "card composed");

        let caption = build_caption(&self.title, quote);
        match self.channel.deliver(&card, &caption) {
            Ok(()) => {
                visited.push(JobState::Delivered);
                tracing::info!(state = %JobState::Delivered, "card delivered");
                RunOutcome::Delivered
            }
            Err(err) => {
                tracing::error!(error = %err, "delivery failed");
                RunOutcome::DeliveryFailed(err.to_string())
            }
        }
    }

    fn download_photo(&self, term: &str, paths: &RunPaths) -> DaybreakResult<()> {
        let bytes = self.photos.fetch_photo(term)?;
        write_artifact(&paths.downloaded, &bytes)
    }

    fn compose_card(&self, quote: &Quote, paths: &RunPaths) -> DaybreakResult<Vec<u8>> {
        let canvas: Canvas = load_canvas(&paths.downloaded).map_err(|e| match e {
            DaybreakError::Composition(_) => e,
            other => DaybreakError::composition(format!("decode photo: {other:#}")),
        })?;

        let text = CardText {
            title: &self.title,
            quote: &quote.text,
            author: &quote.author,
        };
        let card = self.renderer.render(&canvas, &text)?;
        let png = encode_png(&card)?;
        write_artifact(&paths.composed, &png)?;
        Ok(png)
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> DaybreakResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create artifact dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write artifact '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/job/orchestrator.rs"]
mod tests;
