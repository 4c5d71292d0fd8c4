//! Daybreak builds a daily quote card and delivers it to a chat.
//!
//! One run goes through a linear pipeline:
//!
//! 1. **Quote**: ask a [`QuoteProvider`] for a quote (falls back to [`Quote::fallback`])
//! 2. **Photo**: ask a [`PhotoProvider`] for a themed background photo
//! 3. **Layout**: `CanvasSize + CardText + fonts -> LayoutPlan` (pure, no pixels touched)
//! 4. **Compose**: `Canvas + LayoutPlan -> Canvas` (CPU rasterizer)
//! 5. **Deliver**: hand the PNG and a caption to a [`MessagingChannel`]
//! 6. **Cleanup**: remove the run's artifacts, whatever happened before
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic layout**: [`compute_layout`] is a pure function of its inputs.
//! - **No IO in the compositor**: fonts are resolved up front through a [`FontResolver`].
//! - **Explicit run paths**: artifact locations are passed per run in [`RunPaths`].
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod job;
mod layout;
mod providers;
mod render;
mod schedule;
mod text;

pub use assets::decode::{
    Canvas, decode_canvas, encode_png, load_canvas, premultiply_rgba8_in_place,
    unpremultiply_rgba8_in_place,
};
pub use config::Settings;
pub use foundation::core::{CanvasSize, Quote, Rgba8};
pub use foundation::error::{DaybreakError, DaybreakResult};
pub use job::cleanup::remove_artifacts;
pub use job::orchestrator::{
    DEFAULT_TITLE, JobState, Orchestrator, RunOutcome, RunPaths, RunReport, SEARCH_TERMS,
    build_caption, pick_search_term,
};
pub use layout::plan::{
    AUTHOR_PREFIX, CardText, FontRole, FontSizes, LINE_GAP_PX, LayoutPlan, TextDraw,
    compute_layout, wrap_words,
};
pub use providers::http::{HttpSettings, build_client};
pub use providers::photo::{UNSPLASH_URL, UnsplashProvider};
pub use providers::quote::{ZENQUOTES_URL, ZenQuotesProvider};
pub use providers::telegram::{CAPTION_LIMIT, TELEGRAM_URL, TelegramChannel};
pub use providers::{MessagingChannel, PhotoProvider, QuoteProvider};
pub use render::card::{CardRenderer, TextCard};
pub use render::compose::compose;
pub use schedule::daily::{DailyTrigger, resolve_local, run_daily};
pub use text::fonts::{FontChain, FontResolver, ResolvedFont, platform_font_candidates};
pub use text::shaper::{TextExtent, TextMeasure, TextShaper};
