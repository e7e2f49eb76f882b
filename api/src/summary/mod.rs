//! Summary module
//!
//! LLM-readable plain-text rendering of rank data.

pub mod renderer;

pub use renderer::{
    render_assessment, render_history, render_import_summary, render_needs_assessment,
    render_rank_status, render_rank_tiers, render_regeneration, render_week_progress,
};
