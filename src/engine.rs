//! Dictionary translation engine.
//!
//! This module is the entry point of the pipeline that wraps an external
//! translator with the dictionary. It is split into focused submodules under
//! `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! input ──▶ transform (non-postprocess terms)            (dictionary.rs)
//!              │   [Text | Marker(term, payload)]*
//!              v
//!           inverse_transform {Preprocess}                (dictionary.rs)
//!              │   preprocess output inlined as text
//!              v
//!           encode                                        (codec.rs)
//!              │   "text ZMBZ text ZMCZ"  + marker list
//!              v
//!           Translator::translate   ◀── backend call
//!              v
//!           decode                                        (codec.rs)
//!              v
//!           transform (postprocess terms)
//!              v
//!           inverse_transform {all} ──▶ output text
//! ```
//!
//! Nothing here outlives one `translate` call except the shared, read-only
//! [`TermSet`](crate::TermSet). Markers are numbered per call.
//!
//! ## Responsibilities by module
//!
//! - `segment.rs`: the `Segment`/`Marker` sum type passed between stages.
//! - `dictionary.rs`: `DictionaryTranslator`, scanning and materialization.
//! - `codec.rs`: the marker token alphabet, frame and the encode/decode pair.
//! - `metrics.rs`: per-run timings and intermediate texts for debugging.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=dictrans=debug` to see the text handed to the backend
//! and what came back; `trace` adds every term match.

#[path = "engine/codec.rs"]
pub mod codec;
#[path = "engine/dictionary.rs"]
mod dictionary;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/segment.rs"]
mod segment;

pub use dictionary::DictionaryTranslator;
pub use metrics::{RunMetrics, RunResult, StageTimings};
pub use segment::{Marker, Segment};
