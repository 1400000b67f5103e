//! Run metrics.
//!
//! `DictionaryTranslator::translate_with_metrics` returns these next to the
//! output so callers can see exactly what the backend received and returned,
//! and where the time went. The plain `translate` path drops them.

use std::time::Duration;

/// Wall-clock time per pipeline phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    /// Scanning, preprocess materialization and encoding.
    pub prepare: Duration,
    /// The external translator call.
    pub backend: Duration,
    /// Decoding, postprocess scanning and final materialization.
    pub finish: Duration,
    pub total: Duration,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunMetrics {
    /// Text handed to the translator, markers replaced by tokens.
    pub encoded: String,
    /// Text the translator returned.
    pub translated: String,
    /// Number of tokens issued, escapes included.
    pub markers: usize,
    /// Token look-alikes in plain text that were escaped.
    pub escaped: usize,
    pub timings: StageTimings,
}

/// Pipeline output bundled with its metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub text: String,
    pub metrics: RunMetrics,
}
