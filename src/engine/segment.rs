//! Intermediate representation between pipeline stages.

use std::fmt;

use crate::{Payload, Term};

/// A scanned occurrence waiting to be rendered by its term.
#[derive(Clone)]
pub struct Marker<'a> {
    pub term: &'a dyn Term,
    pub payload: Payload,
}

impl<'a> Marker<'a> {
    pub fn new(term: &'a dyn Term, payload: Payload) -> Self {
        Marker { term, payload }
    }
}

impl PartialEq for Marker<'_> {
    /// Same term object and same payload.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.term, other.term) && self.payload == other.payload
    }
}

impl fmt::Debug for Marker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("term", &self.term.source())
            .field("stage", &self.term.config().stage)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Either plain text or a marker that still has to be materialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Text(String),
    Marker(Marker<'a>),
}

impl<'a> Segment<'a> {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    pub fn marker(term: &'a dyn Term, payload: Payload) -> Self {
        Segment::Marker(Marker::new(term, payload))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(text) => Some(text),
            Segment::Marker(_) => None,
        }
    }
}

/// Append `text`, merging it into a trailing text segment.
pub(crate) fn push_text<'a>(out: &mut Vec<Segment<'a>>, text: String) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Segment::Text(last)) => last.push_str(&text),
        _ => out.push(Segment::Text(text)),
    }
}
