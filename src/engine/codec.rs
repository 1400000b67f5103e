//! Marker token codec.
//!
//! Transform-stage markers cross the translator as opaque tokens:
//!
//! ```text
//! index 0   -> ZMBZ
//! index 19  -> ZMYZ
//! index 20  -> ZMCBZ
//! index 399 -> ZMYYZ
//! ```
//!
//! Digits are base 20, most significant first, over an alphabet of upper-case
//! consonants without vowels so translators leave the token alone (no
//! transliteration, nothing that reads like a word). Decoding accepts any case.
//!
//! Text that already looks like a token is escaped before encoding: it gets a
//! marker of its own whose replacement is the original text. So does an
//! unterminated frame (`ZM`, `zmb`) right before a marker, which would
//! otherwise fuse with the marker's token.

use async_trait::async_trait;
use regex::Regex;

use super::dictionary::DictionaryTranslator;
use super::segment::{Marker, Segment, push_text};
use crate::terms::{Term, TermConfig};
use crate::{Error, Match, Payload, Result, Stage};

pub const ALPHABET: &[u8; 20] = b"BCDFGHJKLMNPQRSTVWXY";
const BASE: usize = ALPHABET.len();
const PREFIX: &str = "ZM";
const SUFFIX: &str = "Z";

/// The frame of a marker token, case-insensitive.
pub fn frame_regex() -> &'static Regex {
    regex!(r"(?i)ZM[BCDFGHJKLMNPQRSTVWXY]+Z")
}

/// Render the token for marker `index`.
pub fn encode_index(mut index: usize) -> String {
    let mut digits = Vec::with_capacity(4);
    loop {
        digits.push(ALPHABET[index % BASE]);
        index /= BASE;
        if index == 0 {
            break;
        }
    }
    digits.reverse();

    let mut token = String::with_capacity(PREFIX.len() + digits.len() + SUFFIX.len());
    token.push_str(PREFIX);
    token.extend(digits.into_iter().map(char::from));
    token.push_str(SUFFIX);
    token
}

/// Recover the index from a framed token. `None` if the token is not framed,
/// holds a foreign digit or overflows `usize`.
pub fn decode_index(token: &str) -> Option<usize> {
    if token.len() < PREFIX.len() + SUFFIX.len() + 1 || !token.is_ascii() {
        return None;
    }
    let (head, rest) = token.split_at(PREFIX.len());
    let (digits, tail) = rest.split_at(rest.len() - SUFFIX.len());
    if !head.eq_ignore_ascii_case(PREFIX) || !tail.eq_ignore_ascii_case(SUFFIX) {
        return None;
    }
    digits.bytes().try_fold(0usize, |acc, b| {
        let digit = ALPHABET.iter().position(|&c| c == b.to_ascii_uppercase())?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded<'a> {
    /// Text with a token in place of every marker.
    pub text: String,
    /// Markers by allocation index.
    pub markers: Vec<Marker<'a>>,
    /// How many token look-alikes in plain text were escaped.
    pub escaped: usize,
}

/// Stands in for text that would otherwise be mistaken for a token.
#[derive(Debug)]
struct VerbatimTerm;

static VERBATIM_CONFIG: TermConfig = TermConfig { stage: Stage::Transform, target_lang: None, translator: None, priority: 0 };
static VERBATIM: VerbatimTerm = VerbatimTerm;

#[async_trait]
impl Term for VerbatimTerm {
    fn config(&self) -> &TermConfig {
        &VERBATIM_CONFIG
    }

    fn source(&self) -> &str {
        frame_regex().as_str()
    }

    fn scan(&self, _ctx: &DictionaryTranslator<'_>, text: &str, start: usize) -> Option<Match> {
        frame_regex().find_at(text, start).map(|m| Match::new(m.start(), m.end(), Payload::Text(m.as_str().to_owned())))
    }

    async fn process(&self, _ctx: &DictionaryTranslator<'_>, payload: Payload) -> Result<String> {
        Ok(match payload {
            Payload::Text(text) => text,
            Payload::Unit => String::new(),
        })
    }
}

/// An unterminated frame at the very end of a piece of text. Followed by a
/// token it would read as a different token.
fn partial_frame_regex() -> &'static Regex {
    regex!(r"(?i)ZM[BCDFGHJKLMNPQRSTVWXY]*$")
}

/// Flatten segments into one string, allocating a token per marker in
/// encounter order.
///
/// Adjacent text segments are joined before escaping, so a look-alike split
/// across them is still caught.
pub fn encode<'a>(segments: Vec<Segment<'a>>) -> Encoded<'a> {
    let mut encoded = Encoded { text: String::new(), markers: Vec::new(), escaped: 0 };
    let mut pending = String::new();

    for segment in segments {
        match segment {
            Segment::Text(plain) => pending.push_str(&plain),
            Segment::Marker(marker) => {
                encoded.push_plain(&pending, true);
                pending.clear();
                encoded.push_marker(marker);
            }
        }
    }
    encoded.push_plain(&pending, false);

    encoded
}

impl<'a> Encoded<'a> {
    fn push_marker(&mut self, marker: Marker<'a>) {
        self.text.push_str(&encode_index(self.markers.len()));
        self.markers.push(marker);
    }

    fn escape(&mut self, found: &str) {
        self.push_marker(Marker::new(&VERBATIM, Payload::Text(found.to_owned())));
        self.escaped += 1;
    }

    fn push_plain(&mut self, plain: &str, before_marker: bool) {
        let mut last = 0;
        for m in frame_regex().find_iter(plain) {
            self.text.push_str(&plain[last..m.start()]);
            self.escape(m.as_str());
            last = m.end();
        }

        let rest = &plain[last..];
        match partial_frame_regex().find(rest) {
            Some(m) if before_marker => {
                self.text.push_str(&rest[..m.start()]);
                self.escape(m.as_str());
            }
            _ => self.text.push_str(rest),
        }
    }
}

/// Split translated text back into text and markers.
///
/// A token whose index was never allocated means the translator damaged a
/// protected span, and fails the call.
pub fn decode<'a>(text: &str, markers: &[Marker<'a>]) -> Result<Vec<Segment<'a>>> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in frame_regex().find_iter(text) {
        push_text(&mut out, text[last..m.start()].to_owned());
        let token = m.as_str();
        let index = decode_index(token).ok_or_else(|| Error::MalformedMarker { token: token.to_owned() })?;
        let marker = markers.get(index).ok_or_else(|| Error::MarkerOutOfRange {
            token: token.to_owned(),
            index,
            count: markers.len(),
        })?;
        out.push(Segment::Marker(marker.clone()));
        last = m.end();
    }
    push_text(&mut out, text[last..].to_owned());

    Ok(out)
}
