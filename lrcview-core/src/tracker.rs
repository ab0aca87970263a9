use crate::config::TrackerConfig;
use crate::lrc::{LrcDocument, LrcLine};
use crate::search::search_time_before;
use crate::time::format_timestamp;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const LOG_TARGET: &str = "lrcview::tracker";

/// Stable identifier of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Line index within the document
    Line(usize),
    /// Global word slot: words of all preceding lines plus the index within the line
    Word(usize),
}

/// Render capability that shows and hides the highlight on a target
pub trait HighlightSink {
    fn apply_marker(&mut self, marker: Marker);
    fn clear_marker(&mut self, marker: Marker);
}

/// Playback collaborator that receives seek requests
pub trait SeekSink {
    fn seek(&mut self, time: f64);
}

/// Highlight state of one track (lines or words)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    Unhighlighted,
    Highlighted(Marker),
}

impl HighlightState {
    #[must_use]
    pub const fn marker(self) -> Option<Marker> {
        match self {
            Self::Unhighlighted => None,
            Self::Highlighted(marker) => Some(marker),
        }
    }

    /// Move the highlight to `target`, clearing the previous one first.
    /// Returns false without touching the sink if `target` is already highlighted.
    fn transition(&mut self, target: Marker, sink: &mut impl HighlightSink) -> bool {
        match *self {
            Self::Highlighted(current) if current == target => return false,
            Self::Highlighted(current) => sink.clear_marker(current),
            Self::Unhighlighted => {}
        }
        sink.apply_marker(target);
        *self = Self::Highlighted(target);
        true
    }
}

/// Line and word resolved for one time sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivePosition {
    /// Active line index, `None` before the first line starts
    pub line: Option<usize>,
    /// Active word index within `line`, `None` before its first word starts
    /// or when word-level tracking is off
    pub word: Option<usize>,
}

/// Maps playback time to the active line and word of a borrowed document,
/// keeping at most one highlighted line and one highlighted word.
///
/// Single-threaded: `update` is expected to be driven from one playback-time
/// signal and never called concurrently.
#[derive(Debug)]
pub struct Tracker<'a> {
    document: &'a LrcDocument,
    word_level: bool,
    /// Number of words before each line, for line/word to slot translation
    word_offsets: Vec<usize>,
    line_state: HighlightState,
    word_state: HighlightState,
}

impl<'a> Tracker<'a> {
    #[must_use]
    pub fn new(document: &'a LrcDocument, config: &TrackerConfig) -> Self {
        let mut tracker = Self {
            document,
            word_level: config.word_level,
            word_offsets: Vec::new(),
            line_state: HighlightState::Unhighlighted,
            word_state: HighlightState::Unhighlighted,
        };
        tracker.reset();
        tracker
    }

    /// Swap in a new document. All state derived from the previous one is
    /// discarded before this returns.
    pub fn set_document(&mut self, document: &'a LrcDocument) {
        self.document = document;
        self.reset();
        debug!(
            target: LOG_TARGET,
            "Tracking new document with {} lines, {} words",
            document.line_count(),
            self.word_count()
        );
    }

    /// Recompute the word offsets and forget both highlights
    pub fn reset(&mut self) {
        self.word_offsets = word_offsets(self.document);
        self.line_state = HighlightState::Unhighlighted;
        self.word_state = HighlightState::Unhighlighted;
    }

    #[must_use]
    pub const fn document(&self) -> &'a LrcDocument {
        self.document
    }

    #[must_use]
    pub const fn word_level(&self) -> bool {
        self.word_level
    }

    #[must_use]
    pub const fn line_state(&self) -> HighlightState {
        self.line_state
    }

    #[must_use]
    pub const fn word_state(&self) -> HighlightState {
        self.word_state
    }

    /// Index of the last line starting at or before `time`
    #[must_use]
    pub fn locate_line(&self, time: f64) -> Option<usize> {
        search_time_before(&self.document.lines, time)
    }

    /// Index within `line` of the last word starting at or before `time`
    #[must_use]
    pub fn locate_word(&self, line: usize, time: f64) -> Option<usize> {
        let line = self.document.lines.get(line)?;
        search_time_before(&line.words, time)
    }

    /// Global word slot of word `word` in line `line`
    #[must_use]
    pub fn word_slot(&self, line: usize, word: usize) -> Option<usize> {
        if word >= self.document.lines.get(line)?.word_count() {
            return None;
        }
        Some(self.word_offsets.get(line)? + word)
    }

    /// Inverse of [`Self::word_slot`]: `(line, word)` for a global slot
    #[must_use]
    pub fn slot_position(&self, slot: usize) -> Option<(usize, usize)> {
        if slot >= self.word_count() {
            return None;
        }
        // Empty lines share the next line's offset, so the last line whose
        // offset is <= slot is the one holding the word
        let line = self
            .word_offsets
            .partition_point(|&offset| offset <= slot)
            .checked_sub(1)?;
        Some((line, slot - self.word_offsets.get(line)?))
    }

    /// Resolve `time` and move the highlights to match.
    ///
    /// The sink is only called when a resolved target differs from the one
    /// already highlighted. A line or word that resolves to nothing leaves
    /// the existing highlight in place.
    pub fn update(&mut self, time: f64, sink: &mut impl HighlightSink) -> ActivePosition {
        let Some(line) = self.locate_line(time) else {
            trace!(target: LOG_TARGET, "No line started at {}", format_timestamp(time));
            return ActivePosition::default();
        };

        if self.line_state.transition(Marker::Line(line), sink) {
            trace!(target: LOG_TARGET, "Line {} active at {}", line, format_timestamp(time));
        }

        if !self.word_level {
            return ActivePosition {
                line: Some(line),
                word: None,
            };
        }

        // Before the first word of a line starts, the previous word stays lit
        let word = self.locate_word(line, time);
        if let Some(slot) = word.and_then(|word| self.word_slot(line, word)) {
            self.word_state.transition(Marker::Word(slot), sink);
        }

        ActivePosition {
            line: Some(line),
            word,
        }
    }

    /// Start time of the line or word behind `marker`
    #[must_use]
    pub fn marker_time(&self, marker: Marker) -> Option<f64> {
        match marker {
            Marker::Line(index) => self.document.lines.get(index).map(|line| line.time),
            Marker::Word(slot) => {
                let (line, word) = self.slot_position(slot)?;
                self.document
                    .lines
                    .get(line)?
                    .words
                    .get(word)
                    .map(|word| word.time)
            }
        }
    }

    /// Forward the start time of `marker` to the player, e.g. when a word is clicked
    pub fn seek(&self, marker: Marker, player: &mut impl SeekSink) -> Option<f64> {
        let time = self.marker_time(marker)?;
        debug!(target: LOG_TARGET, "Seeking to {:?} at {}", marker, format_timestamp(time));
        player.seek(time);
        Some(time)
    }

    fn word_count(&self) -> usize {
        self.word_offsets.last().map_or(0, |&offset| {
            offset + self.document.lines.last().map_or(0, LrcLine::word_count)
        })
    }
}

fn word_offsets(document: &LrcDocument) -> Vec<usize> {
    document
        .lines
        .iter()
        .scan(0, |total, line| {
            let offset = *total;
            *total += line.word_count();
            Some(offset)
        })
        .collect()
}
