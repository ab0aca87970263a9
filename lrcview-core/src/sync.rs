use crate::lrc::LrcDocument;
use crate::tracker::{HighlightSink, Marker, SeekSink};
use tokio::sync::broadcast;
use tracing::debug;

const LOG_TARGET: &str = "lrcview::sync";

const CHANNEL_CAPACITY: usize = 64;

/// Events emitted towards the renderer and the player
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightEvent {
    /// A new document replaced the previous one; all markers are stale
    DocumentLoaded { lines: usize, words: usize },
    /// The highlight was applied to a target
    Highlighted(Marker),
    /// The highlight was removed from a target
    Cleared(Marker),
    /// A line or word was activated and playback should jump to its start
    SeekRequested { time: f64 },
}

/// Broadcasts tracker transitions so a renderer on another task can follow them.
///
/// Implements both [`HighlightSink`] and [`SeekSink`], so it can be handed
/// straight to `Tracker::update` and `Tracker::seek`.
#[derive(Debug, Clone)]
pub struct HighlightChannel {
    event_tx: broadcast::Sender<HighlightEvent>,
}

impl HighlightChannel {
    #[must_use]
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { event_tx }
    }

    /// Subscribe to highlight events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HighlightEvent> {
        self.event_tx.subscribe()
    }

    /// Announce a document swap
    pub fn document_loaded(&self, document: &LrcDocument) {
        debug!(
            target: LOG_TARGET,
            "Document loaded: {} lines, {} words",
            document.line_count(),
            document.word_count()
        );
        self.emit(HighlightEvent::DocumentLoaded {
            lines: document.line_count(),
            words: document.word_count(),
        });
    }

    fn emit(&self, event: HighlightEvent) {
        // No subscribers is not an error
        let _ = self.event_tx.send(event);
    }
}

impl Default for HighlightChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightSink for HighlightChannel {
    fn apply_marker(&mut self, marker: Marker) {
        self.emit(HighlightEvent::Highlighted(marker));
    }

    fn clear_marker(&mut self, marker: Marker) {
        self.emit(HighlightEvent::Cleared(marker));
    }
}

impl SeekSink for HighlightChannel {
    fn seek(&mut self, time: f64) {
        self.emit(HighlightEvent::SeekRequested { time });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::tracker::Tracker;
    use tokio::sync::broadcast::error::TryRecvError;

    const EXAMPLE: &str = "[00:01]<00:01>Hel-lo <00:02>world\n[00:05]<00:05>Bye";

    fn drain(rx: &mut broadcast::Receiver<HighlightEvent>) -> Vec<HighlightEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return events,
                Err(TryRecvError::Lagged(n)) => panic!("lagged by {n} events"),
            }
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let mut channel = HighlightChannel::new();
        channel.apply_marker(Marker::Line(0));
        channel.seek(1.0);
    }

    #[test]
    fn test_tracker_transitions_broadcast() {
        let doc = LrcDocument::parse(EXAMPLE);
        let mut channel = HighlightChannel::new();
        let mut rx = channel.subscribe();
        let mut tracker = Tracker::new(&doc, &TrackerConfig::default());

        channel.document_loaded(&doc);
        tracker.update(1.5, &mut channel);
        tracker.update(1.6, &mut channel);
        tracker.update(2.5, &mut channel);

        assert_eq!(
            drain(&mut rx),
            vec![
                HighlightEvent::DocumentLoaded { lines: 2, words: 3 },
                HighlightEvent::Highlighted(Marker::Line(0)),
                HighlightEvent::Highlighted(Marker::Word(0)),
                HighlightEvent::Cleared(Marker::Word(0)),
                HighlightEvent::Highlighted(Marker::Word(1)),
            ]
        );
    }

    #[tokio::test]
    async fn test_seek_request_reaches_subscriber() {
        let doc = LrcDocument::parse(EXAMPLE);
        let mut channel = HighlightChannel::new();
        let mut rx = channel.subscribe();
        let tracker = Tracker::new(&doc, &TrackerConfig::default());

        let task = tokio::spawn(async move { rx.recv().await });

        assert_eq!(tracker.seek(Marker::Word(2), &mut channel), Some(5.0));
        let event = task.await.unwrap().unwrap();
        assert_eq!(event, HighlightEvent::SeekRequested { time: 5.0 });
    }
}
