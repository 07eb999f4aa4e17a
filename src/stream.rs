use crate::event::Event;
use crate::kind::EventKind;
use serde::Serialize;

/// Ordered, re-iterable sequence of events. The stream owns every event;
/// consumers only borrow.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EventStream {
    events: Vec<Event>,
}

impl EventStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Events of one kind, with their stream positions
    pub fn by_kind(&self, kind: EventKind) -> impl Iterator<Item = (usize, &Event)> {
        self.events
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.kind == kind)
    }

    pub fn pauses(&self) -> impl Iterator<Item = (usize, &Event)> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.is_pausing())
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Events that carry a real timestamp, i.e. excluding headers and discardable lines
    pub fn timed(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.kind.is_timed())
    }
}

impl<'a> IntoIterator for &'a EventStream {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl From<Vec<Event>> for EventStream {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Duration;

    #[test]
    fn test_stream_is_reiterable_and_filterable() {
        let stream = EventStream::from(vec![
            Event::new(EventKind::HeaderMemory, 0, "Memory: 4k page"),
            Event::new(EventKind::ParNew, 10, "a").with_duration(Duration::from_millis(3)),
            Event::new(EventKind::CmsConcurrent, 20, "b"),
            Event::new(EventKind::ParNew, 30, "c").with_duration(Duration::from_millis(4)),
        ]);

        assert_eq!(stream.len(), 4);
        assert_eq!(stream.iter().count(), stream.iter().count());
        let positions: Vec<usize> = stream.by_kind(EventKind::ParNew).map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(stream.pauses().count(), 2);
        assert_eq!(stream.timed().count(), 3);
        assert_eq!(stream.count_of(EventKind::CmsConcurrent), 1);
        assert_eq!((&stream).into_iter().last().map(|e| e.timestamp_ms), Some(30));
    }
}
