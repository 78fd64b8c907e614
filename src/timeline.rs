use chrono::NaiveTime;

use crate::config::{Break, Slot};

/// One entry of the day-independent timeline, borrowed from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Session(&'a Slot),
    Break(&'a Break),
}

impl<'a> Event<'a> {
    pub fn start(&self) -> NaiveTime {
        match self {
            Event::Session(slot) => slot.start,
            Event::Break(entry) => entry.start,
        }
    }

    pub fn end(&self) -> NaiveTime {
        match self {
            Event::Session(slot) => slot.end,
            Event::Break(entry) => entry.end,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Event::Break(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timeline<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> Timeline<'a> {
    /// Stable sort by start time. Equal starts keep the order they arrived in.
    pub fn sorted(mut events: Vec<Event<'a>>) -> Self {
        events.sort_by_key(Event::start);
        Self { events }
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event<'a>> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<Event<'a>> {
        self.events
    }
}

pub struct TimelineBuilder<'a> {
    slots: &'a [Slot],
    breaks: &'a [Break],
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(slots: &'a [Slot], breaks: &'a [Break]) -> Self {
        Self { slots, breaks }
    }

    /// Sessions are queued ahead of breaks before sorting, which makes a
    /// session win any tie on start time.
    pub fn build(&self) -> Timeline<'a> {
        let mut events = Vec::with_capacity(self.slots.len() + self.breaks.len());
        events.extend(self.slots.iter().map(Event::Session));
        events.extend(self.breaks.iter().map(Event::Break));

        let timeline = Timeline::sorted(events);
        tracing::debug!(
            sessions = self.slots.len(),
            breaks = self.breaks.len(),
            "timeline built"
        );
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_timeline() {
        let timeline = TimelineBuilder::new(&[], &[]).build();
        assert!(timeline.is_empty());
    }

    #[test]
    fn break_only_timeline_is_ordered() {
        let breaks = vec![
            Break::new("Tea", t(15, 0), t(15, 15)),
            Break::new("Coffee", t(10, 30), t(10, 45)),
        ];
        let timeline = TimelineBuilder::new(&[], &breaks).build();
        let names: Vec<_> = timeline
            .iter()
            .map(|e| match e {
                Event::Break(b) => b.name.as_str(),
                Event::Session(_) => "session",
            })
            .collect();
        assert_eq!(names, vec!["Coffee", "Tea"]);
    }

    #[test]
    fn equal_breaks_keep_configured_order() {
        let breaks = vec![
            Break::new("First", t(12, 0), t(12, 30)),
            Break::new("Second", t(12, 0), t(13, 0)),
        ];
        let timeline = TimelineBuilder::new(&[], &breaks).build();
        assert_eq!(timeline.events()[0], Event::Break(&breaks[0]));
        assert_eq!(timeline.events()[1], Event::Break(&breaks[1]));
    }
}
