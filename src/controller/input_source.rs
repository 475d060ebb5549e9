use std::collections::VecDeque;

use tracing::debug;

use super::input_event::InputEvent;

/// Blocking producer of input event batches.
///
/// `None` signals end of stream. An empty batch means nothing arrived before
/// the poll timeout and gives the caller a chance to check for an interrupt.
pub trait InputSource {
    fn next_batch(&mut self) -> Option<Vec<InputEvent>>;
}

/// Replays a fixed list of batches, then reports end of stream
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    batches: VecDeque<Vec<InputEvent>>,
}

impl ScriptedSource {
    pub fn new(batches: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// One event per batch
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self::new(events.into_iter().map(|event| vec![event]))
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl InputSource for ScriptedSource {
    fn next_batch(&mut self) -> Option<Vec<InputEvent>> {
        let batch = self.batches.pop_front();
        if let Some(events) = &batch {
            debug!("Replaying scripted batch of {} events", events.len());
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DeviceId;

    #[test]
    fn scripted_source_ends_after_last_batch() {
        let mut source = ScriptedSource::from_events([
            InputEvent::DeviceRemoved { device: DeviceId(1) },
            InputEvent::DeviceRemoved { device: DeviceId(2) },
        ]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_batch().unwrap().len(), 1);
        assert_eq!(source.next_batch().unwrap().len(), 1);
        assert!(source.next_batch().is_none());
        assert!(source.next_batch().is_none());
    }
}
