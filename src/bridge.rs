//! Bridge - the event loop tying an input source to a MIDI sink
//!
//! ```text
//! InputSource ─[Vec<InputEvent>]→ EventMapper + ChannelRegistry ─[MidiMessage]→ MessageSink
//! ```
//!
//! The loop runs on a single thread. Interrupts are observed before every
//! batch and between events, never in the middle of one event's messages.
//! Any fault ends the loop and is handed back to the caller unchanged.

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::{InputEvent, InputSource};
use crate::mapping::{ChannelRegistry, EventMapper, MappingError};
use crate::midi::{MessageSink, SinkError};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Why [`Bridge::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    EndOfStream,
    Interrupted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub events: u64,
    pub messages: u64,
}

#[derive(Debug, Default)]
pub struct Bridge {
    registry: ChannelRegistry,
    mapper: EventMapper,
    stats: BridgeStats,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Maps one event and sends its messages in order
    pub fn handle_event<K: MessageSink + ?Sized>(
        &mut self,
        event: &InputEvent,
        sink: &mut K,
    ) -> Result<(), BridgeError> {
        let messages = self.mapper.map(event, &mut self.registry)?;
        self.stats.events += 1;

        for message in &messages {
            debug!("Sending {}", message);
            sink.send(message)?;
            self.stats.messages += 1;
        }
        Ok(())
    }

    /// Pulls batches from `source` until it ends or `cancel` fires
    pub fn run<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, BridgeError>
    where
        S: InputSource + ?Sized,
        K: MessageSink + ?Sized,
    {
        info!("Starting bridge loop");

        let mut window = BridgeStats::default();
        let mut last_log_time = Local::now();
        let log_interval = chrono::Duration::seconds(10);

        loop {
            if cancel.is_cancelled() {
                info!("Bridge interrupted, {} events handled", self.stats.events);
                return Ok(RunOutcome::Interrupted);
            }

            let Some(batch) = source.next_batch() else {
                info!("Input stream ended, {} events handled", self.stats.events);
                return Ok(RunOutcome::EndOfStream);
            };

            for event in &batch {
                if cancel.is_cancelled() {
                    info!("Bridge interrupted, {} events handled", self.stats.events);
                    return Ok(RunOutcome::Interrupted);
                }
                let before = self.stats;
                if let Err(e) = self.handle_event(event, sink) {
                    error!("Failed to handle event from device {}: {}", event.device(), e);
                    return Err(e);
                }
                window.events += self.stats.events - before.events;
                window.messages += self.stats.messages - before.messages;
            }

            let now = Local::now();
            if now - last_log_time > log_interval {
                info!(
                    "Bridge stats: {} events -> {} messages in last {} seconds, {} devices active",
                    window.events,
                    window.messages,
                    log_interval.num_seconds(),
                    self.registry.active_count()
                );
                window = BridgeStats::default();
                last_log_time = now;
            }
        }
    }
}

/// Runs a fresh [`Bridge`] over `source` and `sink`
pub fn run<S, K>(
    source: &mut S,
    sink: &mut K,
    cancel: &CancellationToken,
) -> Result<(RunOutcome, BridgeStats), BridgeError>
where
    S: InputSource + ?Sized,
    K: MessageSink + ?Sized,
{
    let mut bridge = Bridge::new();
    let outcome = bridge.run(source, sink, cancel)?;
    Ok((outcome, bridge.stats()))
}
