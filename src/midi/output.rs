//! MIDI output port handling on top of midir
//!
//! The port is either picked by a configured name fragment or, when none is
//! configured, interactively: the available ports are listed and the user
//! types the index of the one to use.

use std::io::{BufRead, Write};

use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;
use tracing::{debug, info};

use super::message::MidiMessage;
use super::sink::{MessageSink, SinkError};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to initialize MIDI output: {0}")]
    Init(String),

    #[error("No MIDI output ports available")]
    NoPorts,

    #[error("No MIDI output port matches {0:?}")]
    NoMatch(String),

    #[error("Invalid port selection {0:?}")]
    InvalidSelection(String),

    #[error("Failed to connect to MIDI port {port}: {reason}")]
    Connect { port: String, reason: String },

    #[error("Prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),
}

const UNNAMED_PORT: &str = "<unnamed port>";

/// One display name per entry of `ports`, index for index
fn port_names<P, E>(ports: &[P], name_of: impl Fn(&P) -> Result<String, E>) -> Vec<String> {
    ports
        .iter()
        .map(|port| name_of(port).unwrap_or_else(|_| UNNAMED_PORT.to_string()))
        .collect()
}

/// Picks a port index out of `names`.
///
/// With `preferred` set, the first name containing it (case-insensitive) wins.
/// Otherwise the ports are listed on `output` as `i: name` and an index is
/// read from `input` after a `> ` prompt.
pub fn choose_port<R: BufRead, W: Write>(
    names: &[String],
    preferred: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<usize, OutputError> {
    if names.is_empty() {
        return Err(OutputError::NoPorts);
    }

    if let Some(wanted) = preferred {
        let needle = wanted.to_lowercase();
        return names
            .iter()
            .position(|name| name.to_lowercase().contains(&needle))
            .ok_or_else(|| OutputError::NoMatch(wanted.to_string()));
    }

    for (index, name) in names.iter().enumerate() {
        writeln!(output, "{index}: {name}")?;
    }
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    match answer.parse::<usize>() {
        Ok(index) if index < names.len() => Ok(index),
        _ => Err(OutputError::InvalidSelection(answer.to_string())),
    }
}

/// Open connection to a MIDI output port
pub struct MidiOutSink {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidiOutSink {
    /// Opens the port chosen by [`choose_port`]
    pub fn open<R: BufRead, W: Write>(
        client_name: &str,
        preferred: Option<&str>,
        input: &mut R,
        output: &mut W,
    ) -> Result<Self, OutputError> {
        let midi_out =
            MidiOutput::new(client_name).map_err(|e| OutputError::Init(e.to_string()))?;
        let ports = midi_out.ports();
        let names = port_names(&ports, |port| midi_out.port_name(port));
        debug!("Found {} MIDI output ports: {:?}", names.len(), names);

        let index = choose_port(&names, preferred, input, output)?;
        let port_name = names[index].clone();

        let connection = midi_out
            .connect(&ports[index], &format!("{client_name}-out"))
            .map_err(|e| OutputError::Connect {
                port: port_name.clone(),
                reason: e.to_string(),
            })?;

        info!("Connected to MIDI output port {}", port_name);
        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn close(self) {
        info!("Closing MIDI output port {}", self.port_name);
        self.connection.close();
    }
}

impl MessageSink for MidiOutSink {
    fn send(&mut self, message: &MidiMessage) -> Result<(), SinkError> {
        let bytes = message.to_bytes()?;
        debug!("MIDI out: {} {:02X?}", message, bytes);
        self.connection
            .send(&bytes)
            .map_err(|e| SinkError::Send(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn names() -> Vec<String> {
        vec![
            "Midi Through:Midi Through Port-0 14:0".to_string(),
            "loopMIDI Port".to_string(),
            "FluidSynth virtual port".to_string(),
        ]
    }

    #[test]
    fn prompt_lists_ports_and_reads_index() {
        let mut input = Cursor::new("2\n");
        let mut output = Vec::new();
        let index = choose_port(&names(), None, &mut input, &mut output).unwrap();
        assert_eq!(index, 2);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("0: Midi Through"));
        assert!(shown.contains("1: loopMIDI Port\n"));
        assert!(shown.ends_with("> "));
    }

    #[test]
    fn prompt_rejects_out_of_range_and_garbage() {
        let mut output = Vec::new();
        let err = choose_port(&names(), None, &mut Cursor::new("3\n"), &mut output);
        assert!(matches!(err, Err(OutputError::InvalidSelection(s)) if s == "3"));

        let err = choose_port(&names(), None, &mut Cursor::new("abc\n"), &mut output);
        assert!(matches!(err, Err(OutputError::InvalidSelection(_))));
    }

    #[test]
    fn preferred_name_matches_case_insensitively() {
        let mut output = Vec::new();
        let index = choose_port(
            &names(),
            Some("fluidsynth"),
            &mut Cursor::new(""),
            &mut output,
        )
        .unwrap();
        assert_eq!(index, 2);
        assert!(output.is_empty());
    }

    #[test]
    fn preferred_name_without_match_fails() {
        let err = choose_port(&names(), Some("nope"), &mut Cursor::new(""), &mut Vec::new());
        assert!(matches!(err, Err(OutputError::NoMatch(s)) if s == "nope"));
    }

    #[test]
    fn names_line_up_with_enumerated_ports() {
        let ports = ["a", "", "c"];
        let names = port_names(&ports, |port| {
            if port.is_empty() {
                Err(())
            } else {
                Ok(port.to_uppercase())
            }
        });
        assert_eq!(names, vec!["A", UNNAMED_PORT, "C"]);

        let index = choose_port(&names, Some("c"), &mut Cursor::new(""), &mut Vec::new()).unwrap();
        assert_eq!(ports[index], "c");
    }

    #[test]
    fn empty_port_list_fails() {
        let err = choose_port(&[], None, &mut Cursor::new("0\n"), &mut Vec::new());
        assert!(matches!(err, Err(OutputError::NoPorts)));
    }
}
