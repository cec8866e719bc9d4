//! Run Output Events
//!
//! Events are pushed by the run task as soon as output is read, so a
//! consumer sees program output while the interpreter is still running.

use tokio::sync::mpsc;

/// Unit of streamed information from a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// A line (or best-effort partial chunk) from the program's stdout
    Stdout(String),
    /// Program stderr, or a description of a failure to start the program
    Stderr(String),
    /// The run is over; always the last event of a run
    Completed,
}

impl OutputEvent {
    pub fn is_completed(&self) -> bool {
        matches!(self, OutputEvent::Completed)
    }

    /// Text carried by the event, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            OutputEvent::Stdout(text) | OutputEvent::Stderr(text) => Some(text),
            OutputEvent::Completed => None,
        }
    }
}

/// Sending half, held by the run task
#[derive(Debug, Clone)]
pub(crate) struct EventSender {
    run_id: String,
    tx: mpsc::UnboundedSender<OutputEvent>,
}

impl EventSender {
    pub(crate) fn emit(&self, event: OutputEvent) {
        // A dropped receiver only means nobody is listening any more.
        if self.tx.send(event).is_err() {
            trace!("Run {}: event receiver dropped", self.run_id);
        }
    }
}

/// Receiving half, handed to whoever started the run
#[derive(Debug)]
pub struct RunEvents {
    rx: mpsc::UnboundedReceiver<OutputEvent>,
    finished: bool,
}

impl RunEvents {
    /// Receive the next event, waiting if necessary
    ///
    /// Returns `None` once `Completed` has been delivered.
    pub async fn recv(&mut self) -> Option<OutputEvent> {
        if self.finished {
            return None;
        }
        let event = self.rx.recv().await?;
        self.finished = event.is_completed();
        Some(event)
    }

    /// Try to receive an event without waiting
    pub fn try_recv(&mut self) -> Option<OutputEvent> {
        if self.finished {
            return None;
        }
        let event = self.rx.try_recv().ok()?;
        self.finished = event.is_completed();
        Some(event)
    }

    /// Wait for the run to finish and return every event, `Completed` last
    pub async fn collect(mut self) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await {
            events.push(event);
        }
        events
    }

    /// Whether `Completed` has already been delivered
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Create a linked sender/receiver pair for one run
pub(crate) fn channel(run_id: &str) -> (EventSender, RunEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventSender {
            run_id: run_id.to_string(),
            tx,
        },
        RunEvents {
            rx,
            finished: false,
        },
    )
}
