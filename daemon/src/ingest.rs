/// Line ingestion: feeds the handoff queue from a line-oriented input.
///
/// Reads happen on a dedicated OS thread. A blocking stdin read cannot be
/// cancelled, so keeping it off the runtime means shutdown never waits for
/// the user to press enter.
use std::future::Future;
use std::io::BufRead;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// One slot in the handoff queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Line(String),
    /// End of stream. The dispatcher stops as soon as it pops this.
    Sentinel,
}

pub type Sender = mpsc::UnboundedSender<Entry>;
pub type Receiver = mpsc::UnboundedReceiver<Entry>;

/// Creates the FIFO handoff queue between ingestion and the dispatcher.
pub fn queue() -> (Sender, Receiver) {
    mpsc::unbounded_channel()
}

/// A running reader thread and the sender used to terminate the stream.
pub struct Ingestion {
    tx: Sender,
    input_closed: oneshot::Receiver<()>,
}

impl Ingestion {
    /// Starts reading `input` on its own thread, pushing each line onto `tx`
    /// in the order it was read.
    pub fn start<R>(input: R, tx: Sender) -> std::io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (closed_tx, input_closed) = oneshot::channel();
        let reader_tx = tx.clone();

        std::thread::Builder::new()
            .name("catcher-ingest".to_string())
            .spawn(move || {
                read_lines(input, &reader_tx);
                let _ = closed_tx.send(());
            })?;

        Ok(Self { tx, input_closed })
    }

    /// Waits for `shutdown` or the end of input, whichever comes first, then
    /// pushes the sentinel exactly once.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = shutdown => info!("Interrupt received, draining..."),
            _ = self.input_closed => debug!("input closed"),
        }
        // Fails only if the dispatcher is already gone.
        let _ = self.tx.send(Entry::Sentinel);
    }
}

/// Forwards every newline-terminated chunk of `input`. Undecodable bytes are
/// replaced rather than rejected; only end of input or a hard read error
/// stops the reader.
fn read_lines<R: BufRead>(mut input: R, tx: &Sender) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                if tx.send(Entry::Line(decode_line(&buf))).is_err() {
                    // Dispatcher has stopped; nobody is listening.
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to read input, treating it as closed: {e}");
                return;
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
