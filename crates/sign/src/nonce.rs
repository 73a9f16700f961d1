//! Background nonce generation for request envelopes.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Number of nonces buffered ahead of demand.
const NONCE_BUFFER: usize = 32;

/// A shared source of request nonces.
///
/// [`NonceSource::spawn`] starts one background task that keeps a bounded
/// buffer of random non-negative `i64` values topped up, so request paths
/// never wait on generation. A draw equal to the immediately preceding one
/// is discarded before buffering; that is cheap de-duplication against a
/// stuck generator, not a uniqueness guarantee. Handles are cheap to clone
/// and share the buffer; the producer task exits once every handle has
/// been dropped.
#[derive(Debug, Clone)]
pub struct NonceSource {
    rx: Arc<Mutex<mpsc::Receiver<i64>>>,
}

impl NonceSource {
    /// Start the producer task and return a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(NONCE_BUFFER);
        tokio::spawn(produce(tx));
        Self { rx: Arc::new(Mutex::new(rx)) }
    }

    /// Draw the next nonce, waiting until one is buffered.
    pub async fn next(&self) -> i64 {
        // The producer holds its sender until every handle is dropped, so
        // the channel cannot close while `self` exists.
        self.rx.lock().await.recv().await.unwrap_or_default()
    }
}

async fn produce(tx: mpsc::Sender<i64>) {
    let mut rng = StdRng::from_entropy();
    let mut last = 0i64;
    loop {
        let nonce = rng.gen_range(0..=i64::MAX);
        if nonce == last {
            continue;
        }
        last = nonce;
        if tx.send(nonce).await.is_err() {
            break;
        }
    }
}
