//! Progress reporting channel between the engine and the surrounding UI.
//!
//! The engine is a library; it does not render progress itself. Providers
//! push `ProgressUpdate`s into an unbounded channel and the embedding
//! application (bot, TUI) decides how to display them. Sends are
//! fire-and-forget: a closed or ignored receiver never blocks or fails a
//! download.

use tokio::sync::mpsc;

/// Progress information emitted during a transfer.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Transfer progress percentage (0-100); 0 while the total is unknown
    pub percent: u8,
    /// Bytes written so far
    pub downloaded_bytes: u64,
    /// Total bytes expected, when the server reported a length
    pub total_bytes: Option<u64>,
}

/// Sending side handed to providers.
pub type ProgressSink = mpsc::UnboundedSender<ProgressUpdate>;

/// Create a progress channel pair.
///
/// Callers that do not care about progress can drop the receiver; the
/// engine's sends become no-ops.
pub fn progress_channel() -> (ProgressSink, mpsc::UnboundedReceiver<ProgressUpdate>) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_with_dropped_receiver_does_not_panic() {
        let (tx, rx) = progress_channel();
        drop(rx);
        // Engine code ignores the send result; mirror that here.
        let _ = tx.send(ProgressUpdate {
            percent: 50,
            downloaded_bytes: 1024,
            total_bytes: Some(2048),
        });
    }

    #[tokio::test]
    async fn test_updates_arrive_in_order() {
        let (tx, mut rx) = progress_channel();
        for percent in [5u8, 10, 100] {
            let _ = tx.send(ProgressUpdate {
                percent,
                downloaded_bytes: u64::from(percent) * 10,
                total_bytes: Some(1000),
            });
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(update) = rx.recv().await {
            seen.push(update.percent);
        }
        assert_eq!(seen, vec![5, 10, 100]);
    }
}
