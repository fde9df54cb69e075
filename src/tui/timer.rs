use std::time::Duration;

use super::page::PageId;
use super::request::{UiRequest, UiSender};

/// One-shot timers that close popups after a delay.
///
/// There is no cancellation. A popup dismissed early makes the later close
/// request a no-op on the UI side.
#[derive(Clone)]
pub struct PopupTimer {
    tx: UiSender,
}

impl PopupTimer {
    pub fn new(tx: UiSender) -> Self {
        Self { tx }
    }

    pub fn schedule(&self, id: PageId, delay: Duration) {
        let tx = self.tx.clone();
        log::debug!("Scheduling close of {} in {:?}", id, delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(UiRequest::ClosePage(id.clone())).is_err() {
                log::debug!("UI gone before timer for {} fired", id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::request;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = request::channel();
        let timer = PopupTimer::new(tx);
        let started = tokio::time::Instant::now();

        timer.schedule(PageId::new("timeout-popup 0"), Duration::from_secs(5));

        let request = rx.recv().await;
        assert_eq!(request, Some(UiRequest::ClosePage(PageId::new("timeout-popup 0"))));
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_dropped_is_silent() {
        let (tx, rx) = request::channel();
        drop(rx);
        PopupTimer::new(tx).schedule(PageId::new("gone"), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
