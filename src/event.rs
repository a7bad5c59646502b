use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::{AppError, Result};

/// Events driving the `watch` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Periodic wakeup used to fire pending reveals.
    Tick,
    /// The session file changed on disk.
    SessionChanged,
    /// Ctrl-C or another shutdown request.
    Quit,
}

/// Async event source that merges ticks, watcher events and ctrl-c into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tick_tx = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        let quit_tx = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = quit_tx.send(Event::Quit);
            }
        });

        Self { rx, tx }
    }

    /// Sender for other producers such as the session watcher.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or(AppError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_arrive() {
        let mut events = EventHandler::new(Duration::from_millis(5));
        assert_eq!(events.next().await.unwrap(), Event::Tick);
    }

    #[tokio::test]
    async fn test_external_senders_are_merged() {
        let mut events = EventHandler::new(Duration::from_secs(3600));
        // the interval fires immediately once
        assert_eq!(events.next().await.unwrap(), Event::Tick);
        events.sender().send(Event::SessionChanged).unwrap();
        assert_eq!(events.next().await.unwrap(), Event::SessionChanged);
    }
}
