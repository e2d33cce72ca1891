use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, Instrument};

/// A simulated counterparty reply: runs `reply` once after `delay`.
///
/// Dropping the handle aborts the reply if it has not completed, so a reply
/// can never act on a session that has been reset or torn down.
#[derive(Debug)]
pub struct ScheduledReply {
    label: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledReply {
    pub fn after<F>(delay: Duration, label: &'static str, reply: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let span = info_span!("scheduled_reply", label, delay_ms = delay.as_millis() as u64);
        let handle = tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                debug!("Reply due");
                reply.await;
            }
            .instrument(span),
        );
        Self { label, handle }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledReply {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(label = self.label, "Cancelling scheduled reply");
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let reply = ScheduledReply::after(Duration::from_secs(2), "test", async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(reply.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let reply = ScheduledReply::after(Duration::from_secs(2), "test", async move {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(reply.label(), "test");
        drop(reply);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
