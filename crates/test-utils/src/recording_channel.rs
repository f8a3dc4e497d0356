use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use runner::deliver::{DeliveryChannel, DeliveryError, DeliveryFuture};
use runner::report::Report;

/// How a [`RecordingChannel`] responds to `deliver`.
#[derive(Debug, Clone)]
pub enum Behaviour {
    Succeed,
    /// Fail with a `Transport` error carrying this message.
    Fail(String),
    /// Sleep this long before succeeding.
    Slow(Duration),
}

/// A delivery channel that records every report it was handed.
#[derive(Clone)]
pub struct RecordingChannel {
    name: &'static str,
    behaviour: Behaviour,
    timeout: Duration,
    calls: Arc<AtomicUsize>,
    reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str, behaviour: Behaviour) -> Self {
        Self {
            name,
            behaviour,
            timeout: runner::deliver::DEFAULT_CHANNEL_TIMEOUT,
            calls: Arc::default(),
            reports: Arc::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    /// Boxed clone sharing the same counters, ready for a channel list.
    pub fn boxed(&self) -> Box<dyn DeliveryChannel> {
        Box::new(self.clone())
    }
}

impl DeliveryChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reports.lock().unwrap().push(report.clone());

        Box::pin(async move {
            match &self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail(message) => Err(DeliveryError::Transport {
                    channel: self.name,
                    message: message.clone(),
                }),
                Behaviour::Slow(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(())
                }
            }
        })
    }
}
