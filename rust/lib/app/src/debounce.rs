use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Trailing-edge debounce keyed by input name.
///
/// Every call to [`settle`](Debouncer::settle) supersedes the previous one
/// on the same channel; only the last caller in a burst gets `true`.
pub struct Debouncer {
    delay: Duration,
    generations: Mutex<HashMap<String, u64>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: Mutex::new(HashMap::new()),
        }
    }

    fn bump(&self, channel: &str) -> u64 {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        let generation = generations.entry(channel.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn current(&self, channel: &str) -> u64 {
        self.generations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(channel)
            .copied()
            .unwrap_or(0)
    }

    /// Wait out the delay. `true` when no newer call arrived meanwhile.
    pub async fn settle(&self, channel: &str) -> bool {
        let generation = self.bump(channel);
        tokio::time::sleep(self.delay).await;
        self.current(channel) == generation
    }
}
