// src/progress.rs
/// Lightweight progress reporting for a batch run.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of games.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One game assembled.
    fn item_done(&mut self, _game_id: &str) {}

    /// One game rejected; the batch carries on.
    fn item_failed(&mut self, _game_id: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Progress through the log macros.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Processing {total} game(s)");
    }

    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }

    fn item_done(&mut self, game_id: &str) {
        self.done += 1;
        logd!("[{}/{}] {game_id}", self.done + self.failed, self.total);
    }

    fn item_failed(&mut self, game_id: &str, reason: &str) {
        self.failed += 1;
        logd!("[{}/{}] {game_id} failed: {reason}", self.done + self.failed, self.total);
    }

    fn finish(&mut self) {
        logf!("Done: {} assembled, {} failed", self.done, self.failed);
    }
}
