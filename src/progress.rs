// src/progress.rs
/// Lightweight progress reporting for a scrape run.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called once rows are located, with the number of rows.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn status(&mut self, _msg: &str) {}

    /// Row `index` has been read (kept or dropped).
    fn entry_done(&mut self, _index: usize) {}

    /// Image work starts for `total` records.
    fn begin_images(&mut self, _total: usize) {}

    /// Image for record `index` finished; `ok` is false when it will be `null`.
    fn image_done(&mut self, _index: usize, _ok: bool) {}

    /// Record `index` has no photo link, so nothing was fetched.
    fn image_skipped(&mut self, _index: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Shorter-lived copy of an optional sink, for handing down to a callee
/// while keeping the original usable afterwards.
pub fn reborrow<'a>(progress: &'a mut Option<&mut dyn Progress>) -> Option<&'a mut dyn Progress> {
    progress.as_mut().map(|p| &mut **p as &mut dyn Progress)
}

/// Counters in the shape the UI shows: entries, images, totals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub total: usize,
    pub entries: usize,
    pub image_total: usize,
    pub images: usize,
    pub images_failed: usize,
    pub images_skipped: usize,
    pub last_status: String,
    pub finished: bool,
}

impl ProgressCounts {
    /// Overall percentage: rows and images count for half each.
    pub fn percent(&self) -> u8 {
        if self.finished {
            return 100;
        }
        let half = |done: usize, of: usize| if of == 0 { 0 } else { done.min(of) * 50 / of };
        (half(self.entries, self.total) + half(self.images, self.image_total)) as u8
    }
}

impl Progress for ProgressCounts {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn status(&mut self, msg: &str) { self.last_status = s!(msg); }
    fn entry_done(&mut self, _index: usize) { self.entries += 1; }
    fn begin_images(&mut self, total: usize) { self.image_total = total; }
    fn image_done(&mut self, _index: usize, ok: bool) {
        self.images += 1;
        if !ok { self.images_failed += 1; }
    }
    fn image_skipped(&mut self, _index: usize) {
        self.images += 1;
        self.images_skipped += 1;
    }
    fn finish(&mut self) { self.finished = true; }
}
