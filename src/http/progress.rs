use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Cumulative download percentage redrawn on a single terminal line.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// A bar sized from `Content-Length`.
    pub fn new(total: u64, visible: bool) -> Self {
        let bar = ProgressBar::new(total);
        if visible {
            if let Ok(style) = ProgressStyle::with_template("{percent}% {bytes}/{total_bytes}") {
                bar.set_style(style);
            }
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(self) {
        self.bar.finish();
    }
}
