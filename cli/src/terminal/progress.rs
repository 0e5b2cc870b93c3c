use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mnat_core::pool::ResolutionProgress;

/// Hidden until the first lookup completes, so nothing is drawn during the sweep.
pub struct ResolutionBar {
    bar: ProgressBar,
}

impl ResolutionBar {
    pub fn new() -> Self {
        let bar: ProgressBar = ProgressBar::hidden();
        let style: ProgressStyle =
            ProgressStyle::with_template("{spinner:.blue} resolving {bar:30.green/white} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_strings(&[
                    "▁▁▁▁▁",
                    "▁▂▂▂▁",
                    "▁▄▂▄▁",
                    "▂▄▆▄▂",
                    "▄▆█▆▄",
                    "▂▄▆▄▂",
                    "▁▄▂▄▁",
                    "▁▂▂▂▁",
                ]);
        bar.set_style(style);

        Self { bar }
    }

    pub fn callback(&self) -> impl Fn(&ResolutionProgress<'_>) + Send + Sync + 'static {
        let bar: ProgressBar = self.bar.clone();
        move |progress: &ResolutionProgress<'_>| {
            if bar.is_hidden() {
                bar.set_length(progress.total as u64);
                bar.set_draw_target(ProgressDrawTarget::stderr());
                bar.enable_steady_tick(Duration::from_millis(100));
            }
            bar.set_position(progress.completed as u64);
            bar.println(progress_line(progress));
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// `[i/total] ip -> mac -> hostname`
pub fn progress_line(progress: &ResolutionProgress<'_>) -> String {
    format!(
        "[{}/{}] {} -> {} -> {}",
        progress.completed, progress.total, progress.device.ip, progress.device.mac, progress.device.hostname
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
