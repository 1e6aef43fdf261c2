//! Terminal progress bar fed from a [`ProgressHandle`].

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tc_av::ProgressHandle;
use tokio::task::JoinHandle;

const REFRESH: Duration = Duration::from_millis(200);

/// Create the encode progress bar, sized in milliseconds of output.
pub fn encode_bar(total_ms: u64) -> ProgressBar {
    if total_ms == 0 {
        let pb = ProgressBar::new_spinner();
        pb.set_message("encoding");
        return pb;
    }
    let pb = ProgressBar::new(total_ms);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% (eta {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb
}

/// Poll `handle` until aborted, mirroring the encoder position on `pb`.
pub fn spawn(handle: ProgressHandle, pb: ProgressBar) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH);
        loop {
            ticker.tick().await;
            if handle.total_ms() == 0 {
                pb.tick();
            } else {
                pb.set_position(handle.elapsed_ms().min(handle.total_ms()));
            }
        }
    })
}
