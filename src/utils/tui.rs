use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/", " "])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run `task` with a spinner on stderr; the spinner disappears when it ends.
pub async fn with_spinner<F: Future>(message: impl Into<String>, task: F) -> F::Output {
    let spinner = create_spinner(message.into());
    let output = task.await;
    spinner.finish_and_clear();
    output
}
