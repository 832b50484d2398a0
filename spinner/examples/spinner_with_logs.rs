// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Run with `cargo run --example spinner_with_logs`. Shows each built in frame set, then
//! a spinner that keeps its line while `tracing` logs scroll above it.

use std::{io::Write, time::Duration};

use miette::IntoDiagnostic;
use r3bl_spinner::{DisplayPreference, FrameSetName, OutputDevice, PersistOptions,
                   Spinner, SpinnerColor, SpinnerConfig, TextSource, TracingConfig,
                   try_initialize_logging_global};
use strum::IntoEnumIterator;
use tokio::time::{Instant, sleep};

const DEMO_DELAY: Duration = Duration::from_millis(1500);

#[tokio::main]
pub async fn main() -> miette::Result<()> {
    // Every frame set, one after another.
    for name in FrameSetName::iter() {
        let mut spinner = Spinner::try_new(SpinnerConfig {
            text: format!("Frame set: {name}"),
            spinner: name.into(),
            color: SpinnerColor::Magenta,
            ..Default::default()
        })?;
        spinner.start(None)?;
        sleep(DEMO_DELAY).await;
        spinner.succeed(None)?;
    }

    // Logs routed through the spinner, with a computed suffix.
    {
        let start = Instant::now();
        let mut spinner = Spinner::try_new(SpinnerConfig {
            text: "Connecting to 127.0.0.1:8000".into(),
            suffix_text: TextSource::computed(move || {
                Some(format!("[{}s]", start.elapsed().as_secs()))
            }),
            show_elapsed_time: true,
            ..Default::default()
        })?;

        try_initialize_logging_global(TracingConfig::new_display(
            DisplayPreference::SpinnerWriter(spinner.writer()),
        ))?;

        spinner.start(None)?;
        for attempt in 1..=5 {
            sleep(Duration::from_millis(700)).await;
            tracing::info!(message = "still trying", attempt);
        }

        // Plain output to stdout, while the spinner draws on stderr.
        let mut stdout = spinner.intercept(&OutputDevice::new_stdout());
        writeln!(stdout, "Handshake complete").into_diagnostic()?;

        spinner.set_text("Downloading\nthree lines\nof status");
        sleep(DEMO_DELAY).await;

        spinner.stop_and_persist(PersistOptions::new("🚀", "Connected"))?;
    }

    Ok(())
}
