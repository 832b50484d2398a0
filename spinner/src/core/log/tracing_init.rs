// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

use crate::{DisplayPreference, TracingConfig, WriterConfig, ok,
            rolling_file_appender_impl};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Global default subscriber, which once set, can't be unset or changed. This is great
/// for apps.
///
/// Logging is disabled if the level filter is [`LevelFilter::OFF`].
///
/// # Errors
///
/// If a layer can't be created, or a global default is already set.
pub fn try_initialize_logging_global(options: impl Into<TracingConfig>) -> miette::Result<()> {
    let it: TracingConfig = options.into();

    // Early return if the level filter is off.
    if matches!(it.get_level_filter(), LevelFilter::OFF) {
        return ok!();
    }

    it.install_global()
}

/// Thread local subscriber, which lasts until the returned guard is dropped. This is
/// great for tests.
///
/// Logging is disabled (and [None] is returned) if the level filter is
/// [`LevelFilter::OFF`].
///
/// # Errors
///
/// If a layer can't be created.
pub fn try_initialize_logging_thread_local(
    options: impl Into<TracingConfig>,
) -> miette::Result<Option<dispatcher::DefaultGuard>> {
    let it: TracingConfig = options.into();

    // Early return if the level filter is off.
    if matches!(it.get_level_filter(), LevelFilter::OFF) {
        return Ok(None);
    }

    it.install_thread_local().map(Some)
}

/// Returns the layers. This does not initialize the tracing system. Don't forget to do
/// this manually, by calling `init` on the returned layers.
///
/// For example, once you have the layers, you can run the following:
/// `try_create_layers(..).map(|layers|
/// tracing_subscriber::registry().with(layers).init());`
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter from the tracing configuration. This is needed if you add
    // more layers, like OpenTelemetry, which don't have a level filter.
    return_it.push(Box::new(level_filter));

    if let Some(layer) =
        try_create_display_layer(level_filter, tracing_config.get_writer_config())?
    {
        return_it.push(layer);
    }

    if let Some(layer) =
        try_create_file_layer(level_filter, tracing_config.get_writer_config())?
    {
        return_it.push(layer);
    }

    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// This is useful for composition of layers. There's more info in the docs
/// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
///
/// # Errors
///
/// Never, for now. The signature matches [`try_create_file_layer`].
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    // Shared configuration regardless of where logs are output to.
    let fmt_layer = create_fmt!();

    // Configure the writer based on the desired log target, and return it.
    Ok(match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
            DisplayPreference::SpinnerWriter(intercept_writer) => {
                let tracing_writer = move || -> Box<dyn std::io::Write> {
                    Box::new(intercept_writer.clone())
                };
                Some(Box::new(
                    fmt_layer
                        .with_writer(tracing_writer)
                        .with_filter(level_filter),
                ))
            }
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    })
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// If the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    // Shared configuration regardless of where logs are output to.
    let fmt_layer = create_fmt!();

    // Configure the writer based on the desired log target, and return it.
    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, tracing_log_file_path_and_prefix)
        | WriterConfig::File(tracing_log_file_path_and_prefix) => {
            let file = rolling_file_appender_impl::try_create(
                tracing_log_file_path_and_prefix.as_str(),
            )?;
            Some(Box::new(
                fmt_layer
                    .with_ansi(false)
                    .with_writer(file)
                    .with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;
    use crate::{FixedTerminalSize, OutputDevice, OutputDeviceExt, Spinner, SpinnerColor,
                SpinnerConfig};

    #[test]
    fn test_try_create_display_layer() {
        let level_filter = LevelFilter::DEBUG;
        let writer_config = WriterConfig::Display(DisplayPreference::Stdout);
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(level_filter, writer_config).unwrap();

        assert!(layer.is_some());
    }

    #[test]
    fn test_try_create_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("my_temp_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let level_filter = LevelFilter::DEBUG;
        let writer_config = WriterConfig::File(file_path.clone());
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(level_filter, writer_config).unwrap();

        assert!(layer.is_some());
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_try_create_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("my_temp_log_file.log");
        let file_path = file_path.to_str().unwrap().to_string();

        let tracing_config =
            TracingConfig::new_file_and_display(Some(file_path.clone()), DisplayPreference::Stdout);

        let layers = try_create_layers(tracing_config).unwrap();
        assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_level_off_installs_nothing() {
        let tracing_config = TracingConfig {
            writer_config: WriterConfig::Display(DisplayPreference::Stdout),
            level_filter: LevelFilter::OFF,
        };
        let guard = try_initialize_logging_thread_local(tracing_config).unwrap();
        assert!(guard.is_none());
    }

    #[serial]
    #[test]
    fn test_global_subscriber_is_installed_once() {
        let tracing_config = || TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
        };
        assert!(try_initialize_logging_global(tracing_config()).is_ok());
        assert!(try_initialize_logging_global(tracing_config()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logs_go_through_spinner_writer() {
        let (stream, stdout_mock) = OutputDevice::new_mock_terminal();
        let mut spinner = Spinner::try_new(SpinnerConfig {
            text: "working".into(),
            stream,
            is_enabled: Some(true),
            discard_stdin: false,
            hide_cursor: false,
            color: SpinnerColor::Disabled,
            spinner: crate::FrameSet::try_new(["*"], std::time::Duration::from_secs(1))
                .unwrap()
                .into(),
            terminal_size: Arc::new(FixedTerminalSize::new(Some(80), Some(24))),
            ..Default::default()
        })
        .unwrap();

        let guard = TracingConfig {
            writer_config: WriterConfig::Display(DisplayPreference::SpinnerWriter(
                spinner.writer(),
            )),
            level_filter: LevelFilter::INFO,
        }
        .install_thread_local()
        .unwrap();

        spinner.start(None).unwrap();
        stdout_mock.clear();

        tracing::info!("hello from a log");

        // The log line is written in full, then the frame is drawn below it.
        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        let log_at = output.find("hello from a log").unwrap();
        let frame_at = output.rfind("* working").unwrap();
        assert!(log_at < frame_at);
        assert!(output.ends_with("* working"));

        spinner.stop().unwrap();
        drop(guard);
    }
}
