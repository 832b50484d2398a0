// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Create a (never rolling) file appender that writes to `path_str`.
///
/// Note that if you wrap this up in a non blocking writer, the log lines are only
/// written when the guard is dropped, which is not what you want for a short lived CLI.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(&path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access the folder of {}. It might not exist, or you may not have the required permissions.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't get a file name from {}. Provide a path to a file, not a folder.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_file_name_is_an_error() {
        assert!(try_create("/").is_err());
    }

    #[test]
    fn test_creates_file_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("spinner.log");
        let file_path = file_path.to_str().unwrap();

        let appender = try_create(file_path);
        assert!(appender.is_ok());
        assert!(std::path::Path::new(file_path).exists());
    }
}
