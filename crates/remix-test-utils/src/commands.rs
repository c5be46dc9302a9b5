//! Stand-in build commands with a chosen outcome.
//!
//! Each helper returns a `(program, args)` pair that runs through `sh -c`, so
//! tests can drive a real subprocess without a bundler installed.

/// A command that exits 0 and writes nothing to stderr.
pub fn succeeding() -> (String, Vec<String>) {
    shell("exit 0")
}

/// A command that exits with `code` after printing `message` to stderr.
pub fn failing(code: i32, message: &str) -> (String, Vec<String>) {
    shell(&format!("echo '{message}' >&2; exit {code}"))
}

/// A command that exits 0 but reports `message` on stderr.
///
/// The build pipeline treats any stderr output as failure.
pub fn noisy(message: &str) -> (String, Vec<String>) {
    shell(&format!("echo '{message}' >&2; exit 0"))
}

/// A command that writes the `PORT` and `REMIX_BUILD_TARGET` it received to
/// `file` in its working directory.
pub fn record_env(file: &str) -> (String, Vec<String>) {
    shell(&format!(
        "printf '%s %s' \"$PORT\" \"$REMIX_BUILD_TARGET\" > {file}"
    ))
}

/// An arbitrary shell script.
pub fn shell(script: &str) -> (String, Vec<String>) {
    ("sh".to_string(), vec!["-c".to_string(), script.to_string()])
}
