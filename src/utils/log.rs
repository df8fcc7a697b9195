//! Verbose diagnostics, enabled by `--verbose` through `FVU_VERBOSE`.

pub const VERBOSE_ENV: &str = "FVU_VERBOSE";

pub fn is_verbose() -> bool {
    std::env::var_os(VERBOSE_ENV).is_some()
}

pub fn verbose(message: impl AsRef<str>) {
    if is_verbose() {
        eprintln!("[VERBOSE] {}", message.as_ref());
    }
}
