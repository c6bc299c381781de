//! Version command implementation

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit hash injected at build time
pub fn commit() -> &'static str {
    option_env!("KUBEGUARD_COMMIT").unwrap_or("unknown")
}

/// Build date injected at build time
pub fn build_date() -> &'static str {
    option_env!("KUBEGUARD_BUILD_DATE").unwrap_or("unknown")
}

pub fn version_string() -> String {
    format!(
        "kubeguard {}\ncommit: {}\nbuilt: {}",
        VERSION,
        commit(),
        build_date()
    )
}

pub fn show_version() {
    println!("{}", version_string());
}
