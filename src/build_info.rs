use serde::Serialize;

/// Build-time metadata exposed at runtime.
pub const BUILD_VERSION: &str = env!("APP_BUILD_VERSION");
pub const BUILD_COMMIT: &str = env!("APP_BUILD_COMMIT");
pub const BUILD_TIMESTAMP: &str = env!("APP_BUILD_TIMESTAMP");

/// Snapshot reported by `/health` and `check-config`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub package: &'static str,
    pub version: &'static str,
    pub build: &'static str,
    pub commit: &'static str,
    pub built_at: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        package: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build: BUILD_VERSION,
        commit: BUILD_COMMIT,
        built_at: BUILD_TIMESTAMP,
    }
}

/// Human-readable summary combining Cargo version and build metadata.
pub fn summary() -> String {
    let info = current();
    format!(
        "{} {} (build {}, commit {}, built at {})",
        info.package, info.version, info.build, info.commit, info.built_at
    )
}
