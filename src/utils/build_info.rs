use std::fmt;

/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "listing_wizard {} ({} {})",
            self.version, self.git_hash, self.git_status
        )?;
        writeln!(
            f,
            "built {} for {} [{}]",
            self.timestamp, self.target, self.profile
        )?;
        write!(f, "{}", self.rustc)
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("LISTING_CORE_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("LISTING_CORE_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("LISTING_CORE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("LISTING_CORE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("LISTING_CORE_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("LISTING_CORE_BUILD_RUSTC").unwrap_or("unknown"),
    }
}
