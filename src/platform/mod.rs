//! Which download the catalog offers for this machine.

/// Catalog download key for the running architecture.
pub fn download_key() -> &'static str {
    download_key_for(std::env::consts::ARCH)
}

/// `linux` for x86_64, `linuxARM64` for aarch64. Other architectures fall
/// back to `linux` and fail later if the archive does not run.
pub fn download_key_for(arch: &str) -> &'static str {
    match arch {
        "aarch64" => "linuxARM64",
        _ => "linux",
    }
}
