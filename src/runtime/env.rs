//! Environment lookups.

use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn home_dir_impl(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_home_dir() {
        let runtime = RealRuntime;

        // CI containers may run without a home directory
        let home = runtime.home_dir();
        assert!(home.is_some() || cfg!(target_os = "linux"));
    }
}
