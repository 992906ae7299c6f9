use serde::Serialize;

/// Build metadata. The git commit and build date are only known when the
/// build sets `IRON_GIT_COMMIT` and `IRON_BUILD_DATE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_commit: &'static str,
    pub build_date: &'static str,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionFormat {
    #[default]
    Full,
    Short,
    Json,
}

impl VersionFormat {
    /// `--json` wins over `--short`.
    #[must_use]
    pub fn from_flags(json: bool, short: bool) -> Self {
        match (json, short) {
            (true, _) => VersionFormat::Json,
            (false, true) => VersionFormat::Short,
            (false, false) => VersionFormat::Full,
        }
    }
}

impl BuildInfo {
    #[must_use]
    pub fn current() -> Self {
        BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            git_commit: option_env!("IRON_GIT_COMMIT").unwrap_or("unknown"),
            build_date: option_env!("IRON_BUILD_DATE").unwrap_or("unknown"),
            platform: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }

    #[must_use]
    pub fn full(&self) -> String {
        format!(
            "iron {} (commit {}, built {}) {}",
            self.version, self.git_commit, self.build_date, self.platform
        )
    }

    /// # Errors
    ///
    /// Only fails if serialization fails, which a plain struct of strings
    /// does not.
    pub fn render(&self, format: VersionFormat) -> serde_json::Result<String> {
        Ok(match format {
            VersionFormat::Full => self.full(),
            VersionFormat::Short => self.version.to_string(),
            VersionFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> BuildInfo {
        BuildInfo {
            version: "1.2.3",
            git_commit: "abc1234",
            build_date: "2024-05-01",
            platform: "linux/x86_64".to_string(),
        }
    }

    #[test]
    fn formats() {
        let info = info();

        assert_eq!(
            info.render(VersionFormat::Full).unwrap(),
            "iron 1.2.3 (commit abc1234, built 2024-05-01) linux/x86_64"
        );
        assert_eq!(info.render(VersionFormat::Short).unwrap(), "1.2.3");
    }

    #[test]
    fn flags() {
        assert_eq!(VersionFormat::from_flags(false, false), VersionFormat::Full);
        assert_eq!(VersionFormat::from_flags(false, true), VersionFormat::Short);
        assert_eq!(VersionFormat::from_flags(true, true), VersionFormat::Json);
    }

    #[test]
    fn json() {
        let json = info().render(VersionFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], "1.2.3");
        assert_eq!(value["git_commit"], "abc1234");
        assert_eq!(value["build_date"], "2024-05-01");
        assert_eq!(value["platform"], "linux/x86_64");
        assert!(json.contains('\n'));
    }

    #[test]
    fn current_uses_package_version() {
        let info = BuildInfo::current();

        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.platform.contains('/'));
    }
}
