use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Errors parsing a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The version text was empty.
    #[error("empty version")]
    Empty,

    /// A component was not a decimal number.
    #[error("invalid version component '{0}'")]
    InvalidComponent(String),
}

/// A numeric `major.minor.patch` version.
///
/// Ordering is numeric per component, so `18.10` sorts after `18.2` and `9`
/// before `10`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component, zero when absent.
    pub minor: u64,
    /// Patch component, zero when absent.
    pub patch: u64,
}

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Shorthand for `major.minor.0`.
    pub const fn minor(major: u64, minor: u64) -> Self {
        Self::new(major, minor, 0)
    }

    /// Shorthand for `major.0.0`.
    pub const fn major(major: u64) -> Self {
        Self::new(major, 0, 0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    /// Accepts `.` or `_` separators (`17_5` is how iOS spells `17.5`). Only
    /// the first three components are read.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(s.split(['.', '_'])) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::InvalidComponent(part.to_owned()));
            }
            *slot = part
                .parse()
                .map_err(|_| VersionError::InvalidComponent(part.to_owned()))?;
        }

        let [major, minor, patch] = components;
        Ok(Self::new(major, minor, patch))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_versions() {
        assert_eq!("17".parse(), Ok(Version::major(17)));
        assert_eq!("17.4".parse(), Ok(Version::minor(17, 4)));
        assert_eq!("17_5".parse(), Ok(Version::minor(17, 5)));
        assert_eq!("128.0.0.0".parse(), Ok(Version::major(128)));
        assert_eq!("10.15.7".parse(), Ok(Version::new(10, 15, 7)));
    }

    #[test]
    fn compares_numerically() {
        let v = |s: &str| s.parse::<Version>().unwrap();
        assert!(v("18.10") > v("18.2"));
        assert!(v("9") < v("10"));
        assert!(v("17.4") >= v("17.4.0"));
        assert!(v("18.1.1") < v("18.2"));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!("".parse::<Version>(), Err(VersionError::Empty));
        assert_eq!(
            "x86_64".parse::<Version>(),
            Err(VersionError::InvalidComponent("x86".into()))
        );
        assert_eq!(
            "17.".parse::<Version>(),
            Err(VersionError::InvalidComponent(String::new()))
        );
    }
}
