use crate::error::KubescoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kubernetes platform version. Only major and minor take part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
}

impl PlatformVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for PlatformVersion {
    type Err = KubescoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || KubescoreError::InvalidVersion(input.to_string());
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let mut parts = trimmed.split('.');
        let major = parts
            .next()
            .and_then(|part| part.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|part| part.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        // patch is accepted but ignored
        if let Some(patch) = parts.next() {
            if patch.parse::<u32>().is_err() {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { major, minor })
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for PlatformVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlatformVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of supported platform versions. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub min: Option<PlatformVersion>,
    pub max: Option<PlatformVersion>,
}

impl VersionRange {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn since(min: PlatformVersion) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    #[cfg(test)]
    pub const fn until(max: PlatformVersion) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    #[cfg(test)]
    pub const fn between(min: PlatformVersion, max: PlatformVersion) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn contains(&self, version: PlatformVersion) -> bool {
        self.min.map_or(true, |min| version >= min) && self.max.map_or(true, |max| version <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_minor_with_optional_prefix_and_patch() {
        assert_eq!(
            "1.18".parse::<PlatformVersion>().expect("should parse"),
            PlatformVersion::new(1, 18)
        );
        assert_eq!(
            "v1.29.3".parse::<PlatformVersion>().expect("should parse"),
            PlatformVersion::new(1, 29)
        );
    }

    #[test]
    fn rejects_malformed_versions() {
        for input in ["", "1", "one.two", "1.x", "1.2.3.4", "1.2.beta"] {
            assert!(
                matches!(
                    input.parse::<PlatformVersion>(),
                    Err(KubescoreError::InvalidVersion(_))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn ordering_compares_minor_numerically() {
        assert!(PlatformVersion::new(1, 9) < PlatformVersion::new(1, 10));
        assert!(PlatformVersion::new(1, 30) < PlatformVersion::new(2, 0));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = VersionRange::between(PlatformVersion::new(1, 19), PlatformVersion::new(1, 25));
        assert!(!range.contains(PlatformVersion::new(1, 18)));
        assert!(range.contains(PlatformVersion::new(1, 19)));
        assert!(range.contains(PlatformVersion::new(1, 25)));
        assert!(!range.contains(PlatformVersion::new(1, 26)));
    }

    #[test]
    fn unbounded_sides_always_match() {
        assert!(VersionRange::unbounded().contains(PlatformVersion::new(0, 1)));
        assert!(VersionRange::since(PlatformVersion::new(1, 19)).contains(PlatformVersion::new(9, 0)));
        assert!(VersionRange::until(PlatformVersion::new(1, 18)).contains(PlatformVersion::new(1, 0)));
    }

    #[test]
    fn inverted_range_is_not_well_formed() {
        let range = VersionRange::between(PlatformVersion::new(1, 20), PlatformVersion::new(1, 19));
        assert!(!range.is_well_formed());
        assert!(VersionRange::unbounded().is_well_formed());
    }
}
