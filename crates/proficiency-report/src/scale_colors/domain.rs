use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a competency framework in the host platform.
    FrameworkId
);
record_id!(
    /// Identifier of a single competency in the host platform.
    CompetencyId
);
record_id!(
    /// Identifier of a rating scale.
    ScaleId
);
record_id!(
    /// Position of a rating value within its scale.
    ScaleValueId
);

/// Framework record as exposed by the competency subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub id: FrameworkId,
    pub scale_id: ScaleId,
}

/// Competency record; `scale_id` is set only when it overrides the framework scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competency {
    pub id: CompetencyId,
    pub competency_framework_id: FrameworkId,
    #[serde(default)]
    pub scale_id: Option<ScaleId>,
}

/// Scales still referenced by a framework: its own scale plus every competency override.
pub fn reachable_scales(framework: &Framework, competencies: &[Competency]) -> BTreeSet<ScaleId> {
    let own: BTreeSet<ScaleId> = [framework.scale_id].into_iter().collect();
    let overrides: BTreeSet<ScaleId> = competencies
        .iter()
        .filter_map(|competency| competency.scale_id)
        .collect();
    own.union(&overrides).copied().collect()
}

/// Display color assigned to a rating value, normalized to lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScaleColor(String);

impl ScaleColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ScaleColor {
    type Err = ColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(raw.to_string()))?;

        if !matches!(digits.len(), 3 | 6) {
            return Err(ColorError::InvalidLength(raw.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(raw.to_string()));
        }

        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for ScaleColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScaleColor> for String {
    fn from(value: ScaleColor) -> Self {
        value.0
    }
}

impl fmt::Display for ScaleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    #[error("color '{0}' must have 3 or 6 hex digits")]
    InvalidLength(String),
    #[error("color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

/// Per-framework, per-scale mapping from rating value to display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleColorConfiguration {
    pub competency_framework_id: FrameworkId,
    pub scale_id: ScaleId,
    pub colors: BTreeMap<ScaleValueId, ScaleColor>,
}

impl ScaleColorConfiguration {
    pub fn key(&self) -> (FrameworkId, ScaleId) {
        (self.competency_framework_id, self.scale_id)
    }

    pub fn color_for(&self, value: ScaleValueId) -> Option<&ScaleColor> {
        self.colors.get(&value)
    }
}
