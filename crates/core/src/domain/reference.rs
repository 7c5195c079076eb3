use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_BUCKET_COLOR: &str = "#3498db";
/// Man-days per sprint a squad can absorb.
pub const DEFAULT_SQUAD_CAPACITY: u32 = 50;

/// The closed set of requirement categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum BucketKind {
    Feature,
    Bug,
    Change,
    Capability,
}

impl BucketKind {
    pub const ALL: [BucketKind; 4] = [
        BucketKind::Feature,
        BucketKind::Bug,
        BucketKind::Change,
        BucketKind::Capability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::Bug => "Bug",
            Self::Change => "Change",
            Self::Capability => "Capability",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Feature" => Some(Self::Feature),
            "Bug" => Some(Self::Bug),
            "Change" => Some(Self::Change),
            "Capability" => Some(Self::Capability),
            _ => None,
        }
    }

    pub fn default_description(&self) -> &'static str {
        match self {
            Self::Feature => "New functionality to be added to the product",
            Self::Bug => "Issues that need to be fixed",
            Self::Change => "Modifications to existing functionality",
            Self::Capability => "Enhancements to existing features",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Bucket {
    pub id: Uuid,
    pub name: BucketKind,
    pub description: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    pub fn new(name: BucketKind, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: description.into(),
            color: DEFAULT_BUCKET_COLOR.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Squad {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
}

impl Squad {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            capacity: DEFAULT_SQUAD_CAPACITY,
            created_at: Utc::now(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}
