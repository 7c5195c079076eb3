use pm_core::{Bucket, BucketKind, Squad};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};
use crate::error::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BucketRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub created_at: i64,
}

impl BucketRow {
    pub fn into_domain(self) -> Result<Bucket, DbError> {
        let name = BucketKind::parse(&self.name).ok_or_else(|| DbError::CorruptRow {
            table: "buckets",
            reason: format!("unknown bucket name '{}'", self.name),
        })?;

        Ok(Bucket {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            name,
            description: self.description,
            color: self.color,
            created_at: timestamp_to_datetime(self.created_at),
        })
    }
}

impl From<&Bucket> for BucketRow {
    fn from(bucket: &Bucket) -> Self {
        Self {
            id: bucket.id.to_string(),
            name: bucket.name.as_str().to_string(),
            description: bucket.description.clone(),
            color: bucket.color.clone(),
            created_at: datetime_to_timestamp(bucket.created_at),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SquadRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capacity: i64,
    pub created_at: i64,
}

impl SquadRow {
    pub fn into_domain(self) -> Squad {
        Squad {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            name: self.name,
            description: self.description,
            capacity: u32::try_from(self.capacity).unwrap_or(1).max(1),
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

impl From<&Squad> for SquadRow {
    fn from(squad: &Squad) -> Self {
        Self {
            id: squad.id.to_string(),
            name: squad.name.clone(),
            description: squad.description.clone(),
            capacity: i64::from(squad.capacity),
            created_at: datetime_to_timestamp(squad.created_at),
        }
    }
}
