use pm_core::{Bucket, BucketKind, MetricInputs, PriorityOrderer, Requirement, Squad};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbError;
use crate::repositories::{BucketRepository, RequirementRepository, SquadRepository};

const DEFAULT_SQUADS: [(&str, &str); 4] = [
    ("Frontend", "UI/UX development team"),
    ("Backend", "API and database team"),
    ("DevOps", "Infrastructure and deployment team"),
    ("QA", "Quality assurance team"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub buckets: usize,
    pub squads: usize,
    pub requirements: usize,
}

/// Insert the four buckets and the default squads into empty tables.
/// Tables that already hold rows are left alone.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<SeedReport, DbError> {
    let buckets = BucketRepository::new(pool.clone());
    let squads = SquadRepository::new(pool.clone());
    let mut report = SeedReport::default();

    if buckets.count().await? == 0 {
        for kind in BucketKind::ALL {
            buckets
                .create(&Bucket::new(kind, kind.default_description()))
                .await?;
            report.buckets += 1;
        }
    }

    if squads.count().await? == 0 {
        for (name, description) in DEFAULT_SQUADS {
            squads.create(&Squad::new(name, description)).await?;
            report.squads += 1;
        }
    }

    if report.buckets > 0 || report.squads > 0 {
        info!(buckets = report.buckets, squads = report.squads, "Seeded reference data");
    }
    Ok(report)
}

/// Insert the sample backlog when no requirement exists yet. Samples are
/// filed under the Feature bucket and the Frontend squad, with metrics
/// computed before they are written, followed by one re-rank.
pub async fn seed_sample_requirements(pool: &SqlitePool) -> Result<usize, DbError> {
    let requirements = RequirementRepository::new(pool.clone());
    if requirements.count().await? > 0 {
        return Ok(0);
    }

    let feature = BucketRepository::new(pool.clone())
        .find_all()
        .await?
        .into_iter()
        .find(|b| b.name == BucketKind::Feature);
    let frontend = SquadRepository::new(pool.clone())
        .find_all()
        .await?
        .into_iter()
        .find(|s| s.name == "Frontend");
    let (Some(feature), Some(frontend)) = (feature, frontend) else {
        return Ok(0);
    };

    let samples = [
        Requirement::new(
            "User Authentication System",
            "Implement a secure user authentication system with login, registration, and password reset functionality.",
            feature.id,
            frontend.id,
            MetricInputs::with_effort(20.0)
                .revenue(50000.0)
                .saving(20000.0)
                .clients(100, 1.5)
                .cost_per_man_day(500.0),
        ),
        Requirement::new(
            "Dashboard Analytics",
            "Create a dashboard with key performance indicators and analytics visualizations.",
            feature.id,
            frontend.id,
            MetricInputs::with_effort(15.0)
                .revenue(75000.0)
                .saving(30000.0)
                .clients(80, 2.0)
                .cost_per_man_day(500.0),
        ),
    ];

    let mut last = None;
    for sample in &samples {
        requirements.upsert(sample).await?;
        last = Some(sample.id);
    }

    if let Some(last) = last {
        PriorityOrderer::new(requirements)
            .reprioritize_after_insert(last)
            .await
            .map_err(|e| DbError::Seed(e.to_string()))?;
    }

    info!(count = samples.len(), "Seeded sample requirements");
    Ok(samples.len())
}

/// Reference data always, sample requirements when asked for.
pub async fn seed_database(pool: &SqlitePool, with_samples: bool) -> Result<SeedReport, DbError> {
    let mut report = seed_reference_data(pool).await?;
    if with_samples {
        report.requirements = seed_sample_requirements(pool).await?;
    }
    Ok(report)
}
