use db::{
    BucketRepository, PrdRepository, RequirementRepository, SquadRepository, TestCaseRepository,
};
use drafting::DraftAssembler;
use pm_core::PriorityOrderer;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub requirement_repository: RequirementRepository,
    pub bucket_repository: BucketRepository,
    pub squad_repository: SquadRepository,
    pub prd_repository: PrdRepository,
    pub test_case_repository: TestCaseRepository,
    pub orderer: Arc<PriorityOrderer<RequirementRepository>>,
    pub assembler: Arc<DraftAssembler>,
    /// Held from the PRD existence check until the new PRD is stored.
    pub prd_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, assembler: DraftAssembler) -> Self {
        let requirement_repository = RequirementRepository::new(pool.clone());

        Self {
            orderer: Arc::new(PriorityOrderer::new(requirement_repository.clone())),
            requirement_repository,
            bucket_repository: BucketRepository::new(pool.clone()),
            squad_repository: SquadRepository::new(pool.clone()),
            prd_repository: PrdRepository::new(pool.clone()),
            test_case_repository: TestCaseRepository::new(pool),
            assembler: Arc::new(assembler),
            prd_guard: Arc::new(Mutex::new(())),
        }
    }
}
