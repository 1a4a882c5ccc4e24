use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::event::TracingEventPublisher;
use adapter::repository::court::CourtRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::schedule_block::ScheduleBlockRepositoryImpl;
use kernel::event::EventPublisher;
use kernel::repository::court::CourtRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::schedule_block::ScheduleBlockRepository;
use kernel::service::pricing::PricingEngine;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    court_repository: Arc<dyn CourtRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    schedule_block_repository: Arc<dyn ScheduleBlockRepository>,
    pricing_engine: Arc<PricingEngine>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let court_repository = Arc::new(CourtRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let schedule_block_repository = Arc::new(ScheduleBlockRepositoryImpl::new(pool.clone()));
        let pricing_engine = Arc::new(PricingEngine::new(app_config.pricing));
        let event_publisher = Arc::new(TracingEventPublisher);
        Self {
            health_check_repository,
            court_repository,
            reservation_repository,
            schedule_block_repository,
            pricing_engine,
            event_publisher,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn court_repository(&self) -> Arc<dyn CourtRepository> {
        self.court_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn schedule_block_repository(&self) -> Arc<dyn ScheduleBlockRepository> {
        self.schedule_block_repository.clone()
    }

    pub fn pricing_engine(&self) -> Arc<PricingEngine> {
        self.pricing_engine.clone()
    }

    pub fn event_publisher(&self) -> Arc<dyn EventPublisher> {
        self.event_publisher.clone()
    }
}
