use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    config::AppConfig,
    db::{Database, seed},
    error::AppResult,
    events::{EventNotifier, OrderEvent},
    services::notification_service,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub events: EventNotifier,
    /// Feed for the live event stream; lagging receivers drop events.
    pub live: broadcast::Sender<OrderEvent>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let db = Arc::new(Database::new());
        if config.seed_demo_data {
            seed::seed_demo_data(&db)?;
        }

        let (live, _) = broadcast::channel(config.event_buffer.max(1));
        let state = Self {
            db,
            events: EventNotifier::new(),
            live,
            config: Arc::new(config),
        };
        state.register_subscribers();
        Ok(state)
    }

    fn register_subscribers(&self) {
        let live = self.live.clone();
        self.events.subscribe_all(move |event| {
            // No open stream is not an error.
            let _ = live.send(event.clone());
            Ok(())
        });

        let db = Arc::clone(&self.db);
        self.events.subscribe_all(move |event| {
            notification_service::notify_order_event(&db, event)?;
            Ok(())
        });
    }
}
