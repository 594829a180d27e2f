use std::sync::Arc;

use crate::remote::TodoBackend;
use crate::services::CalendarPage;

#[derive(Clone)]
pub struct AppState {
    pub page: Arc<CalendarPage>,
}

impl AppState {
    pub fn new(backend: Arc<dyn TodoBackend>) -> Self {
        Self {
            page: Arc::new(CalendarPage::new(backend)),
        }
    }
}
