use crate::{
    observers::observer::ResourceObserver,
    resource::{event::ResourceEvent, handle::Resource},
    sync::types::{RcMutex, rc_mutex_new},
};

pub type EventLog = RcMutex<Vec<String>>;

pub fn event_log() -> EventLog {
    rc_mutex_new(Vec::new())
}

/// Writes every callback it gets into a log that may be shared with others.
pub struct RecordingObserver {
    name: String,
    log: EventLog,
}

impl RecordingObserver {
    pub fn new(name: &str) -> Self {
        Self::with_log(name, &event_log())
    }

    pub fn with_log(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl ResourceObserver for RecordingObserver {
    fn resource_changed(&self, _resource: &Resource, event: ResourceEvent) {
        self.log.lock().push(format!("{}: {event}", self.name));
    }

    fn resource_request_progress(&self, _resource: &Resource, progress: f64) {
        self.log
            .lock()
            .push(format!("{}: progress {progress}", self.name));
    }

    fn stopped_observing_resource(&self, _resource: &Resource) {
        self.log.lock().push(format!("{}: stopped", self.name));
    }
}
