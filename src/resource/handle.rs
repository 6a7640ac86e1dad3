use std::{fmt, rc::Rc, time::Instant};

use parking_lot::Mutex;

use crate::{
    observers::{
        closure_observer::ClosureObserver,
        identity::{Identity, OwnerHandle},
        observer::ResourceObserver,
        registry::ObserverRegistry,
    },
    sync::types::MutexGuard,
};

use super::{entity::Entity, error::RequestError, event::ResourceEvent};

#[derive(Default)]
struct LoadState {
    requests_in_flight: usize,
    latest_data: Option<Rc<Entity>>,
    latest_error: Option<RequestError>,
    timestamp: Option<Instant>,
}

struct ResourceState {
    url: String,
    observers: Mutex<ObserverRegistry>,
    load: Mutex<LoadState>,
}

/// A long-lived entity that observers can watch.
///
/// Cloning yields another handle to the same resource. Every observer entry
/// holds such a handle, so a resource lives at least as long as it is watched.
/// All access is expected to come from a single thread.
#[derive(Clone)]
pub struct Resource {
    state: Rc<ResourceState>,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            state: Rc::new(ResourceState {
                url: url.into(),
                observers: Mutex::new(ObserverRegistry::new()),
                load: Mutex::new(LoadState::default()),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.state.url
    }

    pub fn identity(&self) -> Identity {
        Identity::of_rc(&self.state)
    }

    /// Number of stored observer entries, including ones not yet found defunct.
    pub fn observer_count(&self) -> usize {
        self.state.observers.lock().len()
    }

    pub fn is_loading(&self) -> bool {
        self.state.load.lock().requests_in_flight > 0
    }

    pub fn latest_data(&self) -> Option<Rc<Entity>> {
        self.state.load.lock().latest_data.clone()
    }

    pub fn latest_error(&self) -> Option<RequestError> {
        self.state.load.lock().latest_error.clone()
    }

    /// When data was last received or confirmed unchanged.
    pub fn timestamp(&self) -> Option<Instant> {
        self.state.load.lock().timestamp
    }

    /// Subscribes `observer` on behalf of `owner`.
    ///
    /// Adding an already subscribed observer only records the extra owner.
    /// A newly subscribed observer gets `ObserverAdded` before this returns;
    /// nobody else hears about it.
    pub fn add_observer(
        &self,
        observer: Rc<dyn ResourceObserver>,
        owner: impl Into<OwnerHandle>,
    ) -> &Self {
        let owner = owner.into();
        let is_new = self.with_registry(|registry| registry.add(self, &observer, owner));

        if is_new {
            tracing::debug!(
                url = %self.url(),
                observers = self.observer_count(),
                "observer added"
            );
            observer.resource_changed(self, ResourceEvent::ObserverAdded);
        }

        self
    }

    /// Subscribes an observer that owns itself. It is held weakly, so it stays
    /// subscribed only while something else keeps it alive.
    pub fn add_self_owned_observer(&self, observer: Rc<dyn ResourceObserver>) -> &Self {
        let owner = OwnerHandle::new(&observer);
        self.add_observer(observer, owner)
    }

    /// Subscribes `function` for as long as `owner` is alive.
    pub fn add_observer_fn(
        &self,
        owner: impl Into<OwnerHandle>,
        function: impl Fn(&Resource, ResourceEvent) + 'static,
    ) -> &Self {
        self.add_observer(Rc::new(ClosureObserver::new(function)), owner)
    }

    /// Drops `owner` from every observer, then evicts whatever became defunct.
    pub fn remove_observers_owned_by(&self, owner: impl Into<OwnerHandle>) {
        self.remove_observers_owned_by_opt(Some(owner.into()));
    }

    pub fn remove_observers_owned_by_opt(&self, owner: Option<OwnerHandle>) {
        let Some(owner) = owner else {
            return;
        };

        self.with_registry(|registry| registry.remove_owner(&owner));
        self.collect_defunct_observers();
    }

    /// Evicts every observer that nobody wants anymore, telling the ones that
    /// are still around that they stopped observing.
    pub fn collect_defunct_observers(&self) {
        // observers that lose their last strong reference here must be gone
        // before liveness is checked
        self.with_registry(ObserverRegistry::recompute_all);

        let (evicted, stopped) = self.with_registry(|registry| {
            let before = registry.len();
            let stopped = registry.collect_defunct();
            (before - registry.len(), stopped)
        });

        if evicted > 0 {
            tracing::debug!(
                url = %self.url(),
                evicted,
                remaining = self.observer_count(),
                "evicted defunct observers"
            );
        }

        for observer in stopped {
            observer.stopped_observing_resource(self);
        }
    }

    /// Liveness is sampled once, before the first delivery.
    pub(crate) fn notify_observers(&self, event: ResourceEvent) {
        self.collect_defunct_observers();

        let observers = self.with_registry(|registry| registry.live_observers());
        tracing::trace!(
            url = %self.url(),
            %event,
            observers = observers.len(),
            "notifying observers"
        );

        for observer in observers {
            observer.resource_changed(self, event);
        }
    }

    pub fn report_request_progress(&self, progress: f64) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };

        let observers = self.with_registry(|registry| registry.live_observers());
        for observer in observers {
            observer.resource_request_progress(self, progress);
        }
    }

    pub fn request_started(&self) {
        self.state.load.lock().requests_in_flight += 1;
        self.notify_observers(ResourceEvent::Requested);
    }

    pub fn request_cancelled(&self) {
        self.finish_request(|_| ());
        self.notify_observers(ResourceEvent::RequestCancelled);
    }

    pub fn request_succeeded(&self, entity: Entity) {
        self.finish_request(|load| {
            load.latest_data = Some(Rc::new(entity));
            load.latest_error = None;
            load.timestamp = Some(Instant::now());
        });
        self.notify_observers(ResourceEvent::NewData);
    }

    pub fn request_not_modified(&self) {
        self.finish_request(|load| {
            load.latest_error = None;
            load.timestamp = Some(Instant::now());
        });
        self.notify_observers(ResourceEvent::NotModified);
    }

    pub fn request_failed(&self, error: RequestError) {
        tracing::debug!(url = %self.url(), %error, "request failed");
        self.finish_request(|load| load.latest_error = Some(error));
        self.notify_observers(ResourceEvent::Error);
    }

    fn finish_request(&self, update: impl FnOnce(&mut LoadState)) {
        let mut load = self.state.load.lock();
        load.requests_in_flight = load.requests_in_flight.saturating_sub(1);
        update(&mut load);
    }

    /// Runs `f` on the registry. References the registry gave up are dropped
    /// only after the lock is released, as dropping them may run observer code.
    fn with_registry<R>(&self, f: impl FnOnce(&mut ObserverRegistry) -> R) -> R {
        let mut registry: MutexGuard<'_, ObserverRegistry> = self.state.observers.lock();
        let result = f(&mut registry);
        let released = registry.take_released();
        drop(registry);
        drop(released);

        result
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Resource {}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("url", &self.url())
            .field("observers", &self.observer_count())
            .field("loading", &self.is_loading())
            .finish()
    }
}
