use std::rc::Rc;

use crate::resource::handle::Resource;

use super::{
    identity::{Identity, OwnerHandle},
    observer::ResourceObserver,
    ownership::OwnershipTracker,
};

/// One observer watching one resource.
pub struct ObserverEntry {
    // keeps the resource alive for as long as somebody watches it
    resource: Resource,
    tracker: OwnershipTracker,
}

impl ObserverEntry {
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn tracker(&self) -> &OwnershipTracker {
        &self.tracker
    }
}

/// The ordered observer entries of a single resource.
///
/// Nothing in here calls back into observers. Strong references given up by
/// the trackers are parked in `released` until the owner of the registry
/// drains them, so that observer destructors never run while it is borrowed.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: Vec<ObserverEntry>,
    released: Vec<Rc<dyn ResourceObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObserverEntry> {
        self.entries.iter()
    }

    /// Records `owner` for `observer`, appending a new entry if the observer
    /// is not registered yet. Returns true if an entry was appended.
    pub fn add(
        &mut self,
        resource: &Resource,
        observer: &Rc<dyn ResourceObserver>,
        owner: OwnerHandle,
    ) -> bool {
        let identity = Identity::of_rc(observer);

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.tracker.observer_identity() == identity)
        {
            tracing::trace!(observer = ?identity, owner = ?owner.identity(), "owner added");
            self.released.extend(entry.tracker.add_owner(owner));
            return false;
        }

        let mut tracker = OwnershipTracker::new(observer);
        self.released.extend(tracker.add_owner(owner));
        self.entries.push(ObserverEntry {
            resource: resource.clone(),
            tracker,
        });

        true
    }

    pub fn remove_owner(&mut self, owner: &OwnerHandle) {
        tracing::trace!(owner = ?owner.identity(), "owner removed");
        for entry in self.entries.iter_mut() {
            self.released.extend(entry.tracker.remove_owner(owner));
        }
    }

    pub fn recompute_all(&mut self) {
        for entry in self.entries.iter_mut() {
            self.released.extend(entry.tracker.recompute());
        }
    }

    /// Evicts every defunct entry, keeping the order of the live ones.
    /// Returns the evicted observers that are still around to be told so.
    pub fn collect_defunct(&mut self) -> Vec<Rc<dyn ResourceObserver>> {
        self.recompute_all();

        let (live, defunct): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| !entry.tracker.is_defunct());
        self.entries = live;

        defunct
            .into_iter()
            .filter_map(|entry| entry.tracker.observer())
            .collect()
    }

    /// Observers that still resolve, in registration order.
    pub fn live_observers(&self) -> Vec<Rc<dyn ResourceObserver>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.tracker.observer())
            .collect()
    }

    pub fn take_released(&mut self) -> Vec<Rc<dyn ResourceObserver>> {
        std::mem::take(&mut self.released)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        observers::{identity::OwnerHandle, observer::ResourceObserver},
        resource::handle::Resource,
        sync::owner_token::OwnerToken,
        test_support::RecordingObserver,
    };

    use super::ObserverRegistry;

    fn observer(name: &str) -> Rc<dyn ResourceObserver> {
        Rc::new(RecordingObserver::new(name))
    }

    #[test]
    fn add_same_observer_twice_keeps_one_entry() {
        let resource = Resource::new("/registry");
        let owner0 = OwnerToken::new();
        let owner1 = OwnerToken::new();
        let observer = observer("o");
        let mut registry = ObserverRegistry::new();

        assert!(registry.add(&resource, &observer, owner0.handle()));
        assert!(!registry.add(&resource, &observer, owner0.handle()));
        assert!(!registry.add(&resource, &observer, owner1.handle()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().next().unwrap().tracker().owner_count(), 2);
    }

    #[test]
    fn entry_keeps_resource_alive() {
        let resource = Resource::new("/registry");
        let owner = OwnerToken::new();
        let observer = observer("o");
        let mut registry = ObserverRegistry::new();

        registry.add(&resource, &observer, owner.handle());
        let entry_resource = registry.iter().next().unwrap().resource().clone();

        assert_eq!(entry_resource, resource);
        assert_eq!(entry_resource.identity(), resource.identity());
        assert_ne!(Resource::new("/registry"), resource);
    }

    #[test]
    fn collect_defunct_keeps_order_of_live_entries() {
        let resource = Resource::new("/registry");
        let owner0 = OwnerToken::new();
        let owner1 = OwnerToken::new();
        let owner2 = OwnerToken::new();
        let observers = [observer("o0"), observer("o1"), observer("o2")];
        let mut registry = ObserverRegistry::new();

        registry.add(&resource, &observers[0], owner0.handle());
        registry.add(&resource, &observers[1], owner1.handle());
        registry.add(&resource, &observers[2], owner2.handle());

        drop(owner1);
        let evicted = registry.collect_defunct();

        assert_eq!(evicted.len(), 1);
        assert!(Rc::ptr_eq(&evicted[0], &observers[1]));

        let live = registry.live_observers();
        assert_eq!(live.len(), 2);
        assert!(Rc::ptr_eq(&live[0], &observers[0]));
        assert!(Rc::ptr_eq(&live[1], &observers[2]));
    }

    #[test]
    fn vanished_observer_is_evicted_silently() {
        let resource = Resource::new("/registry");
        let observer = observer("o");
        let mut registry = ObserverRegistry::new();

        registry.add(&resource, &observer, OwnerHandle::new(&observer));
        drop(observer);

        assert!(registry.collect_defunct().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn released_references_are_parked() {
        let resource = Resource::new("/registry");
        let owner = OwnerToken::new();
        let observer = observer("o");
        let weak_observer = Rc::downgrade(&observer);
        let mut registry = ObserverRegistry::new();

        registry.add(&resource, &observer, owner.handle());
        drop(observer);

        registry.remove_owner(&owner.handle());
        assert!(weak_observer.upgrade().is_some());

        let released = registry.take_released();
        assert_eq!(released.len(), 1);

        drop(released);
        assert!(weak_observer.upgrade().is_none());
        assert!(registry.collect_defunct().is_empty());
        assert!(registry.is_empty());
    }
}
