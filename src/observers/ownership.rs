use std::{
    collections::HashMap,
    rc::{Rc, Weak},
};

use super::{
    identity::{Identity, OwnerHandle},
    observer::ResourceObserver,
};

/// Reference to an observer that is either owning or non-owning.
pub enum ObserverHold {
    Strong(Rc<dyn ResourceObserver>),
    Weak(Weak<dyn ResourceObserver>),
}

impl ObserverHold {
    pub fn identity(&self) -> Identity {
        match self {
            Self::Strong(observer) => Identity::of_rc(observer),
            Self::Weak(observer) => Identity::of_weak(observer),
        }
    }

    pub fn upgrade(&self) -> Option<Rc<dyn ResourceObserver>> {
        match self {
            Self::Strong(observer) => Some(observer.clone()),
            Self::Weak(observer) => observer.upgrade(),
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Strong(_))
    }

    /// A weak hold whose observer is already gone stays weak. Returns the
    /// strong reference given up when switching to weak.
    fn set_strong(&mut self, strong: bool) -> Option<Rc<dyn ResourceObserver>> {
        let replacement = match (&*self, strong) {
            (Self::Weak(observer), true) => observer.upgrade().map(Self::Strong),
            (Self::Strong(observer), false) => Some(Self::Weak(Rc::downgrade(observer))),
            _ => None,
        }?;

        match std::mem::replace(self, replacement) {
            Self::Strong(released) => Some(released),
            Self::Weak(_) => None,
        }
    }
}

/// Tracks who keeps one observer subscribed.
///
/// Owners can disappear at any time without telling anybody, so the owner set
/// is pruned lazily: after every mutation, and before every liveness check.
pub struct OwnershipTracker {
    observer: ObserverHold,
    owners: HashMap<Identity, OwnerHandle>,
    is_own_owner: bool,
}

impl OwnershipTracker {
    /// Starts out weak and unowned, i.e. defunct until an owner is added.
    pub fn new(observer: &Rc<dyn ResourceObserver>) -> Self {
        Self {
            observer: ObserverHold::Weak(Rc::downgrade(observer)),
            owners: HashMap::new(),
            is_own_owner: false,
        }
    }

    pub fn observer_identity(&self) -> Identity {
        self.observer.identity()
    }

    pub fn observer(&self) -> Option<Rc<dyn ResourceObserver>> {
        self.observer.upgrade()
    }

    pub fn is_strong(&self) -> bool {
        self.observer.is_strong()
    }

    pub fn is_own_owner(&self) -> bool {
        self.is_own_owner
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn add_owner(&mut self, owner: OwnerHandle) -> Option<Rc<dyn ResourceObserver>> {
        if owner.identity() == self.observer_identity() {
            self.is_own_owner = true;
        } else {
            self.owners.entry(owner.identity()).or_insert(owner);
        }
        self.recompute()
    }

    pub fn remove_owner(&mut self, owner: &OwnerHandle) -> Option<Rc<dyn ResourceObserver>> {
        if owner.identity() == self.observer_identity() {
            self.is_own_owner = false;
        } else {
            self.owners.remove(&owner.identity());
        }
        self.recompute()
    }

    /// Prunes dead owners and sets the hold strength from what is left.
    ///
    /// A strong reference released by this call is handed back instead of
    /// dropped, since dropping it may run the observer's destructor.
    pub fn recompute(&mut self) -> Option<Rc<dyn ResourceObserver>> {
        self.owners.retain(|_, owner| owner.is_alive());

        let strong = !self.owners.is_empty();
        if strong != self.observer.is_strong() {
            tracing::trace!(
                observer = ?self.observer_identity(),
                strong,
                "observer hold changed"
            );
        }
        self.observer.set_strong(strong)
    }

    pub fn is_defunct(&self) -> bool {
        let is_owned = self.is_own_owner || self.owners.values().any(OwnerHandle::is_alive);
        self.observer().is_none() || !is_owned
    }
}
