use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::{Rc, Weak},
};

/// Address of a shared allocation, used to compare objects by identity.
///
/// Only meaningful while some `Rc` or `Weak` to the allocation is kept around,
/// otherwise the address may be handed out again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Identity(*const ());

impl Identity {
    pub fn of_rc<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc) as *const ())
    }

    pub fn of_weak<T: ?Sized>(weak: &Weak<T>) -> Self {
        Self(Weak::as_ptr(weak) as *const ())
    }
}

trait WeakReferent {
    fn is_alive(&self) -> bool;
}

impl<T: ?Sized> WeakReferent for Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// Non-owning reference to an owner object.
///
/// Two handles are equal iff they refer to the same allocation. Holding a
/// handle never extends the owner's lifetime.
pub struct OwnerHandle {
    identity: Identity,
    referent: Box<dyn WeakReferent>,
}

impl OwnerHandle {
    pub fn new<T: ?Sized + 'static>(owner: &Rc<T>) -> Self {
        Self::from_weak(Rc::downgrade(owner))
    }

    pub fn from_weak<T: ?Sized + 'static>(owner: Weak<T>) -> Self {
        Self {
            identity: Identity::of_weak(&owner),
            referent: Box::new(owner),
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn is_alive(&self) -> bool {
        self.referent.is_alive()
    }
}

impl<T: ?Sized + 'static> From<&Rc<T>> for OwnerHandle {
    fn from(owner: &Rc<T>) -> Self {
        Self::new(owner)
    }
}

impl PartialEq for OwnerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for OwnerHandle {}

impl Hash for OwnerHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Debug for OwnerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerHandle")
            .field("identity", &self.identity)
            .field("alive", &self.is_alive())
            .finish()
    }
}
