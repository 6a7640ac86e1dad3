//! # Ownership-aware observers
//!
//! Observers subscribe to a [`Resource`] on behalf of one or more owners. An
//! observer stays subscribed exactly as long as something interested in it is
//! alive, and is forgotten without any manual unsubscription once nothing holds
//! it anymore.
//!
//! ```
//! use owned_observers::{OwnerToken, Resource, ResourceEvent};
//!
//! let resource = Resource::new("/users/1");
//! let owner = OwnerToken::new();
//!
//! resource.add_observer_fn(&owner, |resource, event| {
//!     if event == ResourceEvent::NewData {
//!         assert!(resource.latest_data().is_some());
//!     }
//! });
//! assert_eq!(resource.observer_count(), 1);
//!
//! drop(owner);
//! resource.collect_defunct_observers();
//! assert_eq!(resource.observer_count(), 0);
//! ```

pub mod observers {
    pub mod closure_observer;
    pub mod identity;
    pub mod observer;
    pub mod ownership;
    pub mod registry;
}

pub mod resource {
    pub mod entity;
    pub mod error;
    pub mod event;
    pub mod handle;
}

pub mod sync {
    pub mod owner_token;
    pub mod types;
}

#[cfg(test)]
mod test_support;

pub use observers::{
    closure_observer::ClosureObserver,
    identity::{Identity, OwnerHandle},
    observer::ResourceObserver,
};
pub use resource::{entity::Entity, error::RequestError, event::ResourceEvent, handle::Resource};
pub use sync::owner_token::OwnerToken;
