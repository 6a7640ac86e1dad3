use crate::resource::{event::ResourceEvent, handle::Resource};

/// Something that can be told about changes to a [`Resource`].
///
/// Callbacks take `&self`; observers that record state use interior mutability.
/// A callback may call back into the resource, e.g. to add more observers.
pub trait ResourceObserver {
    fn resource_changed(&self, resource: &Resource, event: ResourceEvent);

    /// Progress of the resource's current request, in `0.0..=1.0`.
    fn resource_request_progress(&self, _resource: &Resource, _progress: f64) {}

    /// Delivered once, when the observer is evicted from the resource.
    fn stopped_observing_resource(&self, _resource: &Resource) {}
}
