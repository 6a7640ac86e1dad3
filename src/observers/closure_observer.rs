use crate::resource::{event::ResourceEvent, handle::Resource};

use super::observer::ResourceObserver;

type ChangeFunction = Box<dyn Fn(&Resource, ResourceEvent)>;

/// Lets a plain function act as an observer. Only `resource_changed` is forwarded.
pub struct ClosureObserver {
    function: ChangeFunction,
}

impl ClosureObserver {
    pub fn new(function: impl Fn(&Resource, ResourceEvent) + 'static) -> Self {
        Self {
            function: Box::new(function),
        }
    }
}

impl ResourceObserver for ClosureObserver {
    fn resource_changed(&self, resource: &Resource, event: ResourceEvent) {
        (self.function)(resource, event);
    }
}
