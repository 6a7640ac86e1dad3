use std::fmt;

/// What happened to a resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceEvent {
    /// Sent once, only to the observer that was just added.
    ObserverAdded,
    Requested,
    RequestCancelled,
    NewData,
    NotModified,
    Error,
}

impl ResourceEvent {
    /// True for the events that end a request.
    pub fn is_request_outcome(self) -> bool {
        matches!(
            self,
            Self::RequestCancelled | Self::NewData | Self::NotModified | Self::Error
        )
    }
}

impl fmt::Display for ResourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ObserverAdded => "observer added",
            Self::Requested => "requested",
            Self::RequestCancelled => "request cancelled",
            Self::NewData => "new data",
            Self::NotModified => "not modified",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
