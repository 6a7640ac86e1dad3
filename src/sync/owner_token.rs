use std::rc::Rc;

use crate::observers::identity::OwnerHandle;

/// An owner object for callers that have nothing better to own observers with.
///
/// Clones share one identity: observers owned by a token stay subscribed until
/// the last clone is dropped.
#[derive(Clone, Debug)]
pub struct OwnerToken(Rc<()>);

impl Default for OwnerToken {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerToken {
    pub fn new() -> Self {
        Self(Rc::new(()))
    }

    pub fn handle(&self) -> OwnerHandle {
        OwnerHandle::new(&self.0)
    }

    pub fn is_this_the_last(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }

    pub fn number_of_clones(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl From<&OwnerToken> for OwnerHandle {
    fn from(token: &OwnerToken) -> Self {
        token.handle()
    }
}

#[cfg(test)]
mod tests {
    use super::OwnerToken;

    #[test]
    fn clones_share_identity() {
        let token = OwnerToken::new();

        assert_eq!(token.number_of_clones(), 1);
        assert!(token.is_this_the_last());

        {
            let token = token.clone();

            assert_eq!(token.number_of_clones(), 2);
            assert!(!token.is_this_the_last());
        }

        assert_eq!(token.number_of_clones(), 1);
        assert!(token.is_this_the_last());

        assert_eq!(token.handle(), token.clone().handle());
        assert_ne!(token.handle(), OwnerToken::new().handle());
    }

    #[test]
    fn handle_dies_with_last_clone() {
        let token = OwnerToken::new();
        let clone = token.clone();
        let handle = token.handle();

        drop(token);
        assert!(handle.is_alive());

        drop(clone);
        assert!(!handle.is_alive());
    }
}
