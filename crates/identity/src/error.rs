/// Errors that can occur during identity resolution.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No identity selector was registered for the entity type.
    #[error("no identity selector registered for entity type '{0}'")]
    Unregistered(&'static str),
}
