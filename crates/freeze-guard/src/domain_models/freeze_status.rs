pub use freeze_client::ServiceMetadata;

/// Result of one freeze query
///
/// Created fresh on every query and superseded by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFreezeStatus {
    pub is_frozen: bool,
    /// Present only while frozen
    pub metadata: Option<ServiceMetadata>,
}

impl ServiceFreezeStatus {
    pub fn frozen(metadata: ServiceMetadata) -> Self {
        Self {
            is_frozen: true,
            metadata: Some(metadata),
        }
    }

    pub fn not_frozen() -> Self {
        Self {
            is_frozen: false,
            metadata: None,
        }
    }
}
