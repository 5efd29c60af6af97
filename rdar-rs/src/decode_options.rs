/// What to do when the file-info table repeats a name hash.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first entry decoded for a hash and drop later ones.
    #[default]
    KeepFirst,
    /// Replace the stored entry with each later one for the same hash.
    KeepLast,
    /// Fail the decode with [`crate::error::RdarError::DuplicateKey`].
    Error,
}

/// Caller-selectable behavior for decoding an index table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub duplicate_policy: DuplicatePolicy,
}

impl DecodeOptions {
    /// Returns options with the given duplicate-key policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
