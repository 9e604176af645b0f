/// What to do with a document that has no `<DOCNO>` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingIdPolicy {
    /// Leave the document out of the index and count it in [`crate::BuildStats::skipped`].
    #[default]
    Skip,
    /// Abort the build with [`crate::BuildError::MissingDocId`].
    Fail,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub missing_id: MissingIdPolicy,
    /// Tokenize collection files on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { missing_id: MissingIdPolicy::Skip, parallel: true }
    }
}
