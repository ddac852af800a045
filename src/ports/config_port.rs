//! Configuration access port trait.

/// Read-only view of a sectioned key/value configuration.
pub trait ConfigPort {
    /// Trimmed value; `None` when the key is missing or blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `Ok(None)` when the key is missing, `Err` with a reason when the
    /// value is not an integer.
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
}
