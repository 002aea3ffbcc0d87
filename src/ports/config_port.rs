//! Configuration access port trait.

pub trait ConfigPort {
    /// Raw value for `key` in `section`, `None` when absent. Parsing and
    /// range checks live in `domain::config_validation`.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
