//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `None` when the key is missing or not an integer.
    fn get_int(&self, section: &str, key: &str) -> Option<i64>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
