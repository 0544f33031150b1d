use crate::error::Result;
use crate::field::Value;

/// The live configuration the preferences are read from and written to.
///
/// `set` only stages a value; nothing is durable until `commit` is called,
/// which the applicator does exactly once per patch.
pub trait ConfigStore: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn commit(&mut self) -> Result<()>;
}
