/// Outcome of offering a key to a component.
///
/// Views chain components with this: the first component that returns
/// anything other than `NotHandled` owns the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key consumed, nothing for the parent to do
  Handled,
  /// Key consumed and produced an event for the parent
  Event(T),
  /// Key not consumed, try the next handler
  NotHandled,
}

impl<T> KeyResult<T> {
  /// Chain to another handler when this one passed on the key
  pub fn or_else(self, f: impl FnOnce() -> KeyResult<T>) -> KeyResult<T> {
    match self {
      KeyResult::NotHandled => f(),
      other => other,
    }
  }
}
