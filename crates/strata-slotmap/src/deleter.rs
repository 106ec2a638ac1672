//! Deletion hooks run when a slot map gives up a value.

/// Teardown hook invoked with each value a [`SlotMap`](crate::SlotMap)
/// removes, clears, or drops.
///
/// The map moves the value out of its slot before calling the hook, so the
/// slot is already reusable when `delete` runs. Any `FnMut(T)` closure is a
/// deleter.
pub trait Deleter<T> {
    /// Tear down `value`.
    fn delete(&mut self, value: T);
}

/// The default deleter: drops the value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropDeleter;

impl<T> Deleter<T> for DropDeleter {
    fn delete(&mut self, value: T) {
        drop(value);
    }
}

impl<T, F> Deleter<T> for F
where
    F: FnMut(T),
{
    fn delete(&mut self, value: T) {
        self(value)
    }
}
