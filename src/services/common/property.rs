use std::fmt::Debug;

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A watchable piece of state backed by a `tokio::sync::watch` channel.
///
/// Clones are cheap and all refer to the same underlying value. Watchers
/// receive the current value immediately on subscription, then every
/// subsequent change. Writes that do not change the value are swallowed,
/// which is what keeps field-wise state merges free of redundant
/// notifications downstream.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Set a new value, notifying watchers only when it differs.
    ///
    /// Only accessible within the crate: all mutation goes through the
    /// service that owns the state.
    pub(crate) fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        let _ = self.tx.send_if_modified(|current| {
            if *current != new_value {
                *current = new_value;
                true
            } else {
                false
            }
        });
    }

    /// Replace the value with one derived from the current one.
    pub(crate) fn update(&self, f: impl FnOnce(&T) -> T)
    where
        T: PartialEq,
    {
        let new_value = f(&self.rx.borrow());
        self.set(new_value);
    }

    /// Watch for changes to this property.
    ///
    /// The stream yields the current value immediately, then yields on
    /// every change.
    pub fn watch(&self) -> impl Stream<Item = T> + Send + use<T> {
        WatchStream::new(self.rx.clone())
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::StreamExt;

    #[tokio::test]
    async fn watch_yields_current_then_changes() {
        let property = Property::new(1);
        let mut stream = property.watch();

        assert_eq!(stream.next().await, Some(1));

        property.set(2);
        assert_eq!(stream.next().await, Some(2));
    }

    #[tokio::test]
    async fn unchanged_writes_do_not_notify() {
        let property = Property::new("a".to_string());
        let mut stream = property.watch();
        assert_eq!(stream.next().await.as_deref(), Some("a"));

        property.set("a".to_string());
        property.set("b".to_string());

        // The redundant write is swallowed; the next item is the real change.
        assert_eq!(stream.next().await.as_deref(), Some("b"));
    }

    #[test]
    fn update_derives_from_current() {
        let property = Property::new(10);
        property.update(|v| v + 5);
        assert_eq!(property.get(), 15);
    }
}
