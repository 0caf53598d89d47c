/// Receives the state of a subject it has been registered with.
pub trait Observer<S: ?Sized> {
    fn update(&self, subject: &S);
}

/// An entity broadcasting each change of its observed state.
///
/// `ObserverKey` designates an observer when registering or unregistering it,
/// `Message` is what registered callbacks receive on every change. Most
/// subjects broadcast themselves (`Message = Self`).
pub trait Subject {
    type ObserverKey: ?Sized;
    type Message: ?Sized;

    /// Registers `callback` for `observer`, replacing any previous callback for it.
    fn register_observer<F>(&mut self, observer: &Self::ObserverKey, callback: F)
    where
        F: Fn(&Self::Message) + 'static;

    /// Removes the registration of `observer`, if any.
    fn unregister_observer(&mut self, observer: &Self::ObserverKey);

    fn notify_observers(&self);
}
