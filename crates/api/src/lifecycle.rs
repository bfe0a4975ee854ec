/// Callback run when a backing loader is disposed.
pub trait ShutdownListener: Send + Sync {
    fn execute(&self);
}

impl<F> ShutdownListener for F
where
    F: Fn() + Send + Sync,
{
    fn execute(&self) {
        self()
    }
}
