use once_cell::sync::OnceCell;

/// Lazily constructed, process-wide instance.
///
/// The first caller of [`get_or_init`](Singleton::get_or_init) runs the
/// initializer; concurrent callers block until it finishes and then see the
/// same instance. The initializer runs exactly once.
///
/// ```
/// use SyncQueueMini::Singleton;
///
/// static GREETING: Singleton<String> = Singleton::new();
///
/// assert_eq!(GREETING.get_or_init(|| "hello".to_string()), "hello");
/// assert_eq!(GREETING.get_or_init(|| "ignored".to_string()), "hello");
/// ```
pub struct Singleton<T> {
    cell: OnceCell<T>,
}

impl<T> Singleton<T> {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(|| {
            log::debug!("initializing singleton {}", std::any::type_name::<T>());
            init()
        })
    }

    /// The instance, if some caller already initialized it.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}
