//! Ordered fallback resolution.
//!
//! Theme slots, background patterns, and the slide/layout/master cascade all
//! follow the same rule: consult sources in priority order and keep the first
//! definite answer. [`FallbackChain`] is that rule, written once.

/// A lookup step that may or may not produce an answer.
type Step<'a, T> = Box<dyn FnOnce() -> Option<T> + 'a>;

/// An ordered list of lookups where the first `Some` wins.
///
/// Steps are evaluated lazily, so later (more expensive or broader) lookups
/// only run when every earlier one came up empty.
///
/// ```
/// use deck_core::FallbackChain;
///
/// let color = FallbackChain::new()
///     .then("slide", || None)
///     .then("layout", || Some("#336699"))
///     .then("master", || Some("#000000"))
///     .resolve();
/// assert_eq!(color, Some("#336699"));
/// ```
pub struct FallbackChain<'a, T> {
    steps: Vec<(&'static str, Step<'a, T>)>,
}

impl<'a, T: 'a> FallbackChain<'a, T> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a lookup step with a label used in debug logging.
    pub fn then(mut self, label: &'static str, step: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.steps.push((label, Box::new(step)));
        self
    }

    /// Append a step that yields an already-known optional value.
    pub fn then_value(self, label: &'static str, value: Option<T>) -> Self {
        self.then(label, move || value)
    }

    /// Number of steps in the chain.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order and return the first answer.
    pub fn resolve(self) -> Option<T> {
        self.resolve_labeled().map(|(_, value)| value)
    }

    /// Like [`resolve`](Self::resolve), also reporting which step answered.
    pub fn resolve_labeled(self) -> Option<(&'static str, T)> {
        for (label, step) in self.steps {
            if let Some(value) = step() {
                log::trace!("fallback chain resolved at '{}'", label);
                return Some((label, value));
            }
        }
        None
    }

    /// Resolve, using `default` when no step answers.
    pub fn resolve_or(self, default: T) -> T {
        self.resolve().unwrap_or(default)
    }
}

impl<'a, T: 'a> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
