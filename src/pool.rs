//! Idle reserve for a single resource kind

/// A bounded LIFO stack of idle resource handles with a sizing policy.
///
/// The most recently released resource is the first one reused.
///
/// # Examples
///
/// ```
/// use esox_spawnpool::Pool;
///
/// let mut pool = Pool::new(2, 4);
/// pool.push(1u32);
/// pool.push(2u32);
///
/// assert_eq!(pool.pop(), Some(2));
/// assert!(pool.should_grow());
/// ```
#[derive(Debug, Clone)]
pub struct Pool<H> {
    idle: Vec<H>,
    minimum: usize,
    maximum: usize,
}

impl<H: Copy + PartialEq> Pool<H> {
    /// Create an empty pool. `minimum` is raised to 1 and `maximum` to
    /// `minimum` when they are out of order.
    pub fn new(minimum: usize, maximum: usize) -> Self {
        let minimum = minimum.max(1);
        let maximum = maximum.max(minimum);
        Self {
            idle: Vec::with_capacity(maximum),
            minimum,
            maximum,
        }
    }

    /// Below the minimum idle reserve
    pub fn should_grow(&self) -> bool {
        self.idle.len() < self.minimum
    }

    /// Room for one more idle resource
    pub fn can_grow(&self) -> bool {
        self.idle.len() < self.maximum
    }

    pub fn can_shrink(&self) -> bool {
        self.idle.len() > self.minimum
    }

    /// Push without a capacity check. Callers check [`can_grow`](Self::can_grow).
    pub fn push(&mut self, resource: H) {
        self.idle.push(resource);
    }

    pub fn pop(&mut self) -> Option<H> {
        self.idle.pop()
    }

    pub fn contains_resource(&self, resource: H) -> bool {
        self.idle.contains(&resource)
    }

    /// Take a specific resource out of the idle reserve
    pub fn remove_resource(&mut self, resource: H) -> bool {
        match self.idle.iter().position(|idle| *idle == resource) {
            Some(index) => {
                self.idle.remove(index);
                true
            }
            None => false,
        }
    }

    /// Change the minimum, raising the maximum along with it if needed
    pub fn set_minimum(&mut self, minimum: usize) {
        self.minimum = minimum.max(1);
        self.maximum = self.maximum.max(self.minimum);
    }

    /// Number of resources still needed to reach the minimum
    pub fn shortfall(&self) -> usize {
        self.minimum.saturating_sub(self.idle.len())
    }

    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Idle handles, oldest first
    pub fn idle(&self) -> &[H] {
        &self.idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_is_last_in_first_out() {
        let mut pool = Pool::new(1, 5);
        pool.push(1);
        pool.push(2);
        pool.push(3);

        assert_eq!(pool.pop(), Some(3));
        assert_eq!(pool.pop(), Some(2));
        assert_eq!(pool.pop(), Some(1));
        assert_eq!(pool.pop(), None);
    }

    #[test]
    fn test_sizing_predicates() {
        let mut pool = Pool::new(2, 3);
        assert!(pool.should_grow());
        assert!(pool.can_grow());
        assert!(!pool.can_shrink());

        pool.push(1);
        pool.push(2);
        assert!(!pool.should_grow());
        assert!(pool.can_grow());
        assert!(!pool.can_shrink());

        pool.push(3);
        assert!(!pool.can_grow());
        assert!(pool.can_shrink());
    }

    #[test]
    fn test_construction_clamps_bounds() {
        let pool = Pool::<u32>::new(0, 0);
        assert_eq!(pool.minimum(), 1);
        assert_eq!(pool.maximum(), 1);

        let pool = Pool::<u32>::new(8, 3);
        assert_eq!(pool.minimum(), 8);
        assert_eq!(pool.maximum(), 8);
    }

    #[test]
    fn test_contains_and_remove() {
        let mut pool = Pool::new(1, 4);
        pool.push(10);
        pool.push(20);

        assert!(pool.contains_resource(10));
        assert!(!pool.contains_resource(30));

        assert!(pool.remove_resource(10));
        assert!(!pool.remove_resource(10));
        assert_eq!(pool.idle(), &[20]);
    }

    #[test]
    fn test_set_minimum_raises_maximum() {
        let mut pool = Pool::<u32>::new(2, 4);
        pool.set_minimum(6);

        assert_eq!(pool.minimum(), 6);
        assert_eq!(pool.maximum(), 6);
        assert_eq!(pool.shortfall(), 6);

        pool.set_minimum(0);
        assert_eq!(pool.minimum(), 1);
        assert_eq!(pool.maximum(), 6);
    }
}
