//! Health monitoring for spawn pools

/// Health status of a single pool
///
/// # Examples
///
/// ```
/// use esox_spawnpool::HealthStatus;
///
/// let health = HealthStatus::new(3, 2, 6);
/// assert!(health.is_healthy());
///
/// let drained = HealthStatus::new(0, 2, 6);
/// assert!(!drained.is_healthy());
/// assert_eq!(drained.warning_count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool can serve an acquire without force-creating
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Idle resources relative to the maximum (0.0 to 1.0)
    pub fill_ratio: f64,

    pub idle_resources: usize,

    pub minimum: usize,

    pub maximum: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(idle: usize, minimum: usize, maximum: usize) -> Self {
        let fill_ratio = if maximum > 0 {
            idle as f64 / maximum as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if idle == 0 {
            warnings.push("Pool is empty".to_string());
            is_healthy = false;
        }

        if idle < minimum {
            warnings.push(format!("Below minimum: {} of {} idle", idle, minimum));
        }

        // Further releases will be destroyed
        if maximum > 0 && idle >= maximum {
            warnings.push(format!("At maximum capacity: {}", maximum));
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            fill_ratio,
            idle_resources: idle,
            minimum,
            maximum,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pool_warns_but_is_healthy() {
        let health = HealthStatus::new(4, 2, 4);

        assert!(health.is_healthy());
        assert_eq!(health.warning_count, 1);
        assert_eq!(health.fill_ratio, 1.0);
    }

    #[test]
    fn test_below_minimum() {
        let health = HealthStatus::new(1, 2, 4);

        assert!(health.is_healthy());
        assert_eq!(health.warnings, vec!["Below minimum: 1 of 2 idle".to_string()]);
    }
}
