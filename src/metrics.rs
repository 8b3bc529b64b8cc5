//! Metrics collection and export for spawn pools

use std::collections::HashMap;
use std::fmt::Write;

/// Metrics snapshot for one pool
///
/// # Examples
///
/// ```
/// use esox_spawnpool::PoolMetrics;
///
/// let metrics = PoolMetrics {
///     idle_resources: 5,
///     maximum: 10,
///     fill_ratio: 0.5,
///     ..PoolMetrics::default()
/// };
///
/// assert_eq!(metrics.export()["fill_ratio"], "0.50");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolMetrics {
    /// Resources handed out, force-created ones included
    pub total_acquired: usize,

    /// Resources accepted back into the pool
    pub total_released: usize,

    /// Resources created because the pool was empty at acquire time
    pub force_created: usize,

    /// Resources created to bring the pool back up to its minimum
    pub restocked: usize,

    /// Released resources destroyed because the pool was full or already held them
    pub destroyed_on_release: usize,

    /// Current idle resources
    pub idle_resources: usize,

    pub minimum: usize,

    pub maximum: usize,

    /// Idle resources relative to the maximum (0.0 to 1.0)
    pub fill_ratio: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("force_created".to_string(), self.force_created.to_string());
        metrics.insert("restocked".to_string(), self.restocked.to_string());
        metrics.insert("destroyed_on_release".to_string(), self.destroyed_on_release.to_string());
        metrics.insert("idle_resources".to_string(), self.idle_resources.to_string());
        metrics.insert("minimum".to_string(), self.minimum.to_string());
        metrics.insert("maximum".to_string(), self.maximum.to_string());
        metrics.insert("fill_ratio".to_string(), format!("{:.2}", self.fill_ratio));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics for a set of pools in Prometheus exposition format.
    /// Each entry is labelled with `kind="<name>"` plus the given tags.
    pub fn export_prometheus(
        pools: &[(String, PoolMetrics)],
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();

        Self::family(&mut output, pools, tags, "spawnpool_resources_idle", "gauge", "Current idle resources", |m| {
            m.idle_resources.to_string()
        });
        Self::family(&mut output, pools, tags, "spawnpool_fill_ratio", "gauge", "Idle resources relative to maximum", |m| {
            format!("{:.2}", m.fill_ratio)
        });
        Self::family(&mut output, pools, tags, "spawnpool_acquired_total", "counter", "Total resources acquired", |m| {
            m.total_acquired.to_string()
        });
        Self::family(&mut output, pools, tags, "spawnpool_released_total", "counter", "Total resources released", |m| {
            m.total_released.to_string()
        });
        Self::family(&mut output, pools, tags, "spawnpool_force_created_total", "counter", "Resources force-created on an empty pool", |m| {
            m.force_created.to_string()
        });
        Self::family(&mut output, pools, tags, "spawnpool_restocked_total", "counter", "Resources created to restock a pool", |m| {
            m.restocked.to_string()
        });
        Self::family(&mut output, pools, tags, "spawnpool_destroyed_on_release_total", "counter", "Released resources destroyed instead of pooled", |m| {
            m.destroyed_on_release.to_string()
        });

        output
    }

    fn family(
        output: &mut String,
        pools: &[(String, PoolMetrics)],
        tags: Option<&HashMap<String, String>>,
        name: &str,
        kind: &str,
        help: &str,
        value: impl Fn(&PoolMetrics) -> String,
    ) {
        let _ = writeln!(output, "# HELP {} {}", name, help);
        let _ = writeln!(output, "# TYPE {} {}", name, kind);
        for (pool_kind, metrics) in pools {
            let labels = Self::format_labels(pool_kind, tags);
            let _ = writeln!(output, "{}{{{}}} {}", name, labels, value(metrics));
        }
    }

    fn format_labels(pool_kind: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("kind=\"{}\"", Self::escape_label_value(pool_kind))];

        if let Some(tags) = tags {
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort();
            for (key, value) in sorted {
                labels.push(format!("{}=\"{}\"", key, Self::escape_label_value(value)));
            }
        }

        labels.join(",")
    }

    /// Escape a label value for the text exposition format
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                c => escaped.push(c),
            }
        }
        escaped
    }
}

/// Internal per-pool counters
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    pub total_acquired: usize,
    pub total_released: usize,
    pub force_created: usize,
    pub restocked: usize,
    pub destroyed_on_release: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, idle: usize, minimum: usize, maximum: usize) -> PoolMetrics {
        let fill_ratio = if maximum > 0 {
            idle as f64 / maximum as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired,
            total_released: self.total_released,
            force_created: self.force_created,
            restocked: self.restocked,
            destroyed_on_release: self.destroyed_on_release,
            idle_resources: idle,
            minimum,
            maximum,
            fill_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_snapshot() {
        let mut tracker = MetricsTracker::new();
        tracker.total_acquired += 3;
        tracker.force_created += 1;

        let metrics = tracker.get_metrics(2, 1, 4);
        assert_eq!(metrics.total_acquired, 3);
        assert_eq!(metrics.force_created, 1);
        assert_eq!(metrics.fill_ratio, 0.5);
    }

    #[test]
    fn test_prometheus_labels() {
        let metrics = MetricsTracker::new().get_metrics(3, 1, 3);
        let mut tags = HashMap::new();
        tags.insert("world".to_string(), "arena".to_string());

        let output = MetricsExporter::export_prometheus(&[("Projectile".to_string(), metrics)], Some(&tags));

        assert!(output.contains("# TYPE spawnpool_resources_idle gauge"));
        assert!(output.contains("spawnpool_resources_idle{kind=\"Projectile\",world=\"arena\"} 3"));
        assert!(output.contains("spawnpool_fill_ratio{kind=\"Projectile\",world=\"arena\"} 1.00"));
    }

    #[test]
    fn test_prometheus_label_values_are_escaped() {
        let metrics = MetricsTracker::new().get_metrics(1, 1, 2);
        let mut tags = HashMap::new();
        tags.insert("zone".to_string(), "north\nwing".to_string());

        let output = MetricsExporter::export_prometheus(
            &[("Named(\"a\\\\b\")".to_string(), metrics)],
            Some(&tags),
        );

        assert!(output.contains(r#"spawnpool_resources_idle{kind="Named(\"a\\\\b\")",zone="north\nwing"} 1"#));
    }

    #[test]
    fn test_prometheus_families_are_declared_once() {
        let a = MetricsTracker::new().get_metrics(1, 1, 2);
        let b = MetricsTracker::new().get_metrics(2, 1, 2);
        let output = MetricsExporter::export_prometheus(&[("A".to_string(), a), ("B".to_string(), b)], None);

        assert_eq!(output.matches("# HELP spawnpool_acquired_total").count(), 1);
        assert_eq!(output.matches("spawnpool_acquired_total{").count(), 2);
    }
}
