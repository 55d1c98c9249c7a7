pub mod collector;
pub mod inventory;
pub mod queue;

pub use collector::{Collector, Registry};
pub use inventory::InventoryCollector;
pub use queue::QueueCollector;

/// A fixed, unlabeled gauge: name and HELP text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeDesc {
    pub name: &'static str,
    pub help: &'static str,
}

impl GaugeDesc {
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self { name, help }
    }
}

/// Destination for gauge values produced by a scrape
pub trait GaugeSink {
    fn gauge(&mut self, desc: &GaugeDesc, value: f64);
}

/// Trait for exporting a counter record as gauges
pub trait MetricExporter {
    /// Gauges this record emits, in emission order
    fn descriptors(&self) -> &'static [GaugeDesc];

    /// Write every gauge to the sink
    fn export_to(&self, sink: &mut dyn GaugeSink);

    /// Export metrics to Prometheus format string
    fn export_metrics(&self) -> String {
        let mut builder = MetricBuilder::new();
        self.export_to(&mut builder);
        builder.build()
    }
}

/// Helper struct to build Prometheus metrics
pub struct MetricBuilder {
    metrics: String,
}

impl MetricBuilder {
    pub fn new() -> Self {
        Self {
            metrics: String::new(),
        }
    }

    /// Add a HELP line
    pub fn help(&mut self, name: &str, description: &str) -> &mut Self {
        self.metrics
            .push_str(&format!("# HELP {name} {description}\n"));
        self
    }

    /// Add a TYPE line
    pub fn type_(&mut self, name: &str, metric_type: &str) -> &mut Self {
        self.metrics
            .push_str(&format!("# TYPE {name} {metric_type}\n"));
        self
    }

    /// Add an unlabeled sample line
    pub fn sample(&mut self, name: &str, value: f64) -> &mut Self {
        self.metrics
            .push_str(&format!("{name} {}\n", format_value(value)));
        self
    }

    /// Build the final metric string
    pub fn build(self) -> String {
        self.metrics
    }
}

impl Default for MetricBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeSink for MetricBuilder {
    fn gauge(&mut self, desc: &GaugeDesc, value: f64) {
        self.help(desc.name, desc.help)
            .type_(desc.name, "gauge")
            .sample(desc.name, value);
    }
}

/// Render a sample value in the text exposition format.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_GAUGE: GaugeDesc = GaugeDesc::new("slurm_test_gauge", "A test gauge");

    #[test]
    fn test_gauge_rendering() {
        let mut builder = MetricBuilder::new();
        builder.gauge(&TEST_GAUGE, 3.0);
        assert_eq!(
            builder.build(),
            "# HELP slurm_test_gauge A test gauge\n\
             # TYPE slurm_test_gauge gauge\n\
             slurm_test_gauge 3\n"
        );
    }

    #[test]
    fn test_fractional_and_special_values() {
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-1.0), "-1");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    }
}
