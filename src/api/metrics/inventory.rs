use super::{Collector, GaugeDesc, GaugeSink, MetricExporter};
use crate::error::Result;
use crate::metrics::{parse_inventory, InventoryCounters};
use crate::source::DataSource;

pub const GPUS_ALLOC: GaugeDesc = GaugeDesc::new("slurm_gpus_alloc", "Allocated GPUs");
pub const GPUS_IDLE: GaugeDesc = GaugeDesc::new("slurm_gpus_idle", "Idle GPUs");
pub const GPUS_TOTAL: GaugeDesc = GaugeDesc::new("slurm_gpus_total", "Total GPUs");

pub const INVENTORY_GAUGES: &[GaugeDesc] = &[GPUS_ALLOC, GPUS_IDLE, GPUS_TOTAL];

impl MetricExporter for InventoryCounters {
    fn descriptors(&self) -> &'static [GaugeDesc] {
        INVENTORY_GAUGES
    }

    fn export_to(&self, sink: &mut dyn GaugeSink) {
        sink.gauge(&GPUS_ALLOC, self.alloc);
        sink.gauge(&GPUS_IDLE, self.idle);
        sink.gauge(&GPUS_TOTAL, self.total);
    }
}

/// Scrapes the node listing and reports cluster GPU inventory.
pub struct InventoryCollector {
    source: Box<dyn DataSource>,
}

impl InventoryCollector {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl Collector for InventoryCollector {
    fn name(&self) -> &'static str {
        "gpus"
    }

    fn descriptors(&self) -> &'static [GaugeDesc] {
        INVENTORY_GAUGES
    }

    fn collect(&self, sink: &mut dyn GaugeSink) -> Result<()> {
        let raw = self.source.fetch()?;
        let counters = parse_inventory(&raw);
        tracing::debug!(
            source = %self.source.describe(),
            bytes = raw.len(),
            alloc = counters.alloc,
            idle = counters.idle,
            total = counters.total,
            "collected GPU inventory"
        );
        counters.export_to(sink);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metrics::MetricBuilder;
    use crate::error::Error;

    #[test]
    fn test_export_metrics() {
        let counters = InventoryCounters {
            alloc: 1.0,
            idle: 5.0,
            total: 6.0,
        };
        let text = counters.export_metrics();
        assert!(text.contains("# HELP slurm_gpus_alloc Allocated GPUs\n"));
        assert!(text.contains("# TYPE slurm_gpus_idle gauge\n"));
        assert!(text.contains("\nslurm_gpus_alloc 1\n"));
        assert!(text.contains("\nslurm_gpus_idle 5\n"));
        assert!(text.contains("\nslurm_gpus_total 6\n"));
    }

    #[test]
    fn test_collect_from_source() {
        let collector = InventoryCollector::new(|| -> Result<Vec<u8>> {
            Ok(b"node1 gpu:4 gpu:1\nnode2 gpu:2 gpu:0\n".to_vec())
        });
        let mut builder = MetricBuilder::new();
        collector.collect(&mut builder).unwrap();
        let text = builder.build();
        assert!(text.contains("\nslurm_gpus_alloc 1\n"));
        assert!(text.contains("\nslurm_gpus_idle 5\n"));
        assert!(text.contains("\nslurm_gpus_total 6\n"));
    }

    #[test]
    fn test_collect_propagates_fetch_error() {
        let collector = InventoryCollector::new(|| -> Result<Vec<u8>> {
            Err(Error::CommandFailed {
                command: "sinfo".to_string(),
                code: Some(1),
                stderr: String::new(),
            })
        });
        let mut builder = MetricBuilder::new();
        assert!(collector.collect(&mut builder).is_err());
        assert!(builder.build().is_empty());
    }
}
