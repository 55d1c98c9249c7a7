use super::{Collector, GaugeDesc, GaugeSink, MetricExporter};
use crate::error::Result;
use crate::metrics::{parse_queue, QueueCounters};
use crate::source::DataSource;

pub const GRES_GPU_PENDING: GaugeDesc =
    GaugeDesc::new("slurm_gres_gpu_pending", "Pending gres/gpu jobs in queue");
pub const GRES_GPU_PENDING_DEPENDENCY: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_pending_dependency",
    "Pending gres/gpu jobs because of dependency in queue",
);
pub const GRES_GPU_RUNNING: GaugeDesc =
    GaugeDesc::new("slurm_gres_gpu_running", "Running gres/gpu jobs in the cluster");
pub const GRES_GPU_SUSPENDED: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_suspended",
    "Suspended gres/gpu jobs in the cluster",
);
pub const GRES_GPU_CANCELLED: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_cancelled",
    "Cancelled gres/gpu jobs in the cluster",
);
pub const GRES_GPU_COMPLETING: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_completing",
    "Completing gres/gpu jobs in the cluster",
);
pub const GRES_GPU_COMPLETED: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_completed",
    "Completed gres/gpu jobs in the cluster",
);
pub const GRES_GPU_CONFIGURING: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_configuring",
    "Configuring gres/gpu jobs in the cluster",
);
pub const GRES_GPU_FAILED: GaugeDesc =
    GaugeDesc::new("slurm_gres_gpu_failed", "Number of failed gres/gpu jobs");
pub const GRES_GPU_TIMEOUT: GaugeDesc =
    GaugeDesc::new("slurm_gres_gpu_timeout", "gres/gpu Jobs stopped by timeout");
pub const GRES_GPU_PREEMPTED: GaugeDesc =
    GaugeDesc::new("slurm_gres_gpu_preempted", "Number of preempted gres/gpu jobs");
pub const GRES_GPU_NODE_FAIL: GaugeDesc = GaugeDesc::new(
    "slurm_gres_gpu_node_fail",
    "Number of gres/gpu jobs stopped due to node fail",
);

pub const QUEUE_GAUGES: &[GaugeDesc] = &[
    GRES_GPU_PENDING,
    GRES_GPU_PENDING_DEPENDENCY,
    GRES_GPU_RUNNING,
    GRES_GPU_SUSPENDED,
    GRES_GPU_CANCELLED,
    GRES_GPU_COMPLETING,
    GRES_GPU_COMPLETED,
    GRES_GPU_CONFIGURING,
    GRES_GPU_FAILED,
    GRES_GPU_TIMEOUT,
    GRES_GPU_PREEMPTED,
    GRES_GPU_NODE_FAIL,
];

impl MetricExporter for QueueCounters {
    fn descriptors(&self) -> &'static [GaugeDesc] {
        QUEUE_GAUGES
    }

    fn export_to(&self, sink: &mut dyn GaugeSink) {
        sink.gauge(&GRES_GPU_PENDING, self.pending);
        sink.gauge(&GRES_GPU_PENDING_DEPENDENCY, self.pending_dependency);
        sink.gauge(&GRES_GPU_RUNNING, self.running);
        sink.gauge(&GRES_GPU_SUSPENDED, self.suspended);
        sink.gauge(&GRES_GPU_CANCELLED, self.cancelled);
        sink.gauge(&GRES_GPU_COMPLETING, self.completing);
        sink.gauge(&GRES_GPU_COMPLETED, self.completed);
        sink.gauge(&GRES_GPU_CONFIGURING, self.configuring);
        sink.gauge(&GRES_GPU_FAILED, self.failed);
        sink.gauge(&GRES_GPU_TIMEOUT, self.timeout);
        sink.gauge(&GRES_GPU_PREEMPTED, self.preempted);
        sink.gauge(&GRES_GPU_NODE_FAIL, self.node_fail);
    }
}

/// Scrapes the job queue and reports gres/gpu job counts per state.
pub struct QueueCollector {
    source: Box<dyn DataSource>,
}

impl QueueCollector {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl Collector for QueueCollector {
    fn name(&self) -> &'static str {
        "gres_gpu"
    }

    fn descriptors(&self) -> &'static [GaugeDesc] {
        QUEUE_GAUGES
    }

    fn collect(&self, sink: &mut dyn GaugeSink) -> Result<()> {
        let raw = self.source.fetch()?;
        let counters = parse_queue(&raw);
        tracing::debug!(
            source = %self.source.describe(),
            bytes = raw.len(),
            pending = counters.pending,
            running = counters.running,
            "collected gres/gpu queue states"
        );
        counters.export_to(sink);
        Ok(())
    }
}
