/// Exporter configuration constants
pub struct ExporterConfig;

impl ExporterConfig {
    // Tracked generic resource
    pub const GRES_NAME: &'static str = "gpu";
    pub const QUEUE_GRES_MARKER: &'static str = "gres/gpu";
    pub const PENDING_DEPENDENCY_REASON: &'static str = "Dependency";

    // HTTP listener
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_BIND_ADDRESS: &'static str = "0.0.0.0";
    pub const METRICS_PATH: &'static str = "/metrics";

    // Data sources
    pub const SINFO_COMMAND: &'static str = "sinfo";
    pub const SINFO_ARGS: &'static [&'static str] =
        &["-h", "--Node", "--Format=nodehost,gres,gresused"];
    pub const SQUEUE_COMMAND: &'static str = "squeue";
    pub const SQUEUE_ARGS: &'static [&'static str] = &[
        "-a",
        "-r",
        "-h",
        "--Format=jobid,state,tres-alloc:90",
        "--states=all",
    ];

    // Logging
    pub const DEFAULT_LOG_FILTER: &'static str = "slurm_gpu_exporter=info,tower_http=info";
}
