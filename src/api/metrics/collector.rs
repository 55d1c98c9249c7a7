// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashSet;

use super::{GaugeDesc, GaugeSink, MetricBuilder};
use crate::error::{Error, Result};

/// A source of gauges that is re-evaluated on every scrape.
pub trait Collector: Send + Sync {
    /// Short name for log messages
    fn name(&self) -> &'static str;

    /// Every gauge this collector emits; fixed for the process lifetime
    fn descriptors(&self) -> &'static [GaugeDesc];

    /// Fetch fresh data and write all gauges to the sink.
    ///
    /// On error nothing should be considered published.
    fn collect(&self, sink: &mut dyn GaugeSink) -> Result<()>;
}

/// Set of collectors registered once at start-up.
///
/// Gauge names must be unique across all registered collectors.
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Box<dyn Collector>>,
    names: HashSet<&'static str>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collector: impl Collector + 'static) -> Result<()> {
        let descriptors = collector.descriptors();

        let mut incoming = HashSet::new();
        for desc in descriptors {
            if self.names.contains(desc.name) || !incoming.insert(desc.name) {
                return Err(Error::DuplicateMetric(desc.name.to_string()));
            }
        }

        self.names.extend(incoming);
        self.collectors.push(Box::new(collector));
        Ok(())
    }

    /// All registered gauges, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &GaugeDesc> {
        self.collectors.iter().flat_map(|c| c.descriptors().iter())
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Run every collector and render the exposition text.
    ///
    /// All-or-nothing: the first collector error is returned and no
    /// partial output escapes.
    pub fn gather(&self) -> Result<String> {
        let mut builder = MetricBuilder::new();
        for collector in &self.collectors {
            collector.collect(&mut builder).inspect_err(|e| {
                tracing::error!(collector = collector.name(), "collection failed: {e}");
            })?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metrics::{InventoryCollector, QueueCollector};

    fn inventory_ok() -> InventoryCollector {
        InventoryCollector::new(|| -> Result<Vec<u8>> { Ok(b"node1 gpu:4 gpu:1\n".to_vec()) })
    }

    fn queue_ok() -> QueueCollector {
        QueueCollector::new(|| -> Result<Vec<u8>> { Ok(b"1 RUNNING gres/gpu=1\n".to_vec()) })
    }

    #[test]
    fn test_register_and_gather() {
        let mut registry = Registry::new();
        registry.register(inventory_ok()).unwrap();
        registry.register(queue_ok()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.descriptors().count(), 15);

        let text = registry.gather().unwrap();
        assert!(text.contains("\nslurm_gpus_total 4\n"));
        assert!(text.contains("\nslurm_gres_gpu_running 1\n"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register(inventory_ok()).unwrap();
        let err = registry.register(inventory_ok()).unwrap_err();
        assert!(matches!(err, Error::DuplicateMetric(name) if name == "slurm_gpus_alloc"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_gather_is_all_or_nothing() {
        let mut registry = Registry::new();
        registry.register(inventory_ok()).unwrap();
        registry
            .register(QueueCollector::new(|| -> Result<Vec<u8>> {
                Err(Error::Timeout {
                    command: "squeue".to_string(),
                    timeout: std::time::Duration::from_secs(1),
                })
            }))
            .unwrap();

        assert!(matches!(registry.gather(), Err(Error::Timeout { .. })));
    }

    #[test]
    fn test_each_gather_recomputes() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut registry = Registry::new();
        registry
            .register(InventoryCollector::new(move || -> Result<Vec<u8>> {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("node1 gpu:{n} gpu:0\n").into_bytes())
            }))
            .unwrap();

        assert!(registry.gather().unwrap().contains("\nslurm_gpus_total 1\n"));
        assert!(registry.gather().unwrap().contains("\nslurm_gpus_total 2\n"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
