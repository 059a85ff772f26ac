// Copyright 2025 eraflo
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

//! Registry for managing metrics.

use super::{MetricId, MetricSnapshot, MetricValue, MetricsError, MetricsResult};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct MetricEntry {
    description: String,
    unit: String,
    value: MetricValue,
}

type Storage = Arc<RwLock<BTreeMap<MetricId, MetricEntry>>>;

/// Central, in-memory registry for pipeline metrics.
///
/// Registration hands out cheap, cloneable handles that update the shared
/// storage directly. Registering the same id twice with the same kind returns
/// a handle to the existing metric.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    storage: Storage,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new counter metric
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        match storage.get(&id) {
            Some(entry) if entry.value.as_counter().is_none() => {
                return Err(MetricsError::TypeMismatch {
                    id,
                    expected: "counter",
                })
            }
            Some(_) => {}
            None => {
                storage.insert(
                    id.clone(),
                    MetricEntry {
                        description: description.into(),
                        unit: String::new(),
                        value: MetricValue::Counter(0),
                    },
                );
            }
        }
        Ok(CounterHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Register a new histogram metric
    ///
    /// `buckets` holds the ascending upper bounds of the buckets. Samples above
    /// the last bound land in an overflow bucket.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        if buckets.is_empty() || buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(MetricsError::InvalidOperation(
                "histogram bounds must be non-empty and strictly ascending".to_string(),
            ));
        }

        let id = MetricId::new(namespace, name);
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        match storage.get(&id) {
            Some(entry) if entry.value.as_counter().is_some() => {
                return Err(MetricsError::TypeMismatch {
                    id,
                    expected: "histogram",
                })
            }
            Some(_) => {}
            None => {
                let bucket_counts = vec![0; buckets.len() + 1];
                storage.insert(
                    id.clone(),
                    MetricEntry {
                        description: description.into(),
                        unit: unit.into(),
                        value: MetricValue::Histogram {
                            count: 0,
                            sum: 0.0,
                            bucket_bounds: buckets,
                            bucket_counts,
                        },
                    },
                );
            }
        }
        Ok(HistogramHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Copies every metric, ordered by id.
    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        match self.storage.read() {
            Ok(storage) => storage
                .iter()
                .map(|(id, entry)| MetricSnapshot {
                    id: id.clone(),
                    description: entry.description.clone(),
                    unit: entry.unit.clone(),
                    value: entry.value.clone(),
                })
                .collect(),
            Err(_) => {
                log::warn!("Metrics storage lock poisoned, returning an empty snapshot");
                Vec::new()
            }
        }
    }

    /// Get the total number of metrics
    pub fn metric_count(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }
}

/// Handle for counter operations
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    storage: Storage,
}

impl CounterHandle {
    /// Increment the counter by a specific amount
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        let entry = storage
            .get_mut(&self.id)
            .ok_or_else(|| MetricsError::MetricNotFound(self.id.clone()))?;
        match &mut entry.value {
            MetricValue::Counter(v) => {
                *v += amount;
                Ok(*v)
            }
            _ => Err(MetricsError::TypeMismatch {
                id: self.id.clone(),
                expected: "counter",
            }),
        }
    }

    /// Get the metric ID
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for histogram operations
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    storage: Storage,
}

impl HistogramHandle {
    /// Record a sample in the histogram
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        let entry = storage
            .get_mut(&self.id)
            .ok_or_else(|| MetricsError::MetricNotFound(self.id.clone()))?;
        match &mut entry.value {
            MetricValue::Histogram {
                count,
                sum,
                bucket_bounds,
                bucket_counts,
            } => {
                let slot = bucket_bounds
                    .iter()
                    .position(|bound| sample <= *bound)
                    .unwrap_or(bucket_bounds.len());
                bucket_counts[slot] += 1;
                *count += 1;
                *sum += sample;
                Ok(())
            }
            _ => Err(MetricsError::TypeMismatch {
                id: self.id.clone(),
                expected: "histogram",
            }),
        }
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> MetricsResult<u64> {
        let storage = self.storage.read().map_err(|_| MetricsError::Poisoned)?;
        match storage.get(&self.id).map(|entry| &entry.value) {
            Some(MetricValue::Histogram { count, .. }) => Ok(*count),
            Some(_) => Err(MetricsError::TypeMismatch {
                id: self.id.clone(),
                expected: "histogram",
            }),
            None => Err(MetricsError::MetricNotFound(self.id.clone())),
        }
    }

    /// Get the metric ID
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_registration_and_increment() {
        let registry = MetricsRegistry::new();
        let counter = registry
            .register_counter("pipeline", "written", "Items written")
            .unwrap();

        assert_eq!(counter.increment_by(1).unwrap(), 1);
        assert_eq!(counter.increment_by(4).unwrap(), 5);

        // Re-registering hands back the same metric.
        let again = registry
            .register_counter("pipeline", "written", "Items written")
            .unwrap();
        assert_eq!(again.increment_by(0).unwrap(), 5);
        assert_eq!(registry.metric_count(), 1);
        assert_eq!(registry.snapshot()[0].value.as_counter(), Some(5));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let registry = MetricsRegistry::new();
        registry.register_counter("pipeline", "x", "").unwrap();
        let result = registry.register_histogram("pipeline", "x", "", "ms", vec![1.0]);
        assert!(matches!(result, Err(MetricsError::TypeMismatch { .. })));
    }

    #[test]
    fn test_histogram_buckets() {
        let registry = MetricsRegistry::new();
        let histogram = registry
            .register_histogram("pipeline", "item_time", "Per-item time", "ms", vec![1.0, 10.0])
            .unwrap();
        histogram.observe(0.5).unwrap();
        histogram.observe(5.0).unwrap();
        histogram.observe(50.0).unwrap();
        assert_eq!(histogram.count().unwrap(), 3);

        let snapshot = registry.snapshot();
        match &snapshot[0].value {
            MetricValue::Histogram { bucket_counts, sum, .. } => {
                assert_eq!(bucket_counts, &vec![1, 1, 1]);
                assert_eq!(*sum, 55.5);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_histogram_bounds_are_validated() {
        let registry = MetricsRegistry::new();
        let result = registry.register_histogram("p", "h", "", "ms", vec![5.0, 1.0]);
        assert!(matches!(result, Err(MetricsError::InvalidOperation(_))));
    }
}
