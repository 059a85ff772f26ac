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

//! Metric identifiers, values and errors.

pub mod registry;

use std::fmt::{self, Display};

/// A structured identifier for a metric: a namespace and a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricId {
    /// The broad category of the metric (e.g. "pipeline").
    pub namespace: String,
    /// The specific name of the metric (e.g. "written").
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId`.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// A distribution of samples across fixed buckets.
    Histogram {
        /// Number of samples recorded.
        count: u64,
        /// Sum of every sample.
        sum: f64,
        /// Upper bounds of the buckets, ascending.
        bucket_bounds: Vec<f64>,
        /// Samples per bucket; one extra trailing slot counts overflow.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// Returns the value if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            _ => None,
        }
    }
}

/// A point-in-time copy of one metric, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    /// The metric's identifier.
    pub id: MetricId,
    /// Human-readable description given at registration.
    pub description: String,
    /// Unit of the samples, empty for counters.
    pub unit: String,
    /// The value at snapshot time.
    pub value: MetricValue,
}

impl Display for MetricSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            MetricValue::Counter(v) => write!(f, "{} = {}", self.id, v),
            MetricValue::Histogram { count, sum, .. } => {
                let mean = if *count == 0 { 0.0 } else { sum / *count as f64 };
                write!(
                    f,
                    "{} = {} samples, mean {:.2}{}",
                    self.id, count, mean, self.unit
                )
            }
        }
    }
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error that can occur within the metrics system.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// The requested metric was not found in the registry.
    MetricNotFound(MetricId),
    /// An operation was attempted on a metric of the wrong kind.
    TypeMismatch {
        /// The metric concerned.
        id: MetricId,
        /// The kind the operation needs.
        expected: &'static str,
    },
    /// The registry lock was poisoned by a panicking writer.
    Poisoned,
    /// An invalid operation was attempted (e.g. unsorted histogram bounds).
    InvalidOperation(String),
}

impl Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::MetricNotFound(id) => write!(f, "Metric not found: {id}"),
            MetricsError::TypeMismatch { id, expected } => {
                write!(f, "Metric {id} is not a {expected}")
            }
            MetricsError::Poisoned => write!(f, "Metrics storage lock poisoned"),
            MetricsError::InvalidOperation(msg) => write!(f, "Invalid operation: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}
