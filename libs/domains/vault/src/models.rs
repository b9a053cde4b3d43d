use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a vault record. Only the external worker moves it past `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processed => "processed",
            ProcessingStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processed" => Ok(ProcessingStatus::Processed),
            "failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("unknown processing status '{}'", other)),
        }
    }
}

/// Vector distance used to rank search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    L2,
}

impl DistanceMetric {
    /// pgvector operator for this metric.
    pub fn operator(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "<=>",
            DistanceMetric::L2 => "<->",
        }
    }

    /// Distance between two vectors of equal length; smaller is closer.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                1.0 - dot / (norm_a * norm_b)
            }
            DistanceMetric::L2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "l2" | "euclidean" => Ok(DistanceMetric::L2),
            other => Err(format!("unknown distance metric '{}', expected cosine or l2", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VaultRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub tenant_id: Uuid,
    pub data_type: String,
    pub raw_data: Value,
    pub processing_status: ProcessingStatus,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVaultRecord {
    pub account_id: Uuid,
    pub tenant_id: Uuid,
    pub data_type: String,
    pub raw_data: Value,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CollectRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[schema(example = "note")]
    pub data_type: String,

    /// JSON object or array to store
    #[schema(value_type = Object, example = json!({"text": "hi"}))]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectResponse {
    pub id: Uuid,
    pub status: ProcessingStatus,
    pub message: String,
    /// Set when the record was stored but could not be queued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: ProcessingStatus,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text query
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    pub id: Uuid,
    #[schema(value_type = Object)]
    pub data: Value,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_metric_parsing() {
        assert_eq!("cosine".parse::<DistanceMetric>(), Ok(DistanceMetric::Cosine));
        assert_eq!("L2".parse::<DistanceMetric>(), Ok(DistanceMetric::L2));
        assert!("dot".parse::<DistanceMetric>().is_err());
        assert_eq!(DistanceMetric::default().operator(), "<=>");
        assert_eq!(DistanceMetric::L2.operator(), "<->");
    }

    #[test]
    fn test_cosine_distance_orders_by_angle() {
        let metric = DistanceMetric::Cosine;
        let query = [1.0, 0.0];
        assert!(metric.distance(&query, &[1.0, 0.0]) < 1e-6);
        assert!(metric.distance(&query, &[1.0, 1.0]) < metric.distance(&query, &[0.0, 1.0]));
        assert_eq!(metric.distance(&query, &[0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_l2_distance() {
        assert_eq!(DistanceMetric::L2.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_collect_response_omits_missing_warning() {
        let body = serde_json::to_value(CollectResponse {
            id: Uuid::nil(),
            status: ProcessingStatus::Pending,
            message: "ok".into(),
            warning: None,
        })
        .unwrap();

        assert_eq!(body["status"], "pending");
        assert!(body.get("warning").is_none());
    }
}
