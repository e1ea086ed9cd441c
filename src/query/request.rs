use crate::error::TailError;
use crate::window::PollWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a `_search` request in the legacy "filtered query" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub size: usize,
    pub sort: Sort,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filtered: Filtered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filtered {
    pub query: FilteredQuery,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredQuery {
    pub query_string: QueryString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryString {
    // The backend expects the string "true", not a JSON boolean
    pub analyze_wildcard: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub bool: BoolFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolFilter {
    pub must: Vec<Must>,
    pub must_not: Vec<MustNot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Must {
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(rename = "@timestamp")]
    pub timestamp: TimestampRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampRange {
    pub gte: DateTime<Utc>,
    pub lte: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MustNot {}

impl SearchRequest {
    /// Request the oldest `count` hits for `query` inside `window`.
    pub fn new(query: &str, count: usize, window: PollWindow) -> Self {
        Self {
            size: count,
            sort: Sort {
                timestamp: "asc".to_string(),
            },
            query: Query {
                filtered: Filtered {
                    query: FilteredQuery {
                        query_string: QueryString {
                            analyze_wildcard: "true".to_string(),
                            query: query.to_string(),
                        },
                    },
                    filter: Filter {
                        bool: BoolFilter {
                            must: vec![Must {
                                range: Range {
                                    timestamp: TimestampRange {
                                        gte: window.gte,
                                        lte: window.lte,
                                    },
                                },
                            }],
                            must_not: Vec::new(),
                        },
                    },
                },
            },
        }
    }

    pub fn query_string(&self) -> &str {
        &self.query.filtered.query.query_string.query
    }

    pub fn window(&self) -> Option<PollWindow> {
        self.query
            .filtered
            .filter
            .bool
            .must
            .first()
            .map(|must| PollWindow {
                gte: must.range.timestamp.gte,
                lte: must.range.timestamp.lte,
            })
    }

    /// Pretty-printed JSON body.
    pub fn to_json(&self) -> Result<Vec<u8>, TailError> {
        serde_json::to_vec_pretty(self).map_err(TailError::EncodeRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn window() -> PollWindow {
        PollWindow {
            gte: Utc.with_ymd_and_hms(2024, 3, 1, 11, 50, 0).unwrap(),
            lte: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_request_json_shape() {
        let request = SearchRequest::new("foo", 50, window());
        let value: serde_json::Value = serde_json::from_slice(&request.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "size": 50,
                "sort": { "@timestamp": "asc" },
                "query": {
                    "filtered": {
                        "query": {
                            "query_string": {
                                "analyze_wildcard": "true",
                                "query": "foo"
                            }
                        },
                        "filter": {
                            "bool": {
                                "must": [
                                    {
                                        "range": {
                                            "@timestamp": {
                                                "gte": "2024-03-01T11:50:00Z",
                                                "lte": "2024-03-01T12:00:00Z"
                                            }
                                        }
                                    }
                                ],
                                "must_not": []
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_request_survives_json() {
        let request = SearchRequest::new("service:api AND level:error", 500, window());
        let decoded: SearchRequest = serde_json::from_slice(&request.to_json().unwrap()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_accessors() {
        let request = SearchRequest::new("nginx", 10, window());
        assert_eq!(request.query_string(), "nginx");
        assert_eq!(request.window(), Some(window()));
    }

    #[test]
    fn test_body_is_pretty_printed() {
        let request = SearchRequest::new("nginx", 10, window());
        let body = String::from_utf8(request.to_json().unwrap()).unwrap();
        assert!(body.contains('\n'));
        assert!(body.starts_with("{\n"));
    }
}
