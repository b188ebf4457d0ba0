//! TTL cache for generation responses
//!
//! Generation is slow and priced per call; identical (course, task)
//! requests inside the window are served from cache instead of hitting
//! the API again.

use std::time::Duration;

use mini_moka::sync::Cache;

use crate::content::{CourseDescriptor, TaskKind, TaskResponse};

/// Default deduplication window (30 minutes)
const DEFAULT_TTL_SECS: u64 = 1800;

/// Maximum cached task responses
const MAX_ENTRIES: u64 = 256;

/// Cache key: course identity plus task kind
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
struct TaskKey {
    subject: String,
    topics: Vec<String>,
    kind: TaskKind,
}

impl TaskKey {
    fn new(course: &CourseDescriptor, kind: TaskKind) -> Self {
        Self {
            subject: course.name.clone(),
            topics: course.topics.clone(),
            kind,
        }
    }
}

/// TTL-based cache of generation responses
///
/// Both the key and the window follow course identity: a changed topic
/// list is a different course and misses the cache.
#[derive(Clone)]
pub struct ResponseCache {
    responses: Cache<TaskKey, TaskResponse>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

impl ResponseCache {
    /// Create a cache with the given TTL in seconds
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            responses: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }

    /// Look up a cached response for one task of a course
    #[must_use]
    pub fn get(&self, course: &CourseDescriptor, kind: TaskKind) -> Option<TaskResponse> {
        self.responses.get(&TaskKey::new(course, kind))
    }

    /// Store a task response
    pub fn put(&self, course: &CourseDescriptor, kind: TaskKind, response: TaskResponse) {
        self.responses.insert(TaskKey::new(course, kind), response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> TaskResponse {
        serde_json::from_str(
            r#"{"task_type":"content","result":{"content":{"raw":"notes"}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn hit_within_window() {
        let cache = ResponseCache::default();
        let course = CourseDescriptor::new("Biology", vec!["Cells".to_string()]);

        assert!(cache.get(&course, TaskKind::Notes).is_none());
        cache.put(&course, TaskKind::Notes, sample_response());
        assert!(cache.get(&course, TaskKind::Notes).is_some());
    }

    #[test]
    fn key_includes_kind_and_topics() {
        let cache = ResponseCache::default();
        let course = CourseDescriptor::new("Biology", vec!["Cells".to_string()]);
        cache.put(&course, TaskKind::Notes, sample_response());

        assert!(cache.get(&course, TaskKind::Quiz).is_none());

        let other = CourseDescriptor::new("Biology", vec!["Genetics".to_string()]);
        assert!(cache.get(&other, TaskKind::Notes).is_none());
    }
}
