use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Middleware collecting HTTP metrics (latency, request count)
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

/// Normalize URL path to avoid cardinality explosion
/// Replaces dynamic segments like ObjectIds with placeholders
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized: Vec<&str> = Vec::new();

    for segment in segments {
        if is_object_id_like(segment)
            || is_uuid_like(segment)
            || is_numeric_id(segment)
            || (follows_rollno_parent(normalized.last().copied(), segment) && !segment.is_empty())
        {
            normalized.push("{id}");
        } else {
            normalized.push(segment);
        }
    }

    normalized.join("/")
}

/// Roll numbers are free-form strings, so they are collapsed positionally:
/// the segment after /students/, /student/ and /analysis/ is a rollno
/// capture unless it is one of the static siblings (/students/register,
/// the /analysis/admin subtree).
fn follows_rollno_parent(prev: Option<&str>, segment: &str) -> bool {
    match prev {
        Some("students") => segment != "register",
        Some("student") => true,
        Some("analysis") => segment != "admin",
        _ => false,
    }
}

/// Check if string looks like a MongoDB ObjectId (24 hex characters)
fn is_object_id_like(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check if string looks like a UUID
fn is_uuid_like(s: &str) -> bool {
    // UUID format: 8-4-4-4-12 hex characters
    if s.len() != 36 {
        return false;
    }
    s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Check if string is a numeric ID
fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/api/quizzes/64fe2d1c9a1b2c3d4e5f6071"),
            "/api/quizzes/{id}"
        );
        assert_eq!(
            normalize_path("/api/quizzes/64fe2d1c9a1b2c3d4e5f6071/questions"),
            "/api/quizzes/{id}/questions"
        );
        assert_eq!(
            normalize_path("/api/students/21/submit"),
            "/api/students/{id}/submit"
        );
        assert_eq!(
            normalize_path("/api/students/CS101/resources/550e8400-e29b-41d4-a716-446655440000"),
            "/api/students/{id}/resources/{id}"
        );
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn rollno_segments_are_collapsed() {
        assert_eq!(
            normalize_path("/api/students/21CS001/performance"),
            "/api/students/{id}/performance"
        );
        assert_eq!(
            normalize_path("/api/students/21CS002/quiz-history"),
            "/api/students/{id}/quiz-history"
        );
        assert_eq!(
            normalize_path("/api/analysis/21CS001/64fe2d1c9a1b2c3d4e5f6071"),
            "/api/analysis/{id}/{id}"
        );
        assert_eq!(
            normalize_path("/api/analysis/admin/student/21CS001"),
            "/api/analysis/admin/student/{id}"
        );
        assert_eq!(
            normalize_path("/api/analysis/admin/summary"),
            "/api/analysis/admin/summary"
        );
        // Static routes keep their path label
        assert_eq!(
            normalize_path("/api/students/register"),
            "/api/students/register"
        );
        assert_eq!(normalize_path("/api/students"), "/api/students");
        assert_eq!(normalize_path("/api/students/"), "/api/students/");
    }

    #[test]
    fn test_is_object_id_like() {
        assert!(is_object_id_like("64fe2d1c9a1b2c3d4e5f6071"));
        assert!(!is_object_id_like("64fe2d1c9a1b2c3d4e5f60"));
        assert!(!is_object_id_like("not-an-object-id-at-all!"));
    }

    #[test]
    fn test_is_uuid_like() {
        assert!(is_uuid_like("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_uuid_like("not-a-uuid"));
        assert!(!is_uuid_like("12345"));
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("123"));
        assert!(is_numeric_id("999999"));
        assert!(!is_numeric_id("abc"));
        assert!(!is_numeric_id(""));
    }
}
