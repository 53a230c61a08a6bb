use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use rc_shared::ApiResponse;
use serde::Serialize;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID from the `X-Request-ID` header, or a fresh one
pub fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Wrap `data` in the success envelope
pub fn success_json<T: Serialize>(
    mut builder: HttpResponseBuilder,
    data: T,
    request_id: &str,
) -> HttpResponse {
    builder.json(ApiResponse::success(data).with_request_id(request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_request_id_is_taken_from_header() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_http_request();
        assert_eq!(request_id(&req), "abc-123");
    }

    #[test]
    fn test_request_id_is_generated_when_missing() {
        let req = TestRequest::default().to_http_request();
        assert!(Uuid::parse_str(&request_id(&req)).is_ok());
    }
}
