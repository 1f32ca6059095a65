use rawhttp::http::response::StatusCode;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::OK.as_u16(), 200);
    assert_eq!(StatusCode::BAD_REQUEST.as_u16(), 400);
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), 500);
    assert_eq!(StatusCode(418).as_u16(), 418);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    assert_eq!(StatusCode::BAD_REQUEST.reason_phrase(), "Bad Request");
    assert_eq!(
        StatusCode::INTERNAL_SERVER_ERROR.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_unknown_status_codes_have_empty_reason() {
    for code in [100, 201, 204, 301, 404, 502] {
        assert_eq!(StatusCode(code).reason_phrase(), "", "code {}", code);
    }
}

#[test]
fn test_status_code_display() {
    assert_eq!(StatusCode::OK.to_string(), "200");
    assert_eq!(StatusCode(404).to_string(), "404");
}
