//! Common utilities shared across handlers.

use axum::{
    http::{header, StatusCode},
    response::Response,
};

use map_common::MapError;

/// Generate a WMS-formatted exception response
pub fn wms_exception(code: &str, msg: &str, status: StatusCode) -> Response {
    let xml = format!(
        r#"<?xml version="1.0"?><ServiceExceptionReport><ServiceException code="{}">{}</ServiceException></ServiceExceptionReport>"#,
        code, msg
    );
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/xml")
        .body(xml.into())
        .unwrap()
}

/// Map a MapError to its WMS exception response, with the status code
/// derived from the error class.
pub fn error_response(err: &MapError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    wms_exception(err.wms_exception_code(), &err.to_string(), status)
}
