//! HTTP-station adapter: one GET per transition, path chosen by state.

use crate::stations::kind::HttpTarget;

pub fn build_request(target: &HttpTarget, on: bool) -> String {
    let path = target.path_for(on);
    format!(
        "GET /{} HTTP/1.0\r\nHOST: {}\r\n\r\n",
        path.trim_start_matches('/'),
        target.endpoint.host
    )
}
