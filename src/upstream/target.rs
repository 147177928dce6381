//! Upstream URL construction.

/// Build the upstream URL for a proxied request.
///
/// The endpoint is joined to the base with a single `/` and the query is
/// appended untouched. An empty query adds nothing, not even the `?`.
pub fn build_target_url(base: &str, endpoint: &str, query: Option<&str>) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), endpoint);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Whether an endpoint contains a `.` or `..` segment.
///
/// URL parsing resolves these (percent-encoded forms and `\` separators
/// included), which would move the request outside the base path.
pub fn has_dot_segment(endpoint: &str) -> bool {
    endpoint.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
