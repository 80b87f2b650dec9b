use std::path::Path;

/// Directory segments starting with `_` hide their whole subtree.
#[must_use]
pub fn is_private_segment(segment: &str) -> bool {
    segment.starts_with('_')
}

/// `(name)` directories organise files without appearing in the URL.
#[must_use]
pub fn is_group_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('(') && segment.ends_with(')')
}

/// Turn a path relative to the route root into a route pattern string.
///
/// Separators become `/`, a trailing file whose stem is `marker` is dropped, group
/// segments are stripped, and the result gets exactly one leading and no trailing `/`.
///
/// ```rust
/// use typedroute::registry::normalize_route_path;
///
/// assert_eq!(
///     normalize_route_path("api\\(admin)\\users\\[id]\\route.ts", Some("route")),
///     "/api/users/[id]"
/// );
/// assert_eq!(normalize_route_path("route.js", Some("route")), "/");
/// ```
#[must_use]
pub fn normalize_route_path(relative: &str, marker: Option<&str>) -> String {
    let unified = relative.replace('\\', "/");
    let mut segments: Vec<&str> = unified.split('/').filter(|s| !s.is_empty()).collect();

    if let (Some(marker), Some(&last)) = (marker, segments.last()) {
        let stem = Path::new(last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if stem == marker {
            segments.pop();
        }
    }

    let kept: Vec<&str> = segments
        .into_iter()
        .filter(|s| !is_group_segment(s))
        .collect();
    format!("/{}", kept.join("/"))
}

/// Drop the final extension of a file path: `users/[id].ts` → `users/[id]`.
#[must_use]
pub fn strip_extension(relative: &str) -> &str {
    let name_start = relative.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match relative[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &relative[..name_start + dot],
        _ => relative,
    }
}
