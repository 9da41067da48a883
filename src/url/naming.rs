/// Name given to the target for the site root
pub const HOMEPAGE_NAME: &str = "homepage";

/// Derives a filesystem-safe target name from a URL path
///
/// The root path maps to `homepage`. Any other path loses its leading slash,
/// has its remaining slashes turned into `-`, and then every character outside
/// `[A-Za-z0-9_-]` becomes `-` as well. The query string, when passed along
/// with the path, goes through the same replacement.
///
/// Distinct paths can produce the same name (`/a/b` and `/a-b`); callers that
/// need unique names disambiguate on top of this.
///
/// # Examples
///
/// ```
/// use visreg::url::target_name;
///
/// assert_eq!(target_name("/"), "homepage");
/// assert_eq!(target_name("/blog/post-1"), "blog-post-1");
/// assert_eq!(target_name("/search?q=a b"), "search-q-a-b");
/// ```
pub fn target_name(path: &str) -> String {
    if path == "/" || path.is_empty() {
        return HOMEPAGE_NAME.to_string();
    }

    let stripped = path.strip_prefix('/').unwrap_or(path);

    let name: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    // A lone "/" was already handled, so only "//"-style oddities get here empty
    if name.is_empty() {
        HOMEPAGE_NAME.to_string()
    } else {
        name
    }
}
