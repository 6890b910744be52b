//! Package download URLs.

/// URL of the zip export for one translation set.
///
/// `base_projects_url` is used verbatim and is expected to end with a slash
/// (e.g. `https://translate.example.com/projects/`). Slashes around
/// `project_path` are trimmed; an empty path still yields a URL.
pub fn build_url(base_projects_url: &str, project_path: &str, locale: &str, set_slug: &str) -> String {
    format!(
        "{}{}/{}/{}/export-translations/?format=zip",
        base_projects_url,
        project_path.trim_matches('/'),
        locale,
        set_slug
    )
}

/// Projects URL for a site home URL: `{home}/projects/`.
pub fn projects_url(home_url: &str) -> String {
    format!("{}/projects/", home_url.trim_end_matches('/'))
}
