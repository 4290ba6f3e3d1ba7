const fn release_or_cargo_version(release: Option<&'static str>) -> &'static str {
    match release {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Build version; release pipelines stamp it through `ARTICLE_API_VERSION`.
pub const VERSION: &str = release_or_cargo_version(option_env!("ARTICLE_API_VERSION"));
