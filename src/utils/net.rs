use url::Url;

pub fn join_url(base_url: &str, extend_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;

    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(extend_url.split('/').filter(|s| !s.is_empty()));

    Ok(url.to_string())
}

/// Resolves `path` against the origin of `base_url`, dropping any base path.
pub fn root_url(base_url: &str, path: &str) -> Result<String, url::ParseError> {
    let url = Url::parse(base_url)?.join(&format!("/{}", path.trim_start_matches('/')))?;

    Ok(url.to_string())
}
