use axum::{
    body::Body as AxumBody,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

tokio::task_local! {
    static REQUEST_LOCALE: String;
}

const SUPPORTED_LOCALES: [&str; 2] = ["ru", "en"];

/// Resolves the locale from `Accept-Language` and scopes it to the request,
/// so error messages rendered while handling it use that language.
pub async fn i18n_middleware(req: Request<AxumBody>, next: Next) -> Response {
    let locale = locale_from_headers(req.headers()).unwrap_or_else(|| rust_i18n::locale().to_string());
    REQUEST_LOCALE.scope(locale, next.run(req)).await
}

fn locale_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or(tag).trim())
        .and_then(|tag| tag.split('-').next())
        .map(|lang| lang.to_ascii_lowercase())
        .filter(|lang| SUPPORTED_LOCALES.contains(&lang.as_str()))
}

/// Locale of the request being handled, or the process default outside a request.
pub fn current_locale() -> String {
    REQUEST_LOCALE
        .try_with(|locale| locale.clone())
        .unwrap_or_else(|_| rust_i18n::locale().to_string())
}

/// Translates `key` into the current request locale.
pub fn tr(key: &str) -> String {
    let locale = current_locale();
    t!(key, locale = locale.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn picks_first_supported_language_tag() {
        assert_eq!(locale_from_headers(&headers("en-US,en;q=0.9")), Some("en".to_string()));
        assert_eq!(locale_from_headers(&headers("ru;q=1.0")), Some("ru".to_string()));
    }

    #[test]
    fn unsupported_language_falls_through() {
        assert_eq!(locale_from_headers(&headers("de-DE,de")), None);
        assert_eq!(locale_from_headers(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn translation_follows_scoped_locale() {
        let en = REQUEST_LOCALE
            .scope("en".to_string(), async { tr("errors.not_found.customer") })
            .await;
        let ru = REQUEST_LOCALE
            .scope("ru".to_string(), async { tr("errors.not_found.customer") })
            .await;
        assert_eq!(en, "Customer not found.");
        assert_eq!(ru, "Клиент не найден.");
    }
}
