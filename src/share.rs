//! Share-intent URL construction

use url::Url;

/// Composer endpoint the share intent opens
const COMPOSE_ENDPOINT: &str = "https://warpcast.com/~/compose";

/// Prefilled share text
const SHARE_TEXT: &str = "Check my \u{1F95C} stats";

/// Build the composer URL that shares this widget: prefilled text plus the
/// widget's own URL as an embed.
pub fn compose_share_url(frame_url: &Url) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("text", SHARE_TEXT)
        .append_pair("embeds[]", frame_url.as_str())
        .finish();
    format!("{COMPOSE_ENDPOINT}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_url_embeds_frame_url() {
        let frame = Url::parse("https://nutbar.xyz/frames/acorntracker").unwrap();
        let share = compose_share_url(&frame);

        assert!(share.starts_with("https://warpcast.com/~/compose?"));
        // The embed URL is percent-encoded into the query
        assert!(share.contains("https%3A%2F%2Fnutbar.xyz%2Fframes%2Facorntracker"));
        // And the result itself parses back into a URL
        let parsed = Url::parse(&share).unwrap();
        let embeds: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(embeds
            .iter()
            .any(|(k, v)| k == "embeds[]" && v == frame.as_str()));
    }
}
