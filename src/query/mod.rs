//! Query translation module
//!
//! Turns a browser-facing catalog URL such as
//! `https://www.vinted.fr/catalog?catalog[]=79&status[]=3&search_text=robe rouge`
//! into the query string the catalog API expects:
//! - array keys (`brand_id[]`) are pluralized and merged into one
//!   comma-joined parameter (`brand_ids=53,34`)
//! - identifier filters are renamed (`catalog[]` to `catalog_ids`)
//! - spaces in values become `+`
//! - `order=newest_first` and the swap flag are filled in when missing
//! - caller-supplied parameters override everything else

mod params;

pub use params::{array_key, ParamValue, QueryParams, ARRAY_MARKER};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Order applied when the URL does not pick one
pub const DEFAULT_ORDER: &str = "newest_first";

/// Backend flag controlling whether swap listings are returned
pub const SWAP_PARAM: &str = "is_for_swap";

static HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^www\.vinted\.([a-z]+(?:\.[a-z]+)?)$").unwrap());

/// Result of translating a catalog URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Whether the URL belongs to a regional marketplace site
    pub valid: bool,
    /// Region code taken from the host (`fr`, `be`, `co.uk`)
    pub domain: Option<String>,
    /// Normalized API query string
    pub querystring: Option<String>,
}

impl ParsedQuery {
    fn valid(domain: String, querystring: String) -> Self {
        Self {
            valid: true,
            domain: Some(domain),
            querystring: Some(querystring),
        }
    }

    fn invalid() -> Self {
        Self {
            valid: false,
            domain: None,
            querystring: None,
        }
    }

    /// Domain and query string, when valid
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.valid, self.domain, self.querystring) {
            (true, Some(domain), Some(querystring)) => Some((domain, querystring)),
            _ => None,
        }
    }
}

/// Options for [`translate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Leave `order` unset when the URL has none
    pub disable_default_order: bool,
    /// Ask for swap listings (`is_for_swap=1`)
    pub include_swap_items: bool,
    /// Applied last, in order; each one overwrites any existing entry
    pub custom_params: Vec<(String, String)>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_default_order(mut self, disable: bool) -> Self {
        self.disable_default_order = disable;
        self
    }

    pub fn include_swap_items(mut self, include: bool) -> Self {
        self.include_swap_items = include;
        self
    }

    /// Add a custom parameter; numbers are accepted as well as strings
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.custom_params.push((key.into(), value.to_string()));
        self
    }

    fn has_custom(&self, key: &str) -> bool {
        self.custom_params.iter().any(|(k, _)| k == key)
    }
}

/// Translate a marketplace URL into a catalog API query string.
///
/// Never fails: anything that is not a regional marketplace URL comes back as
/// an invalid [`ParsedQuery`].
pub fn translate(url: &str, options: &TranslateOptions) -> ParsedQuery {
    // Escapes must form valid UTF-8; decoding itself happens once, per pair
    if let Err(e) = urlencoding::decode(url) {
        debug!("Cannot decode URL {}: {}", url, e);
        return ParsedQuery::invalid();
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Cannot parse URL {}: {}", url, e);
            return ParsedQuery::invalid();
        }
    };

    let Some(domain) = region_domain(&parsed) else {
        return ParsedQuery::invalid();
    };

    let mut params = QueryParams::new();
    for (key, value) in parsed.query_pairs() {
        let value = normalize_value(&value);
        match key.strip_suffix(ARRAY_MARKER) {
            Some(base) if !base.is_empty() => params.push_list(array_key(base), value),
            _ => params.set(key.to_string(), value),
        }
    }

    if !options.disable_default_order && !params.contains_key("order") && !options.has_custom("order") {
        params.set("order", DEFAULT_ORDER);
    }

    if options.include_swap_items {
        params.set(SWAP_PARAM, "1");
    } else if !params.contains_key(SWAP_PARAM) {
        params.set(SWAP_PARAM, "0");
    }

    for (key, value) in &options.custom_params {
        params.set(key.clone(), value.clone());
    }

    ParsedQuery::valid(domain, params.to_query_string())
}

/// Region code of a marketplace URL, if it is one
pub fn region_domain(url: &Url) -> Option<String> {
    if url.scheme() != "https" {
        return None;
    }

    let host = url.host_str()?;
    HOST_RE.captures(host).map(|cap| cap[1].to_string())
}

/// Re-encode a decoded value so it survives in the query string: spaces
/// become `+`, delimiters stay escaped, everything else is kept as is.
fn normalize_value(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ' ' => out.push('+'),
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn querystring(url: &str, options: &TranslateOptions) -> String {
        let parsed = translate(url, options);
        assert!(parsed.valid, "expected {} to be valid", url);
        parsed.querystring.unwrap()
    }

    #[test]
    fn test_full_catalog_url() {
        let url = "https://www.vinted.fr/vetements?search_text=or%20plaqué&currency=EUR&catalog[]=79&catalog[]=1816&size_id[]=207&size_id[]=208&brand_id[]=53&price_to=20&status[]=3&status[]=2&status[]=1&status[]=6&order=newest_first";
        let options = TranslateOptions::new().param("per_page", "10");

        let parsed = translate(url, &options);
        assert_eq!(parsed.domain.as_deref(), Some("fr"));
        assert_eq!(
            parsed.querystring.as_deref(),
            Some("search_text=or+plaqué&currency=EUR&catalog_ids=79,1816&size_ids=207,208&brand_ids=53&price_to=20&status_ids=3,2,1,6&order=newest_first&is_for_swap=0&per_page=10")
        );
    }

    #[test]
    fn test_invalid_hosts() {
        let options = TranslateOptions::new();
        for url in [
            "",
            "not a url",
            "https://www.leboncoin.fr/recherche?text=robe",
            "http://www.vinted.fr/catalog",
            "https://vinted.fr/catalog",
            "https://www.vinted.fr.example.com/catalog",
            "https://www.vinted.123/catalog",
            "ftp://www.vinted.fr/",
            "https://www.vinted.fr/%E0%A4%A",
        ] {
            let parsed = translate(url, &options);
            assert!(!parsed.valid, "expected {} to be invalid", url);
            assert!(parsed.clone().into_parts().is_none());
        }
    }

    #[test]
    fn test_region_domains() {
        let options = TranslateOptions::new();
        let be = translate("https://www.vinted.be/catalog", &options);
        assert_eq!(be.domain.as_deref(), Some("be"));

        let uk = translate("https://www.vinted.co.uk/catalog?search_text=jeans", &options);
        assert_eq!(uk.domain.as_deref(), Some("co.uk"));
    }

    #[test]
    fn test_default_order_once() {
        let qs = querystring("https://www.vinted.fr/catalog?search_text=jeans", &TranslateOptions::new());
        assert_eq!(qs.matches("order=newest_first").count(), 1);
        assert_eq!(qs, "search_text=jeans&order=newest_first&is_for_swap=0");
    }

    #[test]
    fn test_existing_order_kept() {
        let qs = querystring("https://www.vinted.fr/catalog?order=price_low_to_high", &TranslateOptions::new());
        assert_eq!(qs, "order=price_low_to_high&is_for_swap=0");
    }

    #[test]
    fn test_disable_default_order() {
        let options = TranslateOptions::new().disable_default_order(true);
        let qs = querystring("https://www.vinted.fr/catalog?search_text=jeans", &options);
        assert!(!qs.contains("order="));
    }

    #[test]
    fn test_custom_order_not_duplicated() {
        let options = TranslateOptions::new().param("order", "relevance");
        let qs = querystring("https://www.vinted.fr/catalog?search_text=jeans", &options);
        assert_eq!(qs, "search_text=jeans&is_for_swap=0&order=relevance");
    }

    #[test]
    fn test_swap_policy() {
        let url = "https://www.vinted.fr/catalog?search_text=jeans";

        let with_swap = TranslateOptions::new().include_swap_items(true);
        assert!(querystring(url, &with_swap).ends_with("is_for_swap=1"));

        let explicit = "https://www.vinted.fr/catalog?is_for_swap=1";
        assert_eq!(querystring(explicit, &TranslateOptions::new()), "is_for_swap=1&order=newest_first");
    }

    #[test]
    fn test_array_merge_order() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?brand_id[]=53&brand_id[]=34",
            &TranslateOptions::new(),
        );
        assert!(qs.starts_with("brand_ids=53,34&"));
    }

    #[test]
    fn test_identifier_renames() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?catalog[]=79&catalog[]=1816&status[]=3&status[]=2",
            &TranslateOptions::new(),
        );
        assert!(qs.contains("catalog_ids=79,1816"));
        assert!(qs.contains("status_ids=3,2"));
    }

    #[test]
    fn test_encoded_array_marker() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?color_ids%5B%5D=1&color_ids%5B%5D=12",
            &TranslateOptions::new(),
        );
        assert!(qs.starts_with("color_ids=1,12&"));
    }

    #[test]
    fn test_spaces() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?search_text=robe%20rouge%20longue",
            &TranslateOptions::new(),
        );
        assert!(qs.starts_with("search_text=robe+rouge+longue&"));

        let plus = querystring("https://www.vinted.fr/catalog?search_text=robe+rouge", &TranslateOptions::new());
        assert!(plus.starts_with("search_text=robe+rouge&"));
    }

    #[test]
    fn test_reserved_characters_stay_escaped() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?search_text=C%23&brand_id[]=53",
            &TranslateOptions::new(),
        );
        assert_eq!(qs, "search_text=C%23&brand_ids=53&order=newest_first&is_for_swap=0");

        let qs = querystring(
            "https://www.vinted.fr/catalog?search_text=H%26M&price_to=20",
            &TranslateOptions::new(),
        );
        assert_eq!(qs, "search_text=H%26M&price_to=20&order=newest_first&is_for_swap=0");

        let qs = querystring(
            "https://www.vinted.fr/catalog?search_text=1%2B1%3D2%20100%25",
            &TranslateOptions::new(),
        );
        assert!(qs.starts_with("search_text=1%2B1%3D2+100%25&"));
    }

    #[test]
    fn test_empty_values() {
        let qs = querystring(
            "https://www.vinted.fr/catalog?search_text=%20%20&price_to=",
            &TranslateOptions::new(),
        );
        assert!(qs.starts_with("search_text=&price_to=&"));
    }

    #[test]
    fn test_custom_params_override() {
        let options = TranslateOptions::new().param("per_page", 10).param("brand_ids", "7");
        let qs = querystring(
            "https://www.vinted.fr/catalog?brand_id[]=53&brand_id[]=34",
            &options,
        );
        assert_eq!(qs, "brand_ids=7&order=newest_first&is_for_swap=0&per_page=10");
        assert!(qs.ends_with("per_page=10"));
    }

    #[test]
    fn test_idempotent() {
        let url = "https://www.vinted.fr/catalog?catalog[]=79&search_text=a%20b&price_to=20";
        let options = TranslateOptions::new().param("page", 2);
        assert_eq!(translate(url, &options), translate(url, &options));
    }
}
