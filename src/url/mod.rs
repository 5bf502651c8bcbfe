//! URL building for the directory site
//!
//! The listing endpoint and the detail pages are both derived from a single
//! configured base URL, so tests can point the whole harvest at a mock server.

use crate::harvest::Record;
use crate::ConfigError;
use url::Url;

/// Builds listing and detail URLs relative to the directory's base URL
#[derive(Debug, Clone)]
pub struct DirectoryUrls {
    base: Url,
}

impl DirectoryUrls {
    /// Creates a URL builder for the given base URL
    ///
    /// # Examples
    ///
    /// ```
    /// use church_harvest::url::DirectoryUrls;
    ///
    /// let urls = DirectoryUrls::new("https://www.kyrktorget.se").unwrap();
    /// assert_eq!(
    ///     urls.listing_url(7).as_str(),
    ///     "https://www.kyrktorget.se/api/filter?type=lan&ids=7"
    /// );
    /// ```
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "base_url '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self { base })
    }

    /// Listing API endpoint filtered to one region
    pub fn listing_url(&self, region_id: u32) -> Url {
        let mut url = self.with_segments(&["api", "filter"]);
        url.query_pairs_mut()
            .append_pair("type", "lan")
            .append_pair("ids", &region_id.to_string());
        url
    }

    /// Detail page of a record
    ///
    /// Records with a short name live at `/<shortname>`, the rest at
    /// `/church/<id>`.
    pub fn detail_url(&self, record: &Record) -> Url {
        match record.short_name() {
            Some(short_name) => self.with_segments(&[short_name]),
            None => self.with_segments(&["church", &record.id.to_string()]),
        }
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
