//! Cursor-paginated API responses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::raw::{self, RawJson};

/// A page of results from the Replicate API.
///
/// Pages link to their neighbours through opaque cursor URLs. A page decoded
/// from a response keeps the exact JSON it was decoded from and serializes
/// back to those bytes, including any fields this type does not model.
///
/// Mutating `previous`, `next` or `results` on a decoded page is **not**
/// reflected when it is serialized again: the captured JSON always wins.
/// Pages built with [`Page::new`] have no captured JSON and serialize from
/// their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Page<T> {
    /// URL of the previous page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// URL of the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The items on this page, in server order.
    pub results: Vec<T>,

    #[serde(skip)]
    raw_json: RawJson,
}

impl<T> Page<T> {
    /// Create a page from items, with no cursors.
    #[must_use]
    pub fn new(results: Vec<T>) -> Self {
        Self {
            previous: None,
            next: None,
            results,
            raw_json: None,
        }
    }

    /// Set the next-page cursor.
    #[must_use]
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Set the previous-page cursor.
    #[must_use]
    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.previous = Some(previous.into());
        self
    }

    /// The JSON this page was decoded from, if it was decoded.
    pub fn raw_json(&self) -> Option<&RawValue> {
        self.raw_json.as_deref()
    }

    /// Returns true if the server reported a following page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Map the results to a different type.
    ///
    /// The mapped page has no captured JSON.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            previous: self.previous,
            next: self.next,
            results: self.results.into_iter().map(f).collect(),
            raw_json: None,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        raw::emit(&self.raw_json, serializer, |s| Page::<T>::serialize(self, s))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (mut page, raw) = raw::capture(deserializer, |json| Page::<T>::deserialize(json))?;
        page.raw_json = Some(raw);
        Ok(page)
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{"previous":null,"next":"https://api.replicate.com/v1/models?cursor=abc","results":[1, 2,3],"extra":{"kept":true}}"#;

    #[test]
    fn test_decode_populates_fields() {
        let page: Page<u32> = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.previous, None);
        assert_eq!(
            page.next.as_deref(),
            Some("https://api.replicate.com/v1/models?cursor=abc")
        );
        assert_eq!(page.results, vec![1, 2, 3]);
        assert!(page.has_next());
        assert_eq!(page.raw_json().map(RawValue::get), Some(PAGE));
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let page: Page<u32> = serde_json::from_slice(PAGE.as_bytes()).unwrap();
        let out = serde_json::to_vec(&page).unwrap();
        assert_eq!(out, PAGE.as_bytes());
    }

    #[test]
    fn test_mutation_after_decode_is_not_serialized() {
        let mut page: Page<u32> = serde_json::from_str(PAGE).unwrap();
        page.next = Some("https://elsewhere.example/page/9".to_string());
        page.results.push(4);

        let out = serde_json::to_string(&page).unwrap();
        assert_eq!(out, PAGE);
        assert!(!out.contains("elsewhere"));
    }

    #[test]
    fn test_built_page_serializes_from_fields() {
        let page = Page::new(vec![1, 2]).with_next("/models?cursor=b");
        let out = serde_json::to_string(&page).unwrap();
        assert_eq!(out, r#"{"next":"/models?cursor=b","results":[1,2]}"#);

        let empty: Page<u32> = Page::default();
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"results":[]}"#);
    }

    #[test]
    fn test_results_must_be_an_array() {
        let err = serde_json::from_str::<Page<u32>>(r#"{"next":null,"results":{"a":1}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_undecodable_item_fails_whole_page() {
        let err = serde_json::from_str::<Page<u32>>(r#"{"results":[1,"two",3]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_cursors_default_to_none() {
        let page: Page<String> = serde_json::from_str(r#"{"results":["a"]}"#).unwrap();
        assert!(page.previous.is_none());
        assert!(!page.has_next());
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_page_map_drops_raw_json() {
        let page: Page<u32> = serde_json::from_str(PAGE).unwrap();
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.results, vec![2, 4, 6]);
        assert!(mapped.raw_json().is_none());
        assert!(mapped.has_next());
    }
}
