//! Flattened request parameters.
//!
//! The backend takes every argument as a flat form field; nested objects use
//! colon-separated prefixes (`filter:entryIdEqual`, `pager:pageSize`).

/// An ordered list of form parameters for one API call.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    entries: Vec<(String, String)>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Add the parameter only when a value is present.
    pub fn set_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    /// Merge another list under a `prefix:` namespace.
    pub fn nest(mut self, prefix: &str, other: ParamList) -> Self {
        for (key, value) in other.entries {
            self.entries.push((format!("{}:{}", prefix, key), value));
        }
        self
    }

    /// Append another list as-is, keeping this list's entries first.
    pub fn extend(mut self, other: ParamList) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Page window for list actions. Page indexes are 1-based.
#[derive(Debug, Clone)]
pub struct Pager {
    pub page_size: u32,
    pub page_index: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page_size: 500,
            page_index: 1,
        }
    }
}

impl Pager {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            page_index: 1,
        }
    }

    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaFilterPager")
            .set("pageSize", self.page_size)
            .set("pageIndex", self.page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_prefixes_keys() {
        let filter = ParamList::new()
            .set("objectType", "KalturaMediaEntryFilter")
            .set("entryIdEqual", "0_abc");

        let params = ParamList::new().set("ks", "token").nest("filter", filter);

        let keys: Vec<&str> = params.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ks", "filter:objectType", "filter:entryIdEqual"]);
    }

    #[test]
    fn test_set_opt_skips_none() {
        let params = ParamList::new()
            .set_opt("tagsLike", None::<String>)
            .set_opt("userIdEqual", Some("jdoe"));
        assert_eq!(params.entries().len(), 1);
        assert_eq!(params.entries()[0].0, "userIdEqual");
    }

    #[test]
    fn test_pager_params() {
        let pager = Pager::with_page_size(100);
        let params = pager.to_params();
        assert!(params
            .entries()
            .iter()
            .any(|(k, v)| k == "pageSize" && v == "100"));
        assert!(params
            .entries()
            .iter()
            .any(|(k, v)| k == "pageIndex" && v == "1"));
    }
}
