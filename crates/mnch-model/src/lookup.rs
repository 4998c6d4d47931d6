use std::collections::HashMap;

/// Case-insensitive name lookup that preserves the original spelling.
///
/// Keys are compared after trimming, uppercasing and collapsing inner
/// whitespace, so `"Births (thousands)"` matches `" births  (THOUSANDS) "`.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(lookup_key(name))
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&lookup_key(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&lookup_key(name))
    }
}

fn lookup_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignoring_case_and_spacing() {
        let set = CaseInsensitiveSet::new(["Births (thousands)", "ISO3 Alpha-code"]);
        assert_eq!(set.get(" births  (THOUSANDS) "), Some("Births (thousands)"));
        assert!(set.contains("iso3 alpha-code"));
        assert!(!set.contains("ISO2 Alpha-code"));
    }
}
