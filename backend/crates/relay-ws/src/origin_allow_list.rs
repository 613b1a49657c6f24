use std::collections::HashSet;

/// Exact-match set of origins allowed to open subscriber connections.
///
/// Entries and presented origins are compared after stripping trailing `/`,
/// so `https://app.example.com/` and `https://app.example.com` are the same.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: HashSet<String>,
}

impl OriginAllowList {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| normalize(origin.as_ref().trim()).to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        Self { origins }
    }

    /// Build from a comma-separated list, as found in the environment
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = normalize(origin);
        !origin.is_empty() && self.origins.contains(origin)
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim_end_matches('/')
}
