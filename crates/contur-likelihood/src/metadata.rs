//! Backend identification.

use serde::Serialize;

/// Descriptive metadata for the likelihood backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendMetadata {
    /// Registered backend name.
    pub name: &'static str,
    /// Backend version.
    pub version: &'static str,
    /// Original author of the likelihood construction.
    pub author: &'static str,
    /// Citable DOI.
    pub doi: &'static str,
    /// arXiv reference.
    #[serde(rename = "arXiv")]
    pub arxiv: &'static str,
}

/// Metadata of the Contur full likelihood.
pub const METADATA: BackendMetadata = BackendMetadata {
    name: "contur.full_likelihood",
    version: "1.0.0",
    author: "Joe Egan (joe.egan.23@ucl.ac.uk)",
    doi: "10.21468/SciPostPhysCore.4.2.013",
    arxiv: "2102.04377",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_with_arxiv_key() {
        let v = serde_json::to_value(METADATA).unwrap();
        assert_eq!(v["name"], "contur.full_likelihood");
        assert_eq!(v["arXiv"], "2102.04377");
        assert!(v.get("arxiv").is_none());
    }
}
