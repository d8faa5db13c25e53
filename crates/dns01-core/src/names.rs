//! Mapping of resolved challenge names onto provider record locations

/// Strip a single trailing root-zone terminator
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Where a challenge record lives at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    /// Zone name without trailing dot
    pub domain: String,
    /// Portion of the FQDN preceding the zone, without trailing dot
    pub subname: String,
}

impl RecordLocation {
    /// Derive the location from the resolved FQDN and zone
    ///
    /// `_acme-challenge.sub.example.com.` in zone `example.com.` becomes
    /// domain `example.com`, subname `_acme-challenge.sub`. An FQDN equal to
    /// the zone maps to the apex (empty subname).
    pub fn from_resolved(resolved_fqdn: &str, resolved_zone: &str) -> Self {
        let prefix = resolved_fqdn
            .strip_suffix(resolved_zone)
            .unwrap_or(resolved_fqdn);

        Self {
            domain: un_fqdn(resolved_zone).to_string(),
            subname: un_fqdn(prefix).to_string(),
        }
    }
}

impl std::fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.subname.is_empty() {
            write!(f, "{}", self.domain)
        } else {
            write!(f, "{}.{}", self.subname, self.domain)
        }
    }
}
