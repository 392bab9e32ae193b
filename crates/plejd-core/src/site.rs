//! Site description as fetched from the Plejd cloud
//!
//! Only the parts the registry needs are modelled: the site identity and the
//! mesh crypto key. The key is kept verbatim and never interpreted here.

use serde::{Deserialize, Serialize};

/// Opaque mesh crypto key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptoKey(String);

impl CryptoKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CryptoKey(<redacted>)")
    }
}

/// Site identity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetails {
    pub site_id: String,
    #[serde(default)]
    pub title: String,
}

/// Mesh section of the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlejdMesh {
    #[serde(default)]
    pub plejd_mesh_id: Option<String>,
    pub crypto_key: CryptoKey,
}

/// Site object handed to the registry once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSite {
    #[serde(default)]
    pub site: SiteDetails,
    pub plejd_mesh: PlejdMesh,
}

impl ApiSite {
    pub fn new(site_id: impl Into<String>, crypto_key: CryptoKey) -> Self {
        Self {
            site: SiteDetails {
                site_id: site_id.into(),
                title: String::new(),
            },
            plejd_mesh: PlejdMesh {
                plejd_mesh_id: None,
                crypto_key,
            },
        }
    }

    /// The nested mesh crypto key
    pub fn crypto_key(&self) -> &CryptoKey {
        &self.plejd_mesh.crypto_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_from_json() {
        let json = r#"{
            "site": { "siteId": "site-1", "title": "Home" },
            "plejdMesh": { "plejdMeshId": "mesh-9", "cryptoKey": "0a1b2c3d" }
        }"#;
        let site: ApiSite = serde_json::from_str(json).unwrap();
        assert_eq!(site.site.site_id, "site-1");
        assert_eq!(site.site.title, "Home");
        assert_eq!(site.crypto_key().as_str(), "0a1b2c3d");
    }

    #[test]
    fn test_crypto_key_debug_is_redacted() {
        let site = ApiSite::new("site-1", CryptoKey::new("secret-key"));
        let debug = format!("{:?}", site);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
