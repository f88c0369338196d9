use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

/// The tab whose audio will be captured.
#[derive(Debug, Clone)]
pub struct TabInfo {
    pub id: String,
    pub url: String,
}

/// Resolves the currently focused tab, if any.
#[async_trait::async_trait]
pub trait TabResolver: Send + Sync {
    async fn active_tab(&self) -> Result<Option<TabInfo>>;
}

/// Mints a single-use stream token for a tab's capturable audio.
///
/// Tokens are resolved fresh on every start and never cached.
#[async_trait::async_trait]
pub trait StreamTokenResolver: Send + Sync {
    async fn resolve(&self, tab: &TabInfo) -> Result<String>;
}

/// Resolver for deployments that always capture one configured tab.
pub struct StaticTabResolver {
    tab: Option<TabInfo>,
}

impl StaticTabResolver {
    pub fn new(url: Option<String>) -> Self {
        Self {
            tab: url.map(|url| TabInfo {
                id: "tab-0".to_string(),
                url,
            }),
        }
    }
}

#[async_trait::async_trait]
impl TabResolver for StaticTabResolver {
    async fn active_tab(&self) -> Result<Option<TabInfo>> {
        Ok(self.tab.clone())
    }
}

/// Token resolver that mints a fresh opaque id per request.
pub struct MintedTokenResolver;

#[async_trait::async_trait]
impl StreamTokenResolver for MintedTokenResolver {
    async fn resolve(&self, tab: &TabInfo) -> Result<String> {
        let token = format!("stream-{}-{}", tab.id, Uuid::new_v4());
        debug!("Minted stream token for tab {}", tab.id);
        Ok(token)
    }
}
