use serde::{Deserialize, Serialize};

/// Connection parameters for the hosted listings backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RestSourceParams {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Anonymous or service API key sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Table holding the listings
    pub table: String,
    /// Column selection, including the embedded owner profile
    pub select: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RestSourceParams {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: None,
            table: "deals".to_string(),
            select: "*,owner:profiles(id,full_name,email)".to_string(),
            timeout_secs: 30,
        }
    }
}
