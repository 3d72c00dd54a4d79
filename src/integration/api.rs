use std::env;

use log::warn;

const PUBCHEM_URL: &str = "https://pubchem.ncbi.nlm.nih.gov";
const OPENAI_URL: &str = "https://api.openai.com";
const OPENAI_MODEL: &str = "gpt-4";
const MOLMIM_URL: &str = "https://health.api.nvidia.com/v1/biology/nvidia/molmim/generate";

/// Endpoints and credentials of the third-party services the dashboard proxies.
#[derive(Clone)]
pub struct Config {
    pub pubchem_url: String,
    pub openai_url: String,
    pub openai_key: String,
    pub openai_model: String,
    pub molmim_url: String,
    pub nvidia_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pubchem_url: PUBCHEM_URL.into(),
            openai_url: OPENAI_URL.into(),
            openai_key: String::new(),
            openai_model: OPENAI_MODEL.into(),
            molmim_url: MOLMIM_URL.into(),
            nvidia_key: String::new(),
        }
    }
}

impl Config {
    pub fn env() -> Self {
        let default = Self::default();

        let openai_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            warn!("OPENAI_API_KEY is not set, molecule categories will be unknown");
            String::new()
        });
        let nvidia_key = env::var("NVIDIA_API_KEY").unwrap_or_else(|_| {
            warn!("NVIDIA_API_KEY is not set, molecule generation proxy will be rejected");
            String::new()
        });

        Self {
            pubchem_url: env::var("PUBCHEM_URL").unwrap_or(default.pubchem_url),
            openai_url: env::var("OPENAI_URL").unwrap_or(default.openai_url),
            openai_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or(default.openai_model),
            molmim_url: env::var("MOLMIM_URL").unwrap_or(default.molmim_url),
            nvidia_key,
        }
    }
}
