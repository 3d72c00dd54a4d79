use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, error, warn};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::integration::api;

use super::model::{
    ChatCompletion, ChatCompletionRequest, ChatMessage, Compound, Molecule, PropertyResponse,
};
use super::{DEFAULT_MOLECULES, UNKNOWN_CATEGORY};

const COMPOUND_PROPERTIES: &str = "MolecularFormula,MolecularWeight,CanonicalSMILES,IUPACName";
const MOLECULE_PROPERTIES: &str = "MolecularWeight,CanonicalSMILES";
const CATEGORY_PROMPT: &str =
    "You are a chemistry expert. Given a molecule name, provide a brief category of its common usage.";

#[async_trait]
pub trait MoleculeService {
    async fn find_compound(&self, name: &str) -> super::Result<Compound>;

    async fn find_molecule(&self, name: &str) -> super::Result<Molecule>;

    async fn categorize(&self, name: &str) -> String;

    /// `None` when a specific query matches nothing, the listed rows stay as they are.
    async fn search(&self, query: &str) -> Option<Vec<Molecule>>;

    async fn generate(&self, payload: &Value) -> super::Result<(StatusCode, Value)>;
}

#[derive(Clone)]
pub struct MoleculeServiceImpl {
    cfg: api::Config,
    http: reqwest::Client,
}

impl MoleculeServiceImpl {
    pub fn new(cfg: api::Config, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    fn property_url(&self, name: &str, properties: &str) -> super::Result<Url> {
        let mut url = Url::parse(&self.cfg.pubchem_url)?;
        url.path_segments_mut()
            .map_err(|_| super::Error::InvalidUrl(self.cfg.pubchem_url.clone()))?
            .pop_if_empty()
            .extend(["rest", "pug", "compound", "name", name, "property", properties, "JSON"]);
        Ok(url)
    }

    async fn properties(&self, name: &str, properties: &str) -> super::Result<Compound> {
        let name = name.trim();
        if name.is_empty() {
            return Err(super::Error::MissingName);
        }

        let url = self.property_url(name, properties)?;
        debug!("fetching compound properties: {url}");

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            debug!("PubChem responded {} for {name}", response.status());
            return Err(super::Error::NotFound);
        }

        response
            .json::<PropertyResponse>()
            .await?
            .table
            .and_then(|t| t.properties.into_iter().next())
            .ok_or(super::Error::NoData)
    }

    async fn request_category(&self, name: &str) -> super::Result<Option<String>> {
        let url = format!(
            "{}/v1/chat/completions",
            self.cfg.openai_url.trim_end_matches('/')
        );
        let body = ChatCompletionRequest {
            model: &self.cfg.openai_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: CATEGORY_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("What is the category of {name}?"),
                },
            ],
        };

        let completion = self
            .http
            .post(url)
            .bearer_auth(&self.cfg.openai_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatCompletion>()
            .await?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty()))
    }

    async fn default_molecules(&self) -> Vec<Molecule> {
        let lookups = DEFAULT_MOLECULES.iter().map(|name| self.find_molecule(name));

        join_all(lookups)
            .await
            .into_iter()
            .zip(DEFAULT_MOLECULES)
            .filter_map(|(res, name)| {
                res.inspect_err(|e| warn!("Failed to fetch {name}: {e}")).ok()
            })
            .collect()
    }
}

#[async_trait]
impl MoleculeService for MoleculeServiceImpl {
    async fn find_compound(&self, name: &str) -> super::Result<Compound> {
        self.properties(name, COMPOUND_PROPERTIES).await
    }

    async fn find_molecule(&self, name: &str) -> super::Result<Molecule> {
        let compound = self.properties(name, MOLECULE_PROPERTIES).await?;
        let category = self.categorize(name).await;

        Ok(Molecule {
            name: name.trim().to_owned(),
            smiles: compound.canonical_smiles.unwrap_or_default(),
            molecular_weight: compound.molecular_weight.unwrap_or_default(),
            category,
        })
    }

    async fn categorize(&self, name: &str) -> String {
        if self.cfg.openai_key.is_empty() {
            return UNKNOWN_CATEGORY.to_owned();
        }

        match self.request_category(name).await {
            Ok(Some(category)) => category,
            Ok(None) => UNKNOWN_CATEGORY.to_owned(),
            Err(e) => {
                error!("AI categorization of {name} failed: {e}");
                UNKNOWN_CATEGORY.to_owned()
            }
        }
    }

    async fn search(&self, query: &str) -> Option<Vec<Molecule>> {
        let query = query.trim();
        if query.chars().count() <= 1 {
            return Some(self.default_molecules().await);
        }

        match self.find_molecule(query).await {
            Ok(molecule) => Some(vec![molecule]),
            Err(e) => {
                debug!("no molecule matches '{query}': {e}");
                None
            }
        }
    }

    async fn generate(&self, payload: &Value) -> super::Result<(StatusCode, Value)> {
        let response = self
            .http
            .post(&self.cfg.molmim_url)
            .bearer_auth(&self.cfg.nvidia_key)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }
}
