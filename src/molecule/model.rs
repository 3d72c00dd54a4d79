use serde::{Deserialize, Deserializer, Serialize};

/// Properties of a named substance as reported by PubChem.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Compound {
    #[serde(default)]
    pub molecular_formula: Option<String>,
    #[serde(default, deserialize_with = "weight")]
    pub molecular_weight: Option<String>,
    #[serde(default, rename = "CanonicalSMILES")]
    pub canonical_smiles: Option<String>,
    #[serde(default, rename = "IUPACName")]
    pub iupac_name: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    pub table: Option<PropertyTable>,
}

#[derive(Deserialize)]
pub(super) struct PropertyTable {
    #[serde(rename = "Properties", default)]
    pub properties: Vec<Compound>,
}

/// PubChem reports weights as strings, older records as numbers.
fn weight<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Weight {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Weight>::deserialize(d)?.map(|w| match w {
        Weight::Text(s) => s,
        Weight::Number(n) => n.to_string(),
    }))
}

/// A row of the molecule table.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Molecule {
    pub name: String,
    pub smiles: String,
    pub molecular_weight: String,
    pub category: String,
}

#[derive(Serialize)]
pub(super) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
pub(super) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: String,
}

#[derive(Deserialize)]
pub(super) struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub(super) struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
pub(super) struct ChoiceMessage {
    pub content: Option<String>,
}
