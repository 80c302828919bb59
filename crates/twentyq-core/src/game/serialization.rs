//! JSON catalog files.
//!
//! A catalog manifest lets a host swap in its own candidate roster and
//! question bank instead of the built-in one. Omitted `no` weights default to
//! the negation of `yes`.

use crate::model::answer::Answer;
use crate::model::candidate::CandidateProfile;
use crate::model::catalog::{Catalog, CatalogError};
use crate::model::question::Question;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CATALOG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogManifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub candidates: Vec<CandidateProfile>,
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionEntry {
    pub prompt: String,
    pub yes: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<Vec<i32>>,
}

fn default_schema_version() -> String {
    CATALOG_SCHEMA_VERSION.to_string()
}

impl CatalogManifest {
    pub fn capture(catalog: &Catalog) -> Self {
        let questions = catalog
            .bank()
            .iter()
            .map(|question| {
                let yes = question.weights(Answer::Yes).to_vec();
                let no = question.weights(Answer::No).to_vec();
                let negated = yes.iter().zip(&no).all(|(y, n)| *y == -*n);
                QuestionEntry {
                    prompt: question.prompt().to_string(),
                    yes,
                    no: if negated { None } else { Some(no) },
                }
            })
            .collect();

        CatalogManifest {
            schema_version: default_schema_version(),
            candidates: catalog.candidates().to_vec(),
            questions,
        }
    }

    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        if self.schema_version != CATALOG_SCHEMA_VERSION {
            return Err(CatalogError::UnsupportedSchema(self.schema_version));
        }

        let questions = self
            .questions
            .into_iter()
            .map(|entry| match entry.no {
                Some(no) => Question::new(entry.prompt, entry.yes, no),
                None => Question::symmetric(entry.prompt, entry.yes),
            })
            .collect();

        Catalog::new(self.candidates, questions)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(catalog: &Catalog) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&Self::capture(catalog))?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_file<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), CatalogError> {
        let json = Self::to_json(catalog)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Loads and validates a catalog manifest from disk.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    CatalogManifest::from_file(path)?.into_catalog()
}

#[cfg(test)]
mod tests {
    use super::CatalogManifest;
    use crate::model::answer::Answer;
    use crate::model::catalog::{Catalog, CatalogError};

    #[test]
    fn standard_catalog_serializes_without_no_weights() {
        let json = CatalogManifest::to_json(&Catalog::standard()).unwrap();
        assert!(json.contains("\"schema_version\": \"1\""));
        assert!(json.contains("Flipper Zero"));
        assert!(!json.contains("\"no\""));
    }

    #[test]
    fn manifest_restores_standard_catalog() {
        let catalog = Catalog::standard();
        let restored = CatalogManifest::capture(&catalog).into_catalog().unwrap();
        assert_eq!(restored, catalog);
    }

    #[test]
    fn explicit_no_weights_are_kept() {
        let json = r#"{
            "candidates": [
                { "name": "Cat", "category": "Animal" },
                { "name": "Oak", "category": "Plant" }
            ],
            "questions": [
                { "prompt": "Does it purr?", "yes": [4, -1], "no": [-2, 0] },
                { "prompt": "Is it green?", "yes": [-1, 3] }
            ]
        }"#;
        let catalog = CatalogManifest::from_json(json)
            .unwrap()
            .into_catalog()
            .unwrap();
        assert_eq!(catalog.bank().weights(0, Answer::No).unwrap(), &[-2, 0]);
        assert_eq!(catalog.bank().weights(1, Answer::No).unwrap(), &[1, -3]);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let json = r#"{ "schema_version": "9", "candidates": [], "questions": [] }"#;
        let err = CatalogManifest::from_json(json)
            .unwrap()
            .into_catalog()
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedSchema(v) if v == "9"));
    }

    #[test]
    fn malformed_json_surfaces_parse_error() {
        assert!(matches!(
            CatalogManifest::from_json("{ not json"),
            Err(CatalogError::Json(_))
        ));
    }
}
