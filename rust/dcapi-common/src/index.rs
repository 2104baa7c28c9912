//! Search index naming.
//!
//! Every document type lives in its own index. Deployments share a cluster,
//! so the physical index name is the logical name with the environment
//! prefix from [`Settings::prefix`] in front.

use crate::Settings;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Logical indexes the API reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    /// Collections.
    Collection,
    /// File sets, each owned by a work.
    FileSet,
    /// Works.
    Work,
    /// Shared links. Not subject to visibility rules.
    SharedLink,
}

impl Index {
    /// Logical (unprefixed) index name.
    pub fn name(&self) -> &'static str {
        match self {
            Index::Collection => "dc-v2-collection",
            Index::FileSet => "dc-v2-file-set",
            Index::Work => "dc-v2-work",
            Index::SharedLink => "shared_links",
        }
    }

    /// Physical index name for the given deployment.
    pub fn target(&self, settings: &Settings) -> String {
        settings.prefix(self.name())
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown model name in a search path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown model: {0:?}")]
pub struct UnknownModel(pub String);

/// Searchable document models as they appear in request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    /// `collections`
    Collections,
    /// `file-sets`
    FileSets,
    /// `works`
    Works,
}

impl Model {
    /// Path name of the model.
    pub fn name(&self) -> &'static str {
        match self {
            Model::Collections => "collections",
            Model::FileSets => "file-sets",
            Model::Works => "works",
        }
    }

    /// The index holding documents of this model.
    pub fn index(&self) -> Index {
        match self {
            Model::Collections => Index::Collection,
            Model::FileSets => Index::FileSet,
            Model::Works => Index::Work,
        }
    }
}

impl FromStr for Model {
    type Err = UnknownModel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "collections" => Ok(Model::Collections),
            "file-sets" => Ok(Model::FileSets),
            "works" => Ok(Model::Works),
            other => Err(UnknownModel(other.to_string())),
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Split the `models` path parameter. Defaults to `works`.
pub fn extract_requested_models(path_parameter: Option<&str>) -> Vec<String> {
    match path_parameter {
        Some(models) if !models.trim().is_empty() => models
            .split(',')
            .map(|model| model.trim().to_string())
            .collect(),
        _ => vec![Model::Works.name().to_string()],
    }
}

/// Whether every requested model exists and can be rendered in `format`.
///
/// IIIF responses can only be built from works and collections.
pub fn valid_models<S: AsRef<str>>(models: &[S], format: &str) -> bool {
    models.iter().all(|name| match name.as_ref().parse::<Model>() {
        Ok(Model::FileSets) => format != "iiif",
        Ok(_) => true,
        Err(_) => false,
    })
}

/// Comma-joined physical index names for the requested models.
///
/// # Errors
///
/// Fails on the first name that is not a known model.
pub fn models_to_targets<S: AsRef<str>>(
    models: &[S],
    settings: &Settings,
) -> Result<String, UnknownModel> {
    let targets = models
        .iter()
        .map(|name| Ok(name.as_ref().parse::<Model>()?.index().target(settings)))
        .collect::<Result<Vec<_>, UnknownModel>>()?;
    Ok(targets.join(","))
}
