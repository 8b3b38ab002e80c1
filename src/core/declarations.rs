//! Declarations pulled out of a JS/TS codebase for architecture diagrams.

use serde::{Deserialize, Serialize};

/// Data-access namespace a model declaration was registered through.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataLayer {
    Mongoose,
    Sequelize,
    Prisma,
}

impl DataLayer {
    pub const ALL: [DataLayer; 3] = [DataLayer::Mongoose, DataLayer::Sequelize, DataLayer::Prisma];

    pub fn from_identifier(ident: &str) -> Option<Self> {
        Self::ALL.iter().find(|layer| layer.as_str() == ident).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataLayer::Mongoose => "mongoose",
            DataLayer::Sequelize => "sequelize",
            DataLayer::Prisma => "prisma",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub layer: DataLayer,
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerInfo {
    pub name: String,
    pub methods: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub properties: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeclarationSet {
    pub models: Vec<ModelInfo>,
    pub controllers: Vec<ControllerInfo>,
    pub types: Vec<TypeInfo>,
}

impl DeclarationSet {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.controllers.is_empty() && self.types.is_empty()
    }

    /// Appends another file's declarations, keeping discovery order.
    pub fn merge(&mut self, other: DeclarationSet) {
        self.models.extend(other.models);
        self.controllers.extend(other.controllers);
        self.types.extend(other.types);
    }
}
