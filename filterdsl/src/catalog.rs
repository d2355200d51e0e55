// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Field catalog: the read-only schema every parser entry point validates
//! against.
//!
//! A catalog is built once per schema (typically from model introspection in
//! the integration layer) and shared by immutable reference across concurrent
//! compilations. Nothing in this crate mutates it after construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Closed set of queryable field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Int,
    Float,
    String,
    Bool,
    Timestamp,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Description of a single queryable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    /// Whether substring/prefix/suffix operators apply to this field.
    pub text_capable: bool,
    /// Whether `isnull` applies to this field.
    pub nullable: bool,
}

impl FieldDescriptor {
    /// New descriptor with defaults: text-capable iff the type is `String`,
    /// not nullable.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            text_capable: field_type == FieldType::String,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn text_capable(mut self, text_capable: bool) -> Self {
        self.text_capable = text_capable;
        self
    }
}

/// Read-only mapping from field name to descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    fields: HashMap<String, FieldDescriptor>,
}

impl Catalog {
    pub fn new(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}
