// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::env;

/// Names of the request parameters carrying the two query strings.
///
/// The integration layer extracts both values (already URL-decoded) under
/// these names and hands them to [`crate::compile`].
#[derive(Debug, Clone)]
pub struct ParamConfig {
    pub filter_param: String,
    pub sort_param: String,
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self {
            filter_param: "filter".to_string(),
            sort_param: "sort".to_string(),
        }
    }
}

impl ParamConfig {
    pub fn from_env() -> Self {
        let filter_param =
            env::var("FILTERDSL_FILTER_PARAM").unwrap_or_else(|_| "filter".to_string());
        let sort_param = env::var("FILTERDSL_SORT_PARAM").unwrap_or_else(|_| "sort".to_string());
        Self {
            filter_param,
            sort_param,
        }
    }

    /// Pull the filter and sort strings out of a decoded parameter map.
    /// Missing parameters read as empty, which compiles to an empty query.
    pub fn extract<'a>(&self, params: &'a HashMap<String, String>) -> (&'a str, &'a str) {
        let filter = params.get(&self.filter_param).map_or("", String::as_str);
        let sort = params.get(&self.sort_param).map_or("", String::as_str);
        (filter, sort)
    }
}
