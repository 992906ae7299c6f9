//! The `key: Type = value` language of `iron.conf`.
//!
//! ```text
//! # comments start with '#' or '//'
//! color: Bool = false
//! templates: String = '~/my-templates';
//! ```
//!
//! Values are strings or booleans. A statement without a type is `Any`.

mod parser;
pub(crate) mod token;

use std::{collections::HashMap, path::Path};

use anyhow::anyhow;
use tera::Value;

use token::Tokens;

#[derive(Debug, PartialEq, Default)]
pub struct Values {
    pub value_map: HashMap<String, Value>,
    pub type_map: HashMap<String, Type>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type {
    String,
    Bool,
    Any,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::String => write!(f, "String"),
            Type::Bool => write!(f, "Bool"),
            Type::Any => write!(f, "Any"),
        }
    }
}

impl Type {
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            _ => Type::Any,
        }
    }

    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Type::Any, _) | (Type::String, Value::String(_)) | (Type::Bool, Value::Bool(_))
        )
    }
}

impl Values {
    /// Parses `s`, read from `path`, which only appears in error messages.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] on the first lexing or syntax error, pointing at
    /// the offending line.
    pub fn from_str(s: &str, path: &Path) -> anyhow::Result<Self> {
        let mut tokens = Tokens::lex(s, path.display().to_string()).map_err(|e| anyhow!(e))?;
        parser::parse_config(&mut tokens)
    }

    /// Checks every value against its declared type.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if any value does not match, after reporting each
    /// mismatch.
    pub fn verify_types(&self) -> anyhow::Result<()> {
        let mut res = Ok(());

        let mut keys = self.value_map.keys().collect::<Vec<_>>();
        keys.sort();

        for k in keys {
            let v = &self.value_map[k];
            let decl_type = self.type_map.get(k).copied().unwrap_or(Type::Any);

            crate::trace!("Decl type of '{k}' is {decl_type}");

            if !decl_type.accepts(v) {
                crate::error!(
                    "The value of '{k}' does not match with the declared type\n    Value: {v}\n    Decl type: {decl_type}\n    Real type: {}",
                    Type::of(v)
                );

                res = Err(anyhow!("Invalid configuration values/types"));
            }
        }

        res
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value_map.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.value_map.keys().map(String::as_str)
    }
}
