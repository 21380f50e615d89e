// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for table operations

use std::fmt;

/// ErrorKind is all kinds of Error of treehash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The config for the table is invalid.
    ConfigInvalid,
    /// The key is already stored in the table.
    DuplicateKey,
    /// Every slot of the table is occupied.
    TableFull,
    /// The collision tree reached its node budget without finding an empty address.
    UnresolvableCollision,
    /// Self-fill ran out of attempts before reaching the target item count.
    FillExhausted,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::DuplicateKey => "DuplicateKey",
            ErrorKind::TableFull => "TableFull",
            ErrorKind::UnresolvableCollision => "UnresolvableCollision",
            ErrorKind::FillExhausted => "FillExhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all fallible table functions.
#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    ///
    /// # Examples
    ///
    /// ```
    /// use treehash::error::{Error, ErrorKind};
    ///
    /// let error = Error::new(ErrorKind::TableFull, "no free slot").with_context("capacity", 11);
    /// assert_eq!(error.kind(), ErrorKind::TableFull);
    /// assert_eq!(error.to_string(), "TableFull, context: { capacity: 11 } => no free slot");
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the context value recorded under `key`, if any.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn duplicate_key(key: u64) -> Self {
        Self::new(ErrorKind::DuplicateKey, "key is already stored").with_context("key", key)
    }

    pub(crate) fn table_full(key: u64, capacity: usize) -> Self {
        Self::new(ErrorKind::TableFull, "no free slot left")
            .with_context("key", key)
            .with_context("capacity", capacity)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_context() {
        let error = Error::new(ErrorKind::ConfigInvalid, "packing factor out of range");
        assert_eq!(
            error.to_string(),
            "ConfigInvalid => packing factor out of range"
        );
    }

    #[test]
    fn test_context_lookup() {
        let error = Error::duplicate_key(27);
        assert_eq!(error.kind(), ErrorKind::DuplicateKey);
        assert_eq!(error.context("key"), Some("27"));
        assert_eq!(error.context("address"), None);
    }

    #[test]
    fn test_debug_lists_context() {
        let error = Error::table_full(5, 11);
        let rendered = format!("{error:?}");
        assert!(rendered.starts_with("TableFull => no free slot left"));
        assert!(rendered.contains("   capacity: 11"));
    }
}
