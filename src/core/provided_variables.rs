//! Statically provided variables and the accessors that supply their values

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::ArtifactError;

/// Variable name to the module that provides its value.
///
/// Compiled artifacts reference a provider module per variable; the module is then
/// resolved to an accessor through a [`ProvidedVariableRegistry`].
pub type ProvidedVariablesType = BTreeMap<String, String>;

/// A zero-argument accessor for a provided variable's value
pub trait ProvidedVariable: Send + Sync {
    fn get(&self) -> Value;
}

impl<F> ProvidedVariable for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn get(&self) -> Value {
        self()
    }
}

/// Provider that always answers the same value
#[derive(Debug, Clone)]
pub struct ConstantProvider(pub Value);

impl ProvidedVariable for ConstantProvider {
    fn get(&self) -> Value {
        self.0.clone()
    }
}

#[derive(Clone, Default)]
pub struct ProvidedVariableRegistry {
    providers: HashMap<String, Arc<dyn ProvidedVariable>>,
}

impl fmt::Debug for ProvidedVariableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modules: Vec<_> = self.providers.keys().collect();
        modules.sort();
        f.debug_struct("ProvidedVariableRegistry")
            .field("modules", &modules)
            .finish()
    }
}

impl ProvidedVariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        module: impl Into<String>,
        provider: impl ProvidedVariable + 'static,
    ) {
        self.providers.insert(module.into(), Arc::new(provider));
    }

    pub fn from_constants(constants: Map<String, Value>) -> Self {
        let mut registry = Self::new();
        for (module, value) in constants {
            registry.register(module, ConstantProvider(value));
        }
        registry
    }

    /// Load constant providers from a JSON object of module name to value
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let constants: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_constants(constants))
    }

    pub fn get(&self, module: &str) -> Option<&Arc<dyn ProvidedVariable>> {
        self.providers.get(module)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Provided variables of one request, each bound to its accessor
#[derive(Clone, Default)]
pub struct ProvidedVariables {
    accessors: BTreeMap<String, Arc<dyn ProvidedVariable>>,
}

impl ProvidedVariables {
    pub fn resolve(
        declared: &ProvidedVariablesType,
        registry: &ProvidedVariableRegistry,
    ) -> Result<Self, ArtifactError> {
        let accessors = declared
            .iter()
            .map(|(variable, module)| {
                registry
                    .get(module)
                    .cloned()
                    .map(|accessor| (variable.clone(), accessor))
                    .ok_or_else(|| ArtifactError::MissingProvidedVariable {
                        variable: variable.clone(),
                        module: module.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { accessors })
    }

    /// Call every accessor
    pub fn values(&self) -> Map<String, Value> {
        self.accessors
            .iter()
            .map(|(name, accessor)| (name.clone(), accessor.get()))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl fmt::Debug for ProvidedVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.accessors.keys()).finish()
    }
}
