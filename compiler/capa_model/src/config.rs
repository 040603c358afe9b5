//! Engine configuration.

/// Names the engine uses for the code it synthesizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    /// Entry-point class holding every conversion and production factory.
    pub factory_name: String,
    /// Package of the archetype runtime types (`Sql`, `Query`).
    pub runtime_package: String,
    /// Suffix of composite carriers synthesized for productions.
    pub composite_suffix: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            factory_name: "Dsl".to_string(),
            runtime_package: "capa.runtime".to_string(),
            composite_suffix: "Impl".to_string(),
        }
    }
}

impl ModelConfig {
    #[must_use]
    pub fn with_factory_name(mut self, name: impl Into<String>) -> Self {
        self.factory_name = name.into();
        self
    }

    #[must_use]
    pub fn with_runtime_package(mut self, package: impl Into<String>) -> Self {
        self.runtime_package = package.into();
        self
    }
}
