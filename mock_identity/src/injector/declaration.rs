use crate::descriptor::Descriptor;

/// Identity declarations shared by every test in a suite
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    name: String,
    descriptor: Option<Descriptor>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: None,
        }
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration for one test of this suite, inheriting the suite descriptor
    pub fn test(&self, name: impl Into<String>) -> TestDeclaration {
        TestDeclaration {
            name: format!("{}::{}", self.name, name.into()),
            class_level: self.descriptor.clone(),
            method_level: None,
        }
    }
}

/// Identity declarations applying to one test
#[derive(Debug, Clone, Default)]
pub struct TestDeclaration {
    name: String,
    class_level: Option<Descriptor>,
    method_level: Option<Descriptor>,
}

impl TestDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_level: None,
            method_level: None,
        }
    }

    pub fn class_level(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.class_level = Some(descriptor.into());
        self
    }

    pub fn method_level(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.method_level = Some(descriptor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective descriptor: method level always wins over class level
    pub fn resolve(&self) -> Option<&Descriptor> {
        self.method_level.as_ref().or(self.class_level.as_ref())
    }
}
