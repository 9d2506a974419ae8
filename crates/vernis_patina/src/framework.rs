//! Where the base component class comes from.

use thiserror::Error;
use vernis_croquis::{Program, SymbolId};

/// A UI framework whose class components are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFramework {
    /// Package that declares the base class
    pub package: &'static str,
    /// Export name of the base class
    pub export: &'static str,
    /// Method whose JSX is audited
    pub render_method: &'static str,
}

impl ComponentFramework {
    pub const REACT: Self = Self {
        package: "react",
        export: "Component",
        render_method: "render",
    };
}

impl Default for ComponentFramework {
    fn default() -> Self {
        Self::REACT
    }
}

/// Fatal problems found before any file is audited.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Could not find type of '{export}' exported by '{package}'")]
    BaseComponentNotFound {
        package: &'static str,
        export: &'static str,
    },
}

/// The resolved base class symbol of a framework.
#[derive(Debug, Clone, Copy)]
pub struct BaseComponent {
    pub symbol: SymbolId,
    pub framework: ComponentFramework,
}

impl BaseComponent {
    /// Find the framework's base class in the loaded typings.
    pub fn locate(program: &Program<'_>, framework: &ComponentFramework) -> Result<Self, SetupError> {
        let symbol = program
            .find_package_export(framework.package, framework.export)
            .ok_or(SetupError::BaseComponentNotFound {
                package: framework.package,
                export: framework.export,
            })?;

        tracing::debug!(
            "base component {}.{} is symbol {}",
            framework.package,
            framework.export,
            symbol.as_u32()
        );
        Ok(Self {
            symbol,
            framework: *framework,
        })
    }
}
