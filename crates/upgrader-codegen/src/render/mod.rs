//! Rendering the registry into generated source

mod cpp;
mod json;

pub use cpp::CppRenderer;
pub use json::JsonRenderer;

use crate::error::CodegenResult;
use crate::registry::UpgraderRegistry;

/// Turns a validated registry into the text of one output file
pub trait Render {
    /// File name the output is conventionally written to
    fn file_name(&self) -> &str;

    /// Append the rendered registry to `out`
    fn render_into(&self, registry: &UpgraderRegistry, out: &mut String) -> CodegenResult<()>;

    /// Render the registry to a new string
    fn render(&self, registry: &UpgraderRegistry) -> CodegenResult<String> {
        let mut out = String::new();
        self.render_into(registry, &mut out)?;
        Ok(out)
    }
}

/// Output format selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// C++ source for the mobile runtime
    #[default]
    Cpp,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// The renderer for this format
    pub fn renderer(self) -> Box<dyn Render> {
        match self {
            OutputFormat::Cpp => Box::new(CppRenderer::default()),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}
