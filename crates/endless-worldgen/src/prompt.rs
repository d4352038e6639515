//! Prompt composition via `minijinja`.
//!
//! The world-designer prompt ships inside the binary. Operators can point
//! `generation.templates_dir` at a directory holding their own
//! `world_generator.j2` to tune it without recompiling.

use endless_types::world::{
    EXIT_GAP_WIDTH, MAP_HEIGHT, MAP_WIDTH, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use minijinja::{Environment, context};

use crate::error::GenerationError;

/// File name looked up in an override directory.
pub const TEMPLATE_FILE: &str = "world_generator.j2";

const TEMPLATE_NAME: &str = "world_generator";
const BUILTIN_TEMPLATE: &str = include_str!("../templates/world_generator.j2");

/// Renders the full generation prompt for a theme and optional description.
pub struct PromptComposer {
    env: Environment<'static>,
}

impl PromptComposer {
    /// Composer using the built-in template.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] if the template fails to compile.
    pub fn builtin() -> Result<Self, GenerationError> {
        Self::from_source(BUILTIN_TEMPLATE.to_owned())
    }

    /// Composer loading `world_generator.j2` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] if the file cannot be read or
    /// fails to compile.
    pub fn from_dir(dir: &str) -> Result<Self, GenerationError> {
        Self::from_source(load_template(dir, TEMPLATE_FILE)?)
    }

    fn from_source(source: String) -> Result<Self, GenerationError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(false);
        env.add_template_owned(TEMPLATE_NAME, source).map_err(|e| {
            GenerationError::Template(format!("failed to add world generator template: {e}"))
        })?;
        Ok(Self { env })
    }

    /// Render the prompt.
    ///
    /// The dimension contract is injected from the shared constants so the
    /// prompt never drifts from what the validator enforces.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] if rendering fails.
    pub fn compose(&self, theme: &str, description: Option<&str>) -> Result<String, GenerationError> {
        let max_x = MAP_WIDTH.saturating_sub(1);
        let max_y = MAP_HEIGHT.saturating_sub(1);
        self.env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| GenerationError::Template(format!("missing world generator template: {e}")))?
            .render(context! {
                map_width => MAP_WIDTH,
                map_height => MAP_HEIGHT,
                viewport_width => VIEWPORT_WIDTH,
                viewport_height => VIEWPORT_HEIGHT,
                max_x => max_x,
                max_y => max_y,
                exit_gap_width => EXIT_GAP_WIDTH,
                intent => user_intent(theme, description),
            })
            .map_err(|e| GenerationError::Template(format!("world generator render failed: {e}")))
    }
}

/// The one-line request the player actually made. A blank description is
/// treated as absent.
pub fn user_intent(theme: &str, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(desc) => format!("Create a {theme} themed map with the following description: {desc}"),
        None => format!("Create a creative and unique {theme} themed map"),
    }
}

fn load_template(dir: &str, filename: &str) -> Result<String, GenerationError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| GenerationError::Template(format!("failed to read {path}: {e}")))
}
