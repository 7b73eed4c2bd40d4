//! Cross-checks the bundler relies on. The parser never runs these; they
//! validate a finished [`App`] before it is bundled.

use crate::diagnostics::ConfError;
use crate::parser::ast::App;

/// Every route dependency must name a declared package, and a dialog route
/// cannot have a layout.
pub fn check_app(app: &App) -> Result<(), ConfError> {
    for route in app.all_routes() {
        if let Some(missing) = route.depends.iter().find(|dep| app.package(dep).is_none()) {
            return Err(ConfError::reference(format!(
                "package '{missing}' not found, required by route '{}'",
                route.path
            )));
        }
        if route.dialog && route.layout.is_some() {
            return Err(ConfError::reference(format!(
                "dialog route '{}' cannot have a layout",
                route.path
            )));
        }
    }
    Ok(())
}
