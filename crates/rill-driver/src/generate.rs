//! Generation phase: stage generated C++ for every resolved module.

use std::fs;

use rill_frontend::{Frontend, GenMode};

use crate::error::DriverError;
use crate::module::Module;
use crate::resolver::BuildUnit;

/// Generate header and implementation text for every module in the unit.
///
/// Headers and implementations for the whole unit are staged before any
/// backend work starts, so generated implementations can include sibling
/// headers freely. Within the unit, modules are independent.
pub fn generate_unit<F: Frontend>(frontend: &F, unit: &BuildUnit) -> Result<(), DriverError> {
    for module in unit.modules() {
        emit(frontend, module, GenMode::Header)?;
        emit(frontend, module, GenMode::Source)?;
    }
    Ok(())
}

/// Request one generated form from the frontend and write it verbatim to
/// the module's staged path.
fn emit<F: Frontend>(frontend: &F, module: &Module, mode: GenMode) -> Result<(), DriverError> {
    let text = frontend
        .generate(module.source_path(), mode)
        .map_err(|e| DriverError::Generation {
            module: module.name().to_string(),
            mode,
            source: e,
        })?;

    let target = match mode {
        GenMode::Header => module.header_path(),
        GenMode::Source => module.gen_source_path(),
    };

    fs::write(target, text).map_err(|e| DriverError::Io {
        path: target.to_path_buf(),
        source: e,
    })
}
