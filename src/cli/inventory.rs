//! Inventory command.
//!
//! The surface ansible talks to: `--list` prints the whole document,
//! `--host NAME` one host's variables. Output is plain JSON on stdout so
//! the binary can be used directly as an inventory script.

use tracing::debug;

use crate::cli::{output, InventoryArgs};
use crate::core::repository::Repository;
use crate::core::types::VarMap;
use crate::error::Result;

pub fn execute(repository: &Repository, args: &InventoryArgs) -> Result<()> {
    if args.graph {
        output::data(repository.graph()?.trim_end());
        return Ok(());
    }

    if let Some(host) = &args.host {
        // Ansible expects an empty object for hosts it should skip.
        let vars = match repository.host_vars(host, args.masked) {
            Ok(vars) => vars,
            Err(e) if e.is_not_found() => {
                debug!(host = %host, "unknown or inactive host");
                VarMap::new()
            }
            Err(e) => return Err(e),
        };
        let json = if args.pretty {
            serde_json::to_string_pretty(&vars)?
        } else {
            serde_json::to_string(&vars)?
        };
        output::data(&json);
        return Ok(());
    }

    let inventory = repository.inventory(args.masked)?;
    output::data(&inventory.to_json(args.pretty)?);
    Ok(())
}
