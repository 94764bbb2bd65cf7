//! Domain types.

mod audit;
mod group;
mod host;
mod inventory;
mod value;
mod variable;

pub use audit::{Finding, Severity};
pub use group::{Group, GroupPatch, RequiredVariable};
pub use host::{Host, HostFilter, HostGroup, HostPatch};
pub use inventory::{GroupEntry, Inventory, Meta};
pub use value::{Blob, GroupVariable, HostVariable, Sealed, StoredValue, VarEntry, Write};
pub use variable::{
    VarType, Variable, VariableAlias, VariableFilter, VariablePatch, VariableSpec,
};
