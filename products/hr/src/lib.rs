//! Employee records with enforced hiring invariants: age bounds, a salary
//! floor for older hires, and active/inactive lifecycle gating on update.

mod error;
mod service;
mod store;

pub use error::EmployeeError;
pub use service::EmployeeService;
pub use store::{EmployeeDraft, EmployeeStore, OrmEmployeeStore};
