use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("employee age {0} is outside the permitted range of 18 to 65")]
    AgeNotValid(i32),
    #[error("salary {salary} is below the floor for an employee aged {age}")]
    SalaryNotValid { age: i32, salary: f64 },
    #[error("employee {0} is inactive and cannot be updated")]
    EmployeeInactive(i32),
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("record store failure")]
    Store(#[source] anyhow::Error),
}
