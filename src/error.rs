#[derive(Debug, Clone, PartialEq)]
pub enum VcError {
    Generic(String),
    Config(String),
    ReadFile(String, String),
    CreateFile(String, String),
    WriteFile(String, String),
    LoadGraph(String),
    NotDirectory(String),
    InvariantViolation(String),
    WorkerPanic(usize),
}

impl VcError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, VcError::InvariantViolation(_))
    }
}

impl std::fmt::Display for VcError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VcError::Generic(msg) => write!(f, "[VcError] {}", msg)?,
            VcError::Config(msg) => write!(f, "[ConfigError] {}", msg)?,
            VcError::ReadFile(file_path, e) => {
                write!(f, "[IOError] Could not open file '{}' for reading: {}", file_path, e)?;
            }
            VcError::CreateFile(file_path, e) => {
                write!(f, "[IOError] Could not create file '{}' for writing: {}", file_path, e)?;
            }
            VcError::WriteFile(file_path, e) => {
                write!(f, "[IOError] Could not write to '{}': {}", file_path, e)?;
            }
            VcError::LoadGraph(message) => write!(f, "[LoadGraphError] {}", message)?,
            VcError::NotDirectory(path) => {
                write!(f, "[IOError] Invalid output directory: '{}'", path)?;
            }
            VcError::InvariantViolation(message) => {
                write!(f, "[InvariantViolation] {}", message)?;
            }
            VcError::WorkerPanic(worker_id) => {
                write!(f, "[PartitionError] Worker {} panicked", worker_id)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for VcError {}
