use thiserror::Error;

/// Failures a kernel call can report before doing any work.
///
/// Every variant is fatal for the call that produced it. Kernels are pure, so
/// calling again with the same arguments fails the same way.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("contract violation on `{input}`: {constraint}")]
    ContractViolation {
        input: &'static str,
        constraint: String,
    },

    #[error("could not allocate `{buffer}` ({len} elements)")]
    ResourceExhaustion {
        buffer: &'static str,
        len: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl KernelError {
    pub fn violation(input: &'static str, constraint: impl Into<String>) -> Self {
        Self::ContractViolation {
            input,
            constraint: constraint.into(),
        }
    }

    /// Name of the offending input for contract violations.
    pub fn input(&self) -> Option<&'static str> {
        match self {
            Self::ContractViolation { input, .. } => Some(input),
            _ => None,
        }
    }
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Allocates a zero-filled output buffer, reporting allocation failure
/// instead of aborting.
pub fn zeroed<T: Clone + Default>(buffer: &'static str, len: usize) -> KernelResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| KernelError::ResourceExhaustion {
            buffer,
            len,
            source,
        })?;
    v.resize(len, T::default());
    Ok(v)
}
