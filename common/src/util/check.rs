//! Precondition checks run once before a kernel touches its inputs.
//!
//! Each check names the offending input and the violated constraint.

use crate::error::{KernelError, KernelResult};
use crate::numeric::Scalar;

pub fn even_length(input: &'static str, len: usize) -> KernelResult<()> {
    if len & 1 != 0 {
        return Err(KernelError::violation(
            input,
            format!("must have an even number of elements, got {}", len),
        ));
    }
    Ok(())
}

pub fn length(input: &'static str, actual: usize, expected: usize) -> KernelResult<()> {
    if actual != expected {
        return Err(KernelError::violation(
            input,
            format!("expected {} elements, got {}", expected, actual),
        ));
    }
    Ok(())
}

/// Validates net CSR arrays against a pin count.
///
/// Besides the shape rules this rejects a pin referenced by two nets, since
/// the wirelength kernels write per-pin gradients from per-net work items.
pub fn csr(flat_netpin: &[u32], netpin_start: &[u32], num_pins: usize) -> KernelResult<()> {
    let Some((&first, _)) = netpin_start.split_first() else {
        return Err(KernelError::violation(
            "netpin_start",
            "must hold num_nets + 1 entries, got an empty array",
        ));
    };
    if first != 0 {
        return Err(KernelError::violation(
            "netpin_start",
            format!("must start at 0, starts at {}", first),
        ));
    }
    if let Some(n) = netpin_start.windows(2).position(|w| w[1] < w[0]) {
        return Err(KernelError::violation(
            "netpin_start",
            format!(
                "must be non-decreasing, entry {} ({}) follows {}",
                n + 1,
                netpin_start[n + 1],
                netpin_start[n]
            ),
        ));
    }
    let last = netpin_start[netpin_start.len() - 1] as usize;
    if last != flat_netpin.len() {
        return Err(KernelError::violation(
            "netpin_start",
            format!(
                "must end at the pin reference count {}, ends at {}",
                flat_netpin.len(),
                last
            ),
        ));
    }

    let mut seen = vec![false; num_pins];
    for (j, &pin) in flat_netpin.iter().enumerate() {
        let p = pin as usize;
        if p >= num_pins {
            return Err(KernelError::violation(
                "flat_netpin",
                format!("entry {} references pin {} of {}", j, p, num_pins),
            ));
        }
        if std::mem::replace(&mut seen[p], true) {
            return Err(KernelError::violation(
                "flat_netpin",
                format!("pin {} belongs to more than one net", p),
            ));
        }
    }
    Ok(())
}

pub fn net_mask(mask: &[u8], num_nets: usize) -> KernelResult<()> {
    length("net_mask", mask.len(), num_nets)
}

/// Net weights are either disabled (empty) or one per net.
pub fn net_weights<T: Scalar>(weights: &[T], num_nets: usize) -> KernelResult<()> {
    if weights.is_empty() {
        return Ok(());
    }
    length("net_weights", weights.len(), num_nets)?;
    if let Some(n) = weights.iter().position(|w| !w.is_finite()) {
        return Err(KernelError::violation(
            "net_weights",
            format!("weight of net {} is not finite", n),
        ));
    }
    Ok(())
}

pub fn inv_gamma<T: Scalar>(inv_gamma: T) -> KernelResult<()> {
    if !(inv_gamma.is_finite() && inv_gamma > T::zero()) {
        return Err(KernelError::violation(
            "inv_gamma",
            format!("must be finite and positive, got {}", inv_gamma),
        ));
    }
    Ok(())
}

pub fn movable_range(num_movable_nodes: usize, num_nodes: usize) -> KernelResult<()> {
    if num_movable_nodes > num_nodes {
        return Err(KernelError::violation(
            "num_movable_nodes",
            format!("{} exceeds node count {}", num_movable_nodes, num_nodes),
        ));
    }
    Ok(())
}
