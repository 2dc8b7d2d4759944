use super::indices::NetId;
use crate::error::KernelResult;
use crate::util::check;

/// Net to pin map in CSR form.
///
/// `flat_netpin` concatenates the pins of every net in net order and
/// `netpin_start[n]..netpin_start[n + 1]` is the slice belonging to net `n`.
/// A validated topology guarantees every pin index is in range and referenced
/// by at most one net.
#[derive(Clone, Copy, Debug)]
pub struct NetTopology<'a> {
    flat_netpin: &'a [u32],
    netpin_start: &'a [u32],
    num_pins: usize,
}

impl<'a> NetTopology<'a> {
    pub fn new(flat_netpin: &'a [u32], netpin_start: &'a [u32], num_pins: usize) -> KernelResult<Self> {
        check::csr(flat_netpin, netpin_start, num_pins)?;
        Ok(Self {
            flat_netpin,
            netpin_start,
            num_pins,
        })
    }

    #[inline(always)]
    pub fn num_nets(&self) -> usize {
        self.netpin_start.len().saturating_sub(1)
    }

    #[inline(always)]
    pub fn num_pins(&self) -> usize {
        self.num_pins
    }

    #[inline(always)]
    pub fn pins(&self, net: NetId) -> &'a [u32] {
        let n = net.index();
        &self.flat_netpin[self.netpin_start[n] as usize..self.netpin_start[n + 1] as usize]
    }

}

/// Owned CSR arrays, for ops that keep the netlist across calls.
///
/// Only constructible through validation and immutable afterwards, so every
/// [`NetTopology`] it hands out keeps the one-net-per-pin guarantee.
#[derive(Clone, Debug)]
pub struct NetTopologyBuf {
    flat_netpin: Vec<u32>,
    netpin_start: Vec<u32>,
    num_pins: usize,
}

impl NetTopologyBuf {
    pub fn new(flat_netpin: Vec<u32>, netpin_start: Vec<u32>, num_pins: usize) -> KernelResult<Self> {
        check::csr(&flat_netpin, &netpin_start, num_pins)?;
        Ok(Self {
            flat_netpin,
            netpin_start,
            num_pins,
        })
    }

    /// Builds the CSR arrays from per-net pin lists.
    pub fn from_nets(nets: &[Vec<u32>], num_pins: usize) -> KernelResult<Self> {
        let mut flat_netpin = Vec::with_capacity(nets.iter().map(Vec::len).sum());
        let mut netpin_start = Vec::with_capacity(nets.len() + 1);
        netpin_start.push(0);
        for pins in nets {
            flat_netpin.extend_from_slice(pins);
            netpin_start.push(flat_netpin.len() as u32);
        }
        Self::new(flat_netpin, netpin_start, num_pins)
    }

    pub fn view(&self) -> NetTopology<'_> {
        NetTopology {
            flat_netpin: &self.flat_netpin,
            netpin_start: &self.netpin_start,
            num_pins: self.num_pins,
        }
    }

    pub fn num_nets(&self) -> usize {
        self.netpin_start.len().saturating_sub(1)
    }

    pub fn num_pins(&self) -> usize {
        self.num_pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_follow_start_offsets() {
        let flat = [0, 1, 2, 3, 4];
        let start = [0, 2, 5];
        let topo = NetTopology::new(&flat, &start, 5).unwrap();
        assert_eq!(topo.num_nets(), 2);
        assert_eq!(topo.pins(NetId::new(0)), &[0, 1]);
        assert_eq!(topo.pins(NetId::new(1)), &[2, 3, 4]);
    }

    #[test]
    fn from_nets_matches_manual_csr() {
        let topo = NetTopologyBuf::from_nets(&[vec![3], vec![], vec![0, 2]], 4).unwrap();
        assert_eq!(topo.flat_netpin, vec![3, 0, 2]);
        assert_eq!(topo.netpin_start, vec![0, 1, 1, 3]);
        assert_eq!(topo.view().pins(NetId::new(1)), &[] as &[u32]);
    }

    #[test]
    fn shared_pin_never_builds_an_owned_topology() {
        let err = NetTopologyBuf::from_nets(&[vec![0, 1], vec![1, 3]], 4).unwrap_err();
        assert_eq!(err.input(), Some("flat_netpin"));
    }

    #[test]
    fn missing_offsets_are_rejected() {
        assert!(NetTopologyBuf::new(vec![], vec![], 0).is_err());
        assert!(NetTopology::new(&[], &[], 0).is_err());
    }
}
