use hostdisco_common::network::mac;
use pnet::util::MacAddr;

use crate::ports::vendors::VendorRepository;

pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        mac::get_vendor(mac_addr)
    }
}

/// Resolves nothing. For callers that do not want the OUI database loaded.
pub struct NoVendorLookup;

impl VendorRepository for NoVendorLookup {
    fn get_vendor(&self, _mac_addr: MacAddr) -> Option<String> {
        None
    }
}
