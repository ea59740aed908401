use colored::*;
use hostdisco_common::facts::InterfaceFacts;
use hostdisco_common::host::DiscoveredHost;
use std::net::{IpAddr, Ipv6Addr};

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(ipv6_addr) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    "IPv6"
}

/// `2000::/3`
fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn ip_to_detail(ip: IpAddr) -> Detail {
    match ip {
        IpAddr::V4(ipv4_addr) => (String::from("IPv4"), ipv4_addr.to_string().color(colors::IPV4_ADDR)),
        IpAddr::V6(ipv6_addr) => (
            String::from(ipv6_to_type_str(&ipv6_addr)),
            ipv6_addr.to_string().color(colors::IPV6_ADDR),
        ),
    }
}

pub fn interface_details(iface: &InterfaceFacts) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("MAC"),
        iface.mac.to_string().color(colors::MAC_ADDR),
    )];
    details.extend(iface.ipv4.map(|ip| ip_to_detail(IpAddr::V4(ip))));
    details.extend(iface.ipv6.map(|ip| ip_to_detail(IpAddr::V6(ip))));
    details
}

pub fn host_details(host: &DiscoveredHost) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("MAC"),
        host.mac.to_string().color(colors::MAC_ADDR),
    )];
    details.extend(host.primary_ip().map(ip_to_detail));

    if let Some(vendor) = &host.vendor {
        details.push((String::from("Vendor"), vendor.normal()));
    }
    if let Some(organization) = &host.organization {
        details.push((String::from("Org"), organization.normal()));
    }
    if let Some(location) = &host.location {
        details.push((String::from("Loc"), location.normal()));
    }

    let names: Vec<&str> = host.interfaces.iter().map(|i| i.name.as_str()).collect();
    details.push((String::from("Ifaces"), names.join(", ").normal()));
    details
}
