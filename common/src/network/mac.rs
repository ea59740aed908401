use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::util::MacAddr;
use thiserror::Error;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// PXELINUX prefixes `BOOTIF` with the ARP hardware type (`01` = Ethernet).
const BOOTIF_ETHERNET_PREFIX: &str = "01-";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid MAC address: {0:?}")]
pub struct MacParseError(pub String);

/// Parses a MAC address written in any of the usual notations.
///
/// Accepted forms (case-insensitive):
/// * `aa:bb:cc:dd:ee:ff`
/// * `aa-bb-cc-dd-ee-ff`
/// * `aabb.ccdd.eeff`
/// * `aabbccddeeff`
/// * `01-aa-bb-cc-dd-ee-ff` (PXELINUX `BOOTIF`)
pub fn parse_mac(input: &str) -> Result<MacAddr, MacParseError> {
    let trimmed = input.trim();
    let err = || MacParseError(input.to_string());

    let body = match trimmed.strip_prefix(BOOTIF_ETHERNET_PREFIX) {
        Some(rest) if rest.len() == 17 => rest,
        _ => trimmed,
    };

    let hex: String = body
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();

    let separated = hex.len() != body.len();
    if separated && !has_consistent_groups(body) {
        return Err(err());
    }
    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }

    let mut octets = [0u8; 6];
    for (idx, octet) in octets.iter_mut().enumerate() {
        *octet = u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16).map_err(|_| err())?;
    }

    Ok(MacAddr::new(
        octets[0], octets[1], octets[2], octets[3], octets[4], octets[5],
    ))
}

/// Six groups of two (`:`/`-`) or three groups of four (`.`), all joined by
/// the same separator.
fn has_consistent_groups(body: &str) -> bool {
    let mut separators = body.chars().filter(|c| matches!(c, ':' | '-' | '.'));
    let Some(sep) = separators.next() else {
        return false;
    };
    if separators.any(|c| c != sep) {
        return false;
    }
    let groups: Vec<&str> = body.split(sep).collect();
    match (sep, groups.len()) {
        (':' | '-', 6) => groups.iter().all(|g| g.len() == 2),
        ('.', 3) => groups.iter().all(|g| g.len() == 4),
        _ => false,
    }
}

/// Lower-case hex digits without separators, e.g. `aabbccddeeff`.
pub fn compact(mac: MacAddr) -> String {
    let MacAddr(a, b, c, d, e, f) = mac;
    format!("{a:02x}{b:02x}{c:02x}{d:02x}{e:02x}{f:02x}")
}

pub fn is_zero(mac: MacAddr) -> bool {
    mac == MacAddr::zero()
}

/// Retrieves or initializes the **Organizationally unique identifier** database.
fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB.get_or_init(|| Oui::default().ok()).as_ref()
}

/// Identify the vendor of a MAC address.
pub fn get_vendor(mac: MacAddr) -> Option<String> {
    let db = get_oui_db()?;
    let mac_str = mac.to_string();
    match db.lookup_by_mac(&mac_str) {
        Ok(Some(entry)) => Some(entry.company_name.clone()),
        _ => None,
    }
}
