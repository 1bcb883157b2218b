//! Built-in RFC 2865, 2866, 2869 and 3579 definitions

use super::entry::{AttributeDef, AttributeKind, Encryption, ValueDef};
use super::entry::AttributeKind::{Integer, IpAddr, Octets, String as Text};

/// (name, id, type) of every standard attribute the client knows about
const ATTRIBUTES: &[(&str, u32, AttributeKind)] = &[
    // RFC 2865
    ("User-Name", 1, Text),
    ("User-Password", 2, Octets),
    ("CHAP-Password", 3, Octets),
    ("NAS-IP-Address", 4, IpAddr),
    ("NAS-Port", 5, Integer),
    ("Service-Type", 6, Integer),
    ("Framed-Protocol", 7, Integer),
    ("Framed-IP-Address", 8, IpAddr),
    ("Framed-IP-Netmask", 9, IpAddr),
    ("Framed-Routing", 10, Integer),
    ("Filter-Id", 11, Text),
    ("Framed-MTU", 12, Integer),
    ("Framed-Compression", 13, Integer),
    ("Login-IP-Host", 14, IpAddr),
    ("Login-Service", 15, Integer),
    ("Login-TCP-Port", 16, Integer),
    ("Reply-Message", 18, Text),
    ("Callback-Number", 19, Text),
    ("Callback-Id", 20, Text),
    ("Framed-Route", 22, Text),
    ("Framed-IPX-Network", 23, IpAddr),
    ("State", 24, Octets),
    ("Class", 25, Octets),
    ("Vendor-Specific", 26, Octets),
    ("Session-Timeout", 27, Integer),
    ("Idle-Timeout", 28, Integer),
    ("Termination-Action", 29, Integer),
    ("Called-Station-Id", 30, Text),
    ("Calling-Station-Id", 31, Text),
    ("NAS-Identifier", 32, Text),
    ("Proxy-State", 33, Octets),
    ("Login-LAT-Service", 34, Text),
    ("Login-LAT-Node", 35, Text),
    ("Login-LAT-Group", 36, Octets),
    ("Framed-AppleTalk-Link", 37, Integer),
    ("Framed-AppleTalk-Network", 38, Integer),
    ("Framed-AppleTalk-Zone", 39, Text),
    // RFC 2866
    ("Acct-Status-Type", 40, Integer),
    ("Acct-Delay-Time", 41, Integer),
    ("Acct-Input-Octets", 42, Integer),
    ("Acct-Output-Octets", 43, Integer),
    ("Acct-Session-Id", 44, Text),
    ("Acct-Authentic", 45, Integer),
    ("Acct-Session-Time", 46, Integer),
    ("Acct-Input-Packets", 47, Integer),
    ("Acct-Output-Packets", 48, Integer),
    ("Acct-Terminate-Cause", 49, Integer),
    ("Acct-Multi-Session-Id", 50, Text),
    ("Acct-Link-Count", 51, Integer),
    // RFC 2869
    ("Acct-Input-Gigawords", 52, Integer),
    ("Acct-Output-Gigawords", 53, Integer),
    ("CHAP-Challenge", 60, Octets),
    ("NAS-Port-Type", 61, Integer),
    ("Port-Limit", 62, Integer),
    ("Login-LAT-Port", 63, Text),
    // RFC 3579
    ("EAP-Message", 79, Octets),
    ("Message-Authenticator", 80, Octets),
];

const VALUES: &[(&str, &str, u64)] = &[
    ("Service-Type", "Login-User", 1),
    ("Service-Type", "Framed-User", 2),
    ("Service-Type", "Callback-Login-User", 3),
    ("Service-Type", "Callback-Framed-User", 4),
    ("Service-Type", "Outbound-User", 5),
    ("Service-Type", "Administrative-User", 6),
    ("Service-Type", "NAS-Prompt-User", 7),
    ("Service-Type", "Authenticate-Only", 8),
    ("Service-Type", "Callback-NAS-Prompt", 9),
    ("Service-Type", "Call-Check", 10),
    ("Service-Type", "Callback-Administrative", 11),
    ("Framed-Protocol", "PPP", 1),
    ("Framed-Protocol", "SLIP", 2),
    ("Framed-Protocol", "ARAP", 3),
    ("Framed-Protocol", "Gandalf-SLML", 4),
    ("Framed-Protocol", "Xylogics-IPX-SLIP", 5),
    ("Framed-Protocol", "X.75-Synchronous", 6),
    ("Acct-Status-Type", "Start", 1),
    ("Acct-Status-Type", "Stop", 2),
    ("Acct-Status-Type", "Interim-Update", 3),
    ("Acct-Status-Type", "Accounting-On", 7),
    ("Acct-Status-Type", "Accounting-Off", 8),
    ("Acct-Authentic", "RADIUS", 1),
    ("Acct-Authentic", "Local", 2),
    ("Acct-Authentic", "Remote", 3),
    ("Acct-Terminate-Cause", "User-Request", 1),
    ("Acct-Terminate-Cause", "Lost-Carrier", 2),
    ("Acct-Terminate-Cause", "Lost-Service", 3),
    ("Acct-Terminate-Cause", "Idle-Timeout", 4),
    ("Acct-Terminate-Cause", "Session-Timeout", 5),
    ("Acct-Terminate-Cause", "Admin-Reset", 6),
    ("Acct-Terminate-Cause", "Admin-Reboot", 7),
    ("Acct-Terminate-Cause", "Port-Error", 8),
    ("Acct-Terminate-Cause", "NAS-Error", 9),
    ("Acct-Terminate-Cause", "NAS-Request", 10),
    ("Acct-Terminate-Cause", "NAS-Reboot", 11),
    ("Acct-Terminate-Cause", "Port-Unneeded", 12),
    ("Acct-Terminate-Cause", "Port-Preempted", 13),
    ("Acct-Terminate-Cause", "Port-Suspended", 14),
    ("Acct-Terminate-Cause", "Service-Unavailable", 15),
    ("Acct-Terminate-Cause", "Callback", 16),
    ("Termination-Action", "Default", 0),
    ("Termination-Action", "RADIUS-Request", 1),
];

/// Standard attribute definitions
pub fn standard_attributes() -> Vec<AttributeDef> {
    ATTRIBUTES
        .iter()
        .map(|&(name, id, kind)| {
            let attr = AttributeDef::new(name, id, kind);
            if id == 2 {
                attr.with_encryption(Encryption::UserPassword)
            } else {
                attr
            }
        })
        .collect()
}

/// Named values of the standard enumerated attributes
pub fn standard_values() -> Vec<ValueDef> {
    VALUES
        .iter()
        .map(|&(attribute, name, value)| ValueDef::new(attribute, name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    #[test]
    fn test_standard_dictionary_imports_cleanly() {
        let dict = Dictionary::standard();
        assert_eq!(dict.attribute_count(), ATTRIBUTES.len());
        assert_eq!(dict.value_count(), VALUES.len());
    }

    #[test]
    fn test_standard_lookups() {
        let dict = Dictionary::standard();

        let attr = dict.attribute_by_name("user-password", None).unwrap();
        assert_eq!(attr.id, 2);
        assert_eq!(attr.encrypt, Encryption::UserPassword);

        assert_eq!(dict.attribute_by_id(0, 80).unwrap().name, "Message-Authenticator");
        assert_eq!(
            dict.value_by_name("Acct-Status-Type", "Interim-Update").unwrap().value,
            3
        );
        assert_eq!(
            dict.value_by_number("Acct-Terminate-Cause", 16).unwrap().name,
            "Callback"
        );
        assert!(dict.attribute_by_name("User-Name", Some(9)).is_none());
    }
}
