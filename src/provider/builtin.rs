use phf::phf_map;

use super::types::{AddressingRules, MailboxProvider};

const PLUS: AddressingRules = AddressingRules::NONE.with_plus_addressing();

/// Built-in providers, in registration order.
pub(crate) static BUILTIN_PROVIDERS: [MailboxProvider; 12] = [
    MailboxProvider::new("AOL", PLUS, &["mx.aol.com.", "mailin.aol.com."]),
    MailboxProvider::new("Apple", PLUS, &["icloud.com."]),
    MailboxProvider::new("Fastmail", PLUS, &["messagingengine.com."]),
    MailboxProvider::new("GMX", PLUS, &["gmx.com.", "gmx.net."]),
    MailboxProvider::new(
        "Google",
        AddressingRules::NONE
            .with_plus_addressing()
            .with_strip_dots(),
        &["google.com.", "googlemail.com."],
    ),
    MailboxProvider::new("Mail.com", PLUS, &["mail.com."]),
    MailboxProvider::new("Microsoft", PLUS, &["outlook.com."]),
    MailboxProvider::new("Proton Mail", PLUS, &["protonmail.ch."]),
    MailboxProvider::new("Rackspace", PLUS, &["emailsrvr.com."]),
    MailboxProvider::new(
        "Yahoo",
        AddressingRules::NONE.with_dash_addressing(),
        &["yahoodns.net."],
    ),
    MailboxProvider::new("Yandex", PLUS, &["mx.yandex.net.", "yandex.ru."]),
    MailboxProvider::new("Zoho", PLUS, &["zoho.com."]),
];

// MX suffix -> index into BUILTIN_PROVIDERS. Kept in sync by a unit test.
pub(crate) static BUILTIN_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "mx.aol.com." => 0,
    "mailin.aol.com." => 0,
    "icloud.com." => 1,
    "messagingengine.com." => 2,
    "gmx.com." => 3,
    "gmx.net." => 3,
    "google.com." => 4,
    "googlemail.com." => 4,
    "mail.com." => 5,
    "outlook.com." => 6,
    "protonmail.ch." => 7,
    "emailsrvr.com." => 8,
    "yahoodns.net." => 9,
    "mx.yandex.net." => 10,
    "yandex.ru." => 10,
    "zoho.com." => 11,
};
