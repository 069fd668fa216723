/// Addressing capabilities of a mailbox provider.
///
/// Each flag is independent; a provider may enable any combination.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AddressingRules {
    pub plus_addressing: bool,
    pub dash_addressing: bool,
    pub strip_dots: bool,
    pub local_part_as_host_name: bool,
}

impl AddressingRules {
    pub const NONE: Self = Self {
        plus_addressing: false,
        dash_addressing: false,
        strip_dots: false,
        local_part_as_host_name: false,
    };

    pub const fn with_plus_addressing(mut self) -> Self {
        self.plus_addressing = true;
        self
    }

    pub const fn with_dash_addressing(mut self) -> Self {
        self.dash_addressing = true;
        self
    }

    pub const fn with_strip_dots(mut self) -> Self {
        self.strip_dots = true;
        self
    }

    pub const fn with_local_part_as_host_name(mut self) -> Self {
        self.local_part_as_host_name = true;
        self
    }

    /// Names of the enabled flags, for display.
    pub fn enabled(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.local_part_as_host_name {
            out.push("local-part-as-host-name");
        }
        if self.plus_addressing {
            out.push("plus-addressing");
        }
        if self.dash_addressing {
            out.push("dash-addressing");
        }
        if self.strip_dots {
            out.push("strip-dots");
        }
        out
    }
}

/// A known mailbox provider: a unique name, its addressing rules and the MX
/// host suffixes (trailing-dot form) that identify it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxProvider {
    pub name: &'static str,
    pub rules: AddressingRules,
    pub mx_domains: &'static [&'static str],
}

impl MailboxProvider {
    pub const fn new(
        name: &'static str,
        rules: AddressingRules,
        mx_domains: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            rules,
            mx_domains,
        }
    }
}
